mod writer;

pub use writer::{PakSummary, build_pak, entry_name, is_superseded};
