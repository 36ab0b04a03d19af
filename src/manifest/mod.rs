mod rewrite;
mod scan;

pub use rewrite::{ManifestOutcome, dds_entry, process_manifest};
pub use scan::find_manifests;
pub(crate) use scan::has_extension;
