pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod manifest;
pub mod pak;
pub mod pipeline;

pub use cli::CliArgs;
pub use convert::{ConversionJob, ConvertSettings, Texconv, TextureBackend};
pub use error::PakError;
pub use pipeline::{Pipeline, RunSummary};
