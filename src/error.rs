use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PakError {
    #[error(
        "Texture converter '{program}' not found in PATH. Install DirectXTex (texconv) and make sure it is available."
    )]
    ConverterNotFound { program: String },

    #[error("Failed to launch texture converter '{program}': {source}")]
    ConverterSpawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Texture converter failed on '{image}' ({status}){}", format_stderr(.stderr))]
    ConverterFailed {
        image: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Texture converter produced no DDS output for '{image}' in '{out_dir}'")]
    ConverterOutputMissing { image: PathBuf, out_dir: PathBuf },

    #[error("Failed to read manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest '{path}': {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write manifest '{path}': {source}")]
    ManifestWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write archive '{path}': {source}")]
    ArchiveWrite {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Root directory does not exist: {0}")]
    RootNotFound(PathBuf),
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}
