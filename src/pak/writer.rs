use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::PakError;
use crate::manifest::has_extension;

/// Deflate level used for every entry.
const COMPRESSION_LEVEL: i64 = 9;

/// Counts from writing one archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PakSummary {
    /// Files stored in the archive
    pub entries: usize,
    /// PNG files left out because a DDS sibling exists
    pub excluded_pngs: usize,
    /// Excluded PNGs whose DDS sibling is older than the PNG
    pub stale_dds: usize,
}

/// Zip every file under `root` into `pak_path`.
///
/// PNGs with a `.dds` sibling are skipped, as is the archive itself when it
/// is written inside `root`.
pub fn build_pak(root: &Path, pak_path: &Path) -> Result<PakSummary> {
    if let Some(parent) = pak_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let file = File::create(pak_path).map_err(|e| PakError::ArchiveWrite {
        path: pak_path.to_path_buf(),
        source: e.into(),
    })?;
    // Compare against the created file so relative and absolute spellings match.
    let pak_canonical = fs::canonicalize(pak_path).ok();

    let archive_err = |e: zip::result::ZipError| PakError::ArchiveWrite {
        path: pak_path.to_path_buf(),
        source: e,
    };

    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));
    let mut summary = PakSummary::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("failed to walk directory {}", root.display()))?;
        if !entry.path().is_file() {
            continue;
        }
        let path = entry.path();

        if pak_canonical.is_some() && fs::canonicalize(path).ok() == pak_canonical {
            continue;
        }

        if is_superseded(path) {
            summary.excluded_pngs += 1;
            if dds_is_stale(path) {
                summary.stale_dds += 1;
                warn!(
                    "{} is older than {}; leaving the PNG out anyway",
                    path.with_extension("dds").display(),
                    path.display()
                );
            }
            debug!("Skipping {} (DDS sibling exists)", path.display());
            continue;
        }

        let name = entry_name(root, path)?;
        let mut source = File::open(path).map_err(|e| PakError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        writer.start_file(name.as_str(), options).map_err(archive_err)?;
        io::copy(&mut source, &mut writer).map_err(|e| PakError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("Added {}", name);
        summary.entries += 1;
    }

    writer.finish().map_err(archive_err)?;

    info!(
        "Packed {} files into {} ({} PNGs superseded by DDS)",
        summary.entries,
        pak_path.display(),
        summary.excluded_pngs
    );

    Ok(summary)
}

/// A PNG that has a `.dds` file with the same stem next to it.
pub fn is_superseded(path: &Path) -> bool {
    has_extension(path, "png") && path.with_extension("dds").exists()
}

/// Archive entry name: path relative to `root` with `/` separators.
pub fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is not inside {}", path.display(), root.display()))?;

    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Ok(parts.join("/"))
}

fn dds_is_stale(png: &Path) -> bool {
    let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified()).ok();
    let dds: PathBuf = png.with_extension("dds");
    match (modified(png), modified(&dds)) {
        (Some(png_time), Some(dds_time)) => dds_time < png_time,
        _ => false,
    }
}
