use std::fs;
use std::path::Path;

use anyhow::Result;
use log::{debug, info};
use serde_json::Value;

use super::scan::has_extension;
use crate::convert::{ConversionJob, ConvertSettings, TextureBackend, convert_texture};
use crate::error::PakError;

/// What happened to a single manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifestOutcome {
    /// Page entries rewritten from `.png` to `.dds`
    pub rewritten_pages: usize,
    /// Pages that needed a converter run
    pub converted: usize,
    /// Pages whose `.dds` already existed
    pub reused: usize,
}

impl ManifestOutcome {
    /// The manifest file was written back to disk.
    pub fn was_rewritten(&self) -> bool {
        self.rewritten_pages > 0
    }
}

/// Convert the PNG pages of one manifest and point it at the DDS files.
///
/// Page paths are resolved against `root`, not the manifest's own
/// directory. The file is rewritten only if at least one entry changed.
pub fn process_manifest(
    path: &Path,
    root: &Path,
    backend: &dyn TextureBackend,
    settings: &ConvertSettings,
) -> Result<ManifestOutcome> {
    let content = fs::read_to_string(path).map_err(|e| PakError::ManifestRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut document: Value =
        serde_json::from_str(&content).map_err(|e| PakError::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut rewriter = PageRewriter {
        root,
        backend,
        settings,
        outcome: ManifestOutcome::default(),
    };

    if let Some(Value::Array(pages)) = document.get_mut("pages") {
        rewriter.rewrite_pages(pages)?;
    }

    if let Some(Value::Array(symbols)) = document.get_mut("symbols") {
        for symbol in symbols.iter_mut() {
            if let Some(Value::Array(pages)) = symbol.get_mut("pages") {
                rewriter.rewrite_pages(pages)?;
            }
        }
    }

    let outcome = rewriter.outcome;
    if outcome.was_rewritten() {
        let content = serde_json::to_string_pretty(&document)?;
        fs::write(path, content).map_err(|e| PakError::ManifestWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(
            "Updated {} ({} pages)",
            path.display(),
            outcome.rewritten_pages
        );
    }

    Ok(outcome)
}

/// Manifest entry for the DDS replacing `entry`, always with `/` separators.
pub fn dds_entry(entry: &str) -> String {
    Path::new(entry)
        .with_extension("dds")
        .to_string_lossy()
        .replace('\\', "/")
}

struct PageRewriter<'a> {
    root: &'a Path,
    backend: &'a dyn TextureBackend,
    settings: &'a ConvertSettings,
    outcome: ManifestOutcome,
}

impl PageRewriter<'_> {
    fn rewrite_pages(&mut self, pages: &mut [Value]) -> Result<()> {
        for page in pages.iter_mut() {
            let Some(entry) = page.as_str() else {
                continue;
            };
            if let Some(replacement) = self.rewrite_entry(entry)? {
                *page = Value::String(replacement);
            }
        }
        Ok(())
    }

    fn rewrite_entry(&mut self, entry: &str) -> Result<Option<String>> {
        let resolved = self.root.join(entry);
        if !has_extension(&resolved, "png") || !resolved.is_file() {
            return Ok(None);
        }

        let job = ConversionJob::for_png(resolved);
        if job.is_done() {
            debug!("{} already exists, skipping conversion", job.target.display());
            self.outcome.reused += 1;
        } else {
            convert_texture(self.backend, &job, self.settings)?;
            self.outcome.converted += 1;
        }

        self.outcome.rewritten_pages += 1;
        Ok(Some(dds_entry(entry)))
    }
}
