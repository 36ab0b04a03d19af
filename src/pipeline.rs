use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::convert::{ConvertSettings, TextureBackend};
use crate::error::PakError;
use crate::manifest::{find_manifests, process_manifest};
use crate::pak::{PakSummary, build_pak};

/// Totals for one run over a root directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub manifests_scanned: usize,
    pub manifests_rewritten: usize,
    pub pages_rewritten: usize,
    pub textures_converted: usize,
    pub textures_reused: usize,
    pub pak: PakSummary,
}

/// Convert every manifest under a root, then pack the tree.
pub struct Pipeline {
    pub root: PathBuf,
    pub pak_path: PathBuf,
    pub settings: ConvertSettings,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, pak_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pak_path: pak_path.into(),
            settings: ConvertSettings::default(),
        }
    }

    pub fn settings(mut self, settings: ConvertSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run all stages in order. The first failure stops the run.
    pub fn run(&self, backend: &dyn TextureBackend) -> Result<RunSummary> {
        let root = self.canonical_root()?;
        let pak_path = std::path::absolute(&self.pak_path)
            .with_context(|| format!("invalid pak path: {}", self.pak_path.display()))?;

        let mut summary = self.convert_manifests(&root, backend)?;
        summary.pak = build_pak(&root, &pak_path)?;

        Ok(summary)
    }

    fn convert_manifests(&self, root: &Path, backend: &dyn TextureBackend) -> Result<RunSummary> {
        let manifests = find_manifests(root)?;
        info!(
            "Found {} manifests under {}",
            manifests.len(),
            root.display()
        );

        let mut summary = RunSummary {
            manifests_scanned: manifests.len(),
            ..RunSummary::default()
        };

        for manifest in &manifests {
            debug!("Processing {}", manifest.display());
            let outcome = process_manifest(manifest, root, backend, &self.settings)?;
            if outcome.was_rewritten() {
                summary.manifests_rewritten += 1;
            }
            summary.pages_rewritten += outcome.rewritten_pages;
            summary.textures_converted += outcome.converted;
            summary.textures_reused += outcome.reused;
        }

        info!(
            "Converted {} textures ({} already up to date), rewrote {} manifests",
            summary.textures_converted, summary.textures_reused, summary.manifests_rewritten
        );

        Ok(summary)
    }

    fn canonical_root(&self) -> Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(PakError::RootNotFound(self.root.clone()).into());
        }
        self.root
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", self.root.display()))
    }
}
