use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::error::PakError;

/// Move whatever the converter produced for `source` to `target`.
///
/// texconv keeps the source's base name and picks its own extension casing
/// (usually `.DDS`). The produced file is renamed whenever its name on disk
/// differs from the requested one, including on case-insensitive
/// filesystems where `target` already appears to exist.
pub fn place_output(source: &Path, target: &Path) -> Result<()> {
    let produced = find_produced(source, target)?.ok_or_else(|| {
        PakError::ConverterOutputMissing {
            image: source.to_path_buf(),
            out_dir: target.parent().map(Path::to_path_buf).unwrap_or_default(),
        }
    })?;

    if produced.file_name() != target.file_name() {
        debug!("Renaming {} -> {}", produced.display(), target.display());
        fs::rename(&produced, target).with_context(|| {
            format!("failed to rename {} to {}", produced.display(), target.display())
        })?;
    }

    Ok(())
}

/// The `<stem>.dds` file in the output directory, in any extension casing.
/// An entry named exactly like `target` wins.
fn find_produced(source: &Path, target: &Path) -> Result<Option<PathBuf>> {
    let out_dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let stem = source.file_stem().unwrap_or_default();
    let entries = fs::read_dir(out_dir)
        .with_context(|| format!("failed to read directory {}", out_dir.display()))?;

    let mut found = None;
    for entry in entries {
        let path = entry?.path();
        if !is_dds_named(&path, stem) || !path.is_file() {
            continue;
        }
        if path.file_name() == target.file_name() {
            return Ok(Some(path));
        }
        found.get_or_insert(path);
    }

    Ok(found)
}

fn is_dds_named(path: &Path, stem: &OsStr) -> bool {
    let is_dds = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("dds"))
        .unwrap_or(false);
    is_dds && path.file_stem() == Some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_place_output_renames_uppercase() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("hero.png");
        let target = dir.path().join("hero.dds");
        fs::write(dir.path().join("hero.DDS"), b"dds").unwrap();

        place_output(&source, &target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"dds");
        assert_eq!(dir_names(dir.path()), vec!["hero.dds"]);
    }

    #[test]
    fn test_place_output_mixed_case_extension() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("hero.png");
        let target = dir.path().join("hero.dds");
        fs::write(dir.path().join("hero.Dds"), b"dds").unwrap();

        place_output(&source, &target).unwrap();

        assert_eq!(dir_names(dir.path()), vec!["hero.dds"]);
    }

    #[test]
    fn test_place_output_already_in_place() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("hero.png");
        let target = dir.path().join("hero.dds");
        fs::write(&target, b"dds").unwrap();

        place_output(&source, &target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"dds");
        assert_eq!(dir_names(dir.path()), vec!["hero.dds"]);
    }

    #[test]
    fn test_place_output_ignores_other_stems() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("hero.png");
        let target = dir.path().join("hero.dds");
        fs::write(dir.path().join("hero.png"), b"png").unwrap();
        fs::write(dir.path().join("heroine.DDS"), b"dds").unwrap();
        fs::write(dir.path().join("hero.DDS"), b"dds").unwrap();

        place_output(&source, &target).unwrap();

        assert_eq!(
            dir_names(dir.path()),
            vec!["hero.dds", "hero.png", "heroine.DDS"]
        );
    }

    #[test]
    fn test_place_output_missing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("hero.png");
        let target = dir.path().join("hero.dds");
        fs::write(dir.path().join("other.DDS"), b"dds").unwrap();

        let err = place_output(&source, &target).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PakError>(),
            Some(PakError::ConverterOutputMissing { .. })
        ));
    }
}
