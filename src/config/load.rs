use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::TexpakConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: TexpakConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: TexpakConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Root directory relative to the config file, if the config names one.
    pub fn resolve_root(&self) -> Option<PathBuf> {
        self.config.root.as_ref().map(|r| self.config_dir.join(r))
    }

    /// Output archive path relative to the config file directory.
    pub fn resolve_pak(&self) -> PathBuf {
        self.config_dir.join(&self.config.pak)
    }

    /// Converter program. Bare names stay bare so they are looked up on
    /// `PATH`; anything with a directory part is resolved against the
    /// config directory.
    pub fn resolve_converter(&self) -> String {
        let converter = Path::new(&self.config.converter);
        if converter.components().count() > 1 {
            self.config_dir
                .join(converter)
                .to_string_lossy()
                .into_owned()
        } else {
            self.config.converter.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texpak.json");
        fs::write(
            &path,
            r#"{"root": "export", "pak": "build/game.pak", "converter": "tools/texconv"}"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&path).unwrap();

        assert_eq!(loaded.resolve_root(), Some(dir.path().join("export")));
        assert_eq!(loaded.resolve_pak(), dir.path().join("build/game.pak"));
        assert_eq!(
            loaded.resolve_converter(),
            dir.path().join("tools/texconv").to_string_lossy()
        );
    }

    #[test]
    fn test_bare_converter_name_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texpak.json");
        fs::write(&path, r#"{"converter": "texconv"}"#).unwrap();

        let loaded = LoadedConfig::load(&path).unwrap();

        assert_eq!(loaded.resolve_converter(), "texconv");
        assert_eq!(loaded.resolve_root(), None);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texpak.json");
        fs::write(&path, "{").unwrap();

        assert!(LoadedConfig::load(&path).is_err());
    }
}
