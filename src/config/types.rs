use serde::Deserialize;

/// Texpak configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TexpakConfig {
    /// Directory holding the JSON manifests and PNG pages
    pub root: Option<String>,
    /// Output archive path
    pub pak: String,
    /// texconv format identifier
    pub format: String,
    /// Convert to premultiplied alpha
    pub premultiply_alpha: bool,
    /// Generate a full mip chain
    pub mipmaps: bool,
    /// Converter executable, by name or path
    pub converter: String,
}

impl Default for TexpakConfig {
    fn default() -> Self {
        Self {
            root: None,
            pak: "assets.pak".to_string(),
            format: crate::convert::DEFAULT_FORMAT.to_string(),
            premultiply_alpha: true,
            mipmaps: false,
            converter: crate::convert::DEFAULT_PROGRAM.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TexpakConfig =
            serde_json::from_str(r#"{"root": "export", "mipmaps": true}"#).unwrap();
        assert_eq!(config.root.as_deref(), Some("export"));
        assert!(config.mipmaps);
        assert_eq!(config.pak, "assets.pak");
        assert_eq!(config.format, "DXT5");
        assert!(config.premultiply_alpha);
        assert_eq!(config.converter, "texconv");
    }
}
