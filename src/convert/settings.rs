/// Format passed to texconv when none is requested.
pub const DEFAULT_FORMAT: &str = "DXT5";

/// Per-run conversion options handed to the texture backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSettings {
    /// texconv format identifier (`DXT5`, `BC3_UNORM`, `BC7_UNORM`, ...)
    pub format: String,
    /// Apply premultiplied alpha (`-pmalpha`)
    pub premultiply_alpha: bool,
    /// Keep the tool's default mip chain instead of forcing a single level
    pub mipmaps: bool,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            premultiply_alpha: true,
            mipmaps: false,
        }
    }
}

impl ConvertSettings {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn premultiply_alpha(mut self, enabled: bool) -> Self {
        self.premultiply_alpha = enabled;
        self
    }

    pub fn mipmaps(mut self, enabled: bool) -> Self {
        self.mipmaps = enabled;
        self
    }
}
