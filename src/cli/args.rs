use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "texpak")]
#[command(
    version,
    about = "Convert PNG atlas pages to DDS and pack them into a .pak (zip)",
    long_about = None
)]
pub struct CliArgs {
    /// Root folder containing the JSON manifests and PNG pages
    #[arg(required_unless_present = "config")]
    pub root: Option<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output pak path (zip) [default: assets.pak]
    #[arg(long, value_name = "PATH")]
    pub pak: Option<PathBuf>,

    /// DDS format for texconv (e.g. DXT5, BC3_UNORM, BC7_UNORM) [default: DXT5]
    #[arg(long, value_name = "NAME")]
    pub format: Option<String>,

    /// Disable premultiplied alpha (default: on)
    #[arg(long)]
    pub no_premul: bool,

    /// Generate mipmaps (default: single mip level)
    #[arg(long)]
    pub mipmaps: bool,

    /// Texture converter executable, by name or path [default: texconv]
    #[arg(long, value_name = "PROGRAM")]
    pub converter: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = CliArgs::try_parse_from(["texpak", "export"]).unwrap();
        assert_eq!(args.root, Some(PathBuf::from("export")));
        assert_eq!(args.pak, None);
        assert_eq!(args.format, None);
        assert!(!args.no_premul);
        assert!(!args.mipmaps);
        assert!(!args.verbose);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = CliArgs::try_parse_from([
            "texpak",
            "export",
            "--pak",
            "out/game.pak",
            "--format",
            "BC7_UNORM",
            "--no-premul",
            "--mipmaps",
            "--converter",
            "/opt/texconv",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.pak, Some(PathBuf::from("out/game.pak")));
        assert_eq!(args.format.as_deref(), Some("BC7_UNORM"));
        assert!(args.no_premul);
        assert!(args.mipmaps);
        assert_eq!(args.converter.as_deref(), Some("/opt/texconv"));
        assert!(args.verbose);
    }

    #[test]
    fn test_root_required_without_config() {
        assert!(CliArgs::try_parse_from(["texpak"]).is_err());
        let args = CliArgs::try_parse_from(["texpak", "--config", "texpak.json"]).unwrap();
        assert_eq!(args.root, None);
    }
}
