mod output;
mod settings;
mod texconv;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use output::place_output;
pub use settings::{ConvertSettings, DEFAULT_FORMAT};
pub use texconv::{DEFAULT_PROGRAM, Texconv};

/// An external tool that turns one image into a DDS file.
///
/// Implementations write into `out_dir` using whatever name the tool
/// picks; [`convert_texture`] moves the result to the requested path.
pub trait TextureBackend {
    fn invoke(&self, source: &Path, out_dir: &Path, settings: &ConvertSettings) -> Result<()>;
}

/// A PNG page and the DDS file that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl ConversionJob {
    /// Job targeting the lowercase `.dds` sibling of `source`.
    pub fn for_png(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let target = source.with_extension("dds");
        Self { source, target }
    }

    pub fn is_done(&self) -> bool {
        self.target.exists()
    }
}

/// Convert one PNG, leaving the DDS at exactly `job.target`.
pub fn convert_texture(
    backend: &dyn TextureBackend,
    job: &ConversionJob,
    settings: &ConvertSettings,
) -> Result<()> {
    let out_dir = job
        .target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create directory {}", out_dir.display()))?;

    backend.invoke(&job.source, out_dir, settings)?;
    place_output(&job.source, &job.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Writes `<stem>.DDS` next to the requested output dir, like texconv.
    struct UppercaseBackend {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl TextureBackend for UppercaseBackend {
        fn invoke(&self, source: &Path, out_dir: &Path, _: &ConvertSettings) -> Result<()> {
            self.calls.borrow_mut().push(source.to_path_buf());
            let stem = source.file_stem().unwrap().to_string_lossy();
            fs::write(out_dir.join(format!("{}.DDS", stem)), b"DDS ")?;
            Ok(())
        }
    }

    #[test]
    fn test_job_for_png() {
        let job = ConversionJob::for_png("/root/tex/Page_0.PNG");
        assert_eq!(job.target, PathBuf::from("/root/tex/Page_0.dds"));
    }

    #[test]
    fn test_convert_texture_renames_output() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.png");
        fs::write(&source, b"png").unwrap();
        let job = ConversionJob::for_png(&source);
        let backend = UppercaseBackend {
            calls: RefCell::new(Vec::new()),
        };

        convert_texture(&backend, &job, &ConvertSettings::default()).unwrap();

        assert!(job.is_done());
        assert_eq!(fs::read(&job.target).unwrap(), b"DDS ");
        assert_eq!(backend.calls.borrow().as_slice(), &[source]);
        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.dds", "a.png"]);
    }

    #[test]
    fn test_convert_texture_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.png");
        fs::write(&source, b"png").unwrap();
        let job = ConversionJob {
            source,
            target: dir.path().join("nested/out/a.dds"),
        };
        let backend = UppercaseBackend {
            calls: RefCell::new(Vec::new()),
        };

        convert_texture(&backend, &job, &ConvertSettings::default()).unwrap();

        assert!(job.target.is_file());
    }
}
