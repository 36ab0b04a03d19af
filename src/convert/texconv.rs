use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use log::{debug, info};

use super::{ConvertSettings, TextureBackend};
use crate::error::PakError;

/// Converter executable looked up on `PATH` by default.
pub const DEFAULT_PROGRAM: &str = "texconv";

/// DirectXTex `texconv` invoked as a subprocess.
#[derive(Debug, Clone)]
pub struct Texconv {
    program: PathBuf,
}

impl Texconv {
    /// Wrap an already resolved executable path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the converter executable.
    ///
    /// A bare name is searched for on `PATH`. Anything containing a path
    /// separator is taken as a path and must point at an executable file.
    pub fn locate(program: &str) -> Result<Self> {
        let candidate = Path::new(program);
        let resolved = if candidate.components().count() > 1 {
            is_executable(candidate).then(|| candidate.to_path_buf())
        } else {
            let path_var = std::env::var_os("PATH").unwrap_or_default();
            find_in_dirs(program, std::env::split_paths(&path_var))
        };

        let program_path = resolved.ok_or_else(|| PakError::ConverterNotFound {
            program: program.to_string(),
        })?;
        debug!("Using texture converter {}", program_path.display());

        Ok(Self::new(program_path))
    }

    pub(crate) fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for converting `source` into `out_dir`.
    pub fn args(source: &Path, out_dir: &Path, settings: &ConvertSettings) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            settings.format.clone().into(),
            "-o".into(),
            out_dir.as_os_str().to_os_string(),
            "-nologo".into(),
        ];
        if settings.premultiply_alpha {
            args.push("-pmalpha".into());
        }
        if !settings.mipmaps {
            // one mip level, no chain
            args.push("-m".into());
            args.push("1".into());
        }
        args.push(source.as_os_str().to_os_string());
        args
    }
}

impl TextureBackend for Texconv {
    fn invoke(&self, source: &Path, out_dir: &Path, settings: &ConvertSettings) -> Result<()> {
        let args = Self::args(source, out_dir, settings);
        info!("texconv {}", display_args(&args));

        let output = Command::new(self.program())
            .args(&args)
            .output()
            .map_err(|e| PakError::ConverterSpawn {
                program: self.program.clone(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            debug!("texconv: {}", line.trim_end());
        }

        if !output.status.success() {
            return Err(PakError::ConverterFailed {
                image: source.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Find `name` as an executable file in the first matching directory.
fn find_in_dirs(name: &str, dirs: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    let names = executable_names(name);
    dirs.into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .find_map(|dir| {
            names
                .iter()
                .map(|n| dir.join(n))
                .find(|candidate| is_executable(candidate))
        })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(windows)]
fn executable_names(name: &str) -> Vec<String> {
    if Path::new(name).extension().is_some() {
        vec![name.to_string()]
    } else {
        vec![format!("{}.exe", name), name.to_string()]
    }
}

#[cfg(not(windows))]
fn executable_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
