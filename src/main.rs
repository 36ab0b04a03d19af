use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use texpak::cli::CliArgs;
use texpak::config::{LoadedConfig, TexpakConfig};
use texpak::convert::{ConvertSettings, Texconv};
use texpak::pipeline::Pipeline;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    // Load config if specified and merge with CLI args
    let merged = merge_config_with_args(&args)?;

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("texpak v{}", env!("CARGO_PKG_VERSION"));

    // The converter must exist before anything on disk is touched
    let texconv = Texconv::locate(&merged.converter)?;

    let summary = Pipeline::new(&merged.root, &merged.pak)
        .settings(merged.settings)
        .run(&texconv)?;

    if summary.pak.stale_dds > 0 {
        info!(
            "{} PNGs were left out in favour of older DDS files; delete those DDS files to reconvert",
            summary.pak.stale_dds
        );
    }
    info!("Built {}", merged.pak.display());

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    root: PathBuf,
    pak: PathBuf,
    converter: String,
    settings: ConvertSettings,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CliArgs) -> Result<MergedConfig> {
    // Load config if specified
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };
    let defaults = TexpakConfig::default();

    // Root: CLI > config
    let root = args
        .root
        .clone()
        .or_else(|| loaded_config.as_ref().and_then(LoadedConfig::resolve_root))
        .context("no root directory given on the command line or in the config file")?;

    // Pak path: CLI > config > default
    let pak = args.pak.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(LoadedConfig::resolve_pak)
            .unwrap_or_else(|| PathBuf::from(&defaults.pak))
    });

    let format = args.format.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.format.clone())
            .unwrap_or_else(|| defaults.format.clone())
    });

    let converter = args.converter.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(LoadedConfig::resolve_converter)
            .unwrap_or_else(|| defaults.converter.clone())
    });

    // Boolean flags: CLI presence wins, otherwise use config
    let premultiply_alpha = if args.no_premul {
        false
    } else if let Some(ref lc) = loaded_config {
        lc.config.premultiply_alpha
    } else {
        defaults.premultiply_alpha
    };

    let mipmaps = if args.mipmaps {
        true
    } else if let Some(ref lc) = loaded_config {
        lc.config.mipmaps
    } else {
        defaults.mipmaps
    };

    Ok(MergedConfig {
        root,
        pak,
        converter,
        settings: ConvertSettings::new(format)
            .premultiply_alpha(premultiply_alpha)
            .mipmaps(mipmaps),
        verbose: args.verbose,
    })
}
