use tracing::info;
use tracing_subscriber::EnvFilter;

use penguin_cie::{OutputOptions, PipelineConfig, detect_colonies_to_path};

use super::args::CliArgs;
use super::errors::AppError;

/// Build the pipeline configuration from defaults, an optional JSON file, and flags.
pub fn resolve_config(args: &CliArgs) -> Result<PipelineConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::ConfigNotFound { path: path.clone() });
            }
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };
    if let Some(input) = &args.input {
        config.input_path = input.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    Ok(config)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = resolve_config(&args)?;
    info!("Configuration: {:?}", config);

    let options = OutputOptions {
        display: !args.no_display,
        preview_path: args.preview.clone(),
        summary: args.summary,
    };
    let summary = detect_colonies_to_path(&config, &options).map_err(AppError::from)?;
    info!(
        "Colony pixels: {} ({:.4}% of scene)",
        summary.colony_pixels,
        summary.colony_fraction * 100.0
    );

    println!("[NIR-R-B] Output saved: {}", summary.output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("run.json");
        std::fs::write(
            &cfg_path,
            r#"{ "input_path": "a.tif", "output_dir": "from_file" }"#,
        )
        .unwrap();
        let args = CliArgs::parse_from([
            "penguin-cie",
            "--config",
            cfg_path.to_str().unwrap(),
            "--output-dir",
            "from_flag",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.input_path, PathBuf::from("a.tif"));
        assert_eq!(config.output_dir, PathBuf::from("from_flag"));
    }

    #[test]
    fn no_flags_uses_defaults() {
        let args = CliArgs::parse_from(["penguin-cie"]);
        assert!(!args.no_display);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = CliArgs::parse_from(["penguin-cie", "--config", "/nonexistent/run.json"]);
        assert!(matches!(
            resolve_config(&args),
            Err(AppError::ConfigNotFound { .. })
        ));
    }
}
