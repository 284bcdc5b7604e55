use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reel_maker::{config::Config, crop::AspectRatio, pipeline::ReelPipeline};

#[derive(Parser)]
#[command(
    name = "reel-maker",
    version,
    about = "Build a vertical video reel from stock photos",
    long_about = "Reel-Maker searches Pexels for a keyword, downloads the original images, center-crops them to 9:16 and encodes them into a fixed-length H.264 slideshow.\n\nThe API key is read from PEXELS_API_KEY (a .env file works too) or from fetch.api_key in the config file."
)]
struct Cli {
    /// Configuration file (optional, TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search keyword
    #[arg(short, long)]
    query: Option<String>,

    /// Photos per page (1-80)
    #[arg(long)]
    per_page: Option<u32>,

    /// Result page to fetch
    #[arg(long)]
    page: Option<u32>,

    /// Crop aspect ratio as W:H (e.g. 9:16)
    #[arg(long, value_name = "W:H")]
    aspect_ratio: Option<AspectRatio>,

    /// Reel length in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Output video file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Crop and assemble images already in the download directory
    #[arg(long)]
    skip_fetch: bool,

    /// Write the effective configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(query) = &self.query {
            config.fetch.query = query.clone();
        }
        if let Some(per_page) = self.per_page {
            config.fetch.per_page = per_page;
        }
        if let Some(page) = self.page {
            config.fetch.page = page;
        }
        if let Some(ratio) = self.aspect_ratio {
            config.crop.aspect_ratio = ratio;
        }
        if let Some(duration) = self.duration {
            config.reel.duration = duration;
        }
        if let Some(output) = &self.output {
            config.reel.output_path = output.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    info!("Starting Reel-Maker v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    cli.apply_overrides(&mut config);

    if let Some(path) = &cli.write_config {
        config.validate()?;
        config.save_to_file(path)?;
        info!("Configuration written to {:?}", path);
        return Ok(());
    }

    config.apply_env();
    config.validate()?;

    let pipeline = ReelPipeline::new(config);
    let report = if cli.skip_fetch {
        pipeline.run_offline().await
    } else {
        pipeline.run().await
    };

    match report.reel() {
        Some(reel) => info!("Reel complete! Output saved to: {:?}", reel.path),
        None => info!("No reel was produced"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "reel-maker",
            "--query", "mountains",
            "--aspect-ratio", "4:5",
            "--duration", "12.5",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.fetch.query, "mountains");
        assert_eq!(config.crop.aspect_ratio, AspectRatio { width: 4, height: 5 });
        assert_eq!(config.reel.duration, 12.5);
        assert_eq!(config.fetch.per_page, Config::default().fetch.per_page);
    }

    #[test]
    fn test_rejects_malformed_aspect_ratio() {
        assert!(Cli::try_parse_from(["reel-maker", "--aspect-ratio", "916"]).is_err());
        assert!(Cli::try_parse_from(["reel-maker", "--aspect-ratio", "0:16"]).is_err());
    }
}
