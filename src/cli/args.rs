use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "penguin-cie",
    version,
    about = "Detect emperor penguin colonies in B1/B2/B3/B4/B8/B12 rasters"
)]
pub struct CliArgs {
    /// Input raster (defaults to data_image/Astrid20201018.tif)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory the mask GeoTIFF is written to (defaults to output)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON file with a pipeline configuration; --input/--output-dir override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write the two-panel figure as a JPEG quicklook
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Also write a JSON run summary next to the mask
    #[arg(long, default_value_t = false)]
    pub summary: bool,

    /// Skip the interactive window
    #[arg(long, default_value_t = false)]
    pub no_display: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
