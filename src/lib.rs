#![doc = r#"
penguin-cie — emperor penguin colony detection for multispectral rasters.

The detector loads the B1, B2, B3, B4, B8 and B12 bands of a GeoTIFF (matched by
band description), removes overbright, exposed-rock and shadowed pixels with
band-ratio rules, projects the B8-B4-B2 composite into chromaticity space and
keeps the pixels above a fixed decision line. The binary result is written as an
8-bit GeoTIFF with the input's geotransform and projection.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Quick start: detect and write the mask
--------------------------------------
```rust,no_run
use penguin_cie::{detect_colonies_to_path, OutputOptions, PipelineConfig};

fn main() -> penguin_cie::Result<()> {
    let config = PipelineConfig::new("data_image/Astrid20201018.tif", "output");
    let summary = detect_colonies_to_path(&config, &OutputOptions::default())?;
    println!("{} colony pixels -> {:?}", summary.colony_pixels, summary.output_path);
    Ok(())
}
```

In-memory detection
-------------------
```rust,no_run
use penguin_cie::{detect_colonies, PipelineConfig};

fn main() -> penguin_cie::Result<()> {
    let detection = detect_colonies(&PipelineConfig::default())?;
    let (rows, cols) = detection.mask.dim();
    println!("{}x{} mask, {} pixels masked out", cols, rows, detection.masking.rejected());
    Ok(())
}
```

Error handling
--------------
All public functions return `penguin_cie::Result<T>`; match on `penguin_cie::Error`
to handle specific cases.

```rust,no_run
use penguin_cie::{detect_colonies, Error, PipelineConfig};

fn main() {
    match detect_colonies(&PipelineConfig::default()) {
        Ok(_) => {}
        Err(Error::MissingBand { band, available }) => {
            eprintln!("band {band} missing, file has: {available}")
        }
        Err(Error::InputNotFound { path }) => eprintln!("no such raster: {}", path.display()),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Feature flags
-------------
- `gui`: interactive two-panel viewer (eframe).
- `full`: enables every optional feature.

Useful modules
--------------
- [`api`] — high-level entry points.
- [`core`] — masking rules, chromaticity classifier, display composite, pipeline.
- [`io`] — GDAL band loader and output writers.
- [`types`] — `RasterImage`, `SpatialReference`, `ColonyMask`.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// GUI module (only available with gui feature)
#[cfg(feature = "gui")]
pub mod gui;

// Curated public API surface
// Types
pub use crate::core::params::PipelineConfig;
pub use crate::core::processing::chromaticity::DecisionBoundary;
pub use crate::core::processing::composite::DetectionFigure;
pub use crate::core::processing::masking::MaskingReport;
pub use crate::core::processing::pipeline::{Detection, DetectionSummary};
pub use crate::error::{Error, Result};
pub use crate::types::{ColonyMask, RasterImage, SpatialReference};

// Readers
pub use crate::io::gdal::{GdalError, GdalMetadata, GdalRasterReader, load_bands};

// High-level API re-exports
pub use crate::api::{OutputOptions, detect_colonies, detect_colonies_to_path, detect_file};
