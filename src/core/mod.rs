//! Core detection building blocks: configuration, band-ratio masking,
//! chromaticity classification, display composites, and the stage
//! pipeline. These are consumed by the high-level `api` module.
pub mod params;
pub mod processing;
