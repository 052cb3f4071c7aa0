//! Interactive two-panel viewer for a detection result (feature `gui`).
pub mod app;

pub use app::{DetectionViewer, show_detection};
