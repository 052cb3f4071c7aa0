pub mod chromaticity;
pub mod composite;
pub mod masking;
pub mod pipeline;
