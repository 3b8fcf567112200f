pub mod annotator;
pub mod fragmentation;
pub mod model;
pub mod neutral_loss;
pub mod params;
