pub mod curve_features;
pub mod isotonic;
pub mod peaks;
pub mod step_detection;
