pub mod challenge;
pub mod config;
pub mod csv_loader;
pub mod geometry;
pub mod gesture_classifier;
pub mod hold_confirm;
pub mod landmark_source;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_poses;

pub use gesture_classifier::{classify, classify_pose};
pub use types::{Classification, HandPose, Landmark};
