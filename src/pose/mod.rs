pub mod crop;
pub mod decode;
#[cfg(feature = "desktop")]
pub mod detector;
pub mod landmark;
#[cfg(feature = "desktop")]
pub mod preprocess;

pub use crop::{bbox_from_landmarks, remap_pose, square_region, BBox, CropRegion, PoseTracker};
#[cfg(feature = "desktop")]
pub use crop::crop_for_pose;
pub use decode::{decode_landmarks, BLAZEPOSE_INPUT_SIZE};
#[cfg(feature = "desktop")]
pub use detector::{BlazePoseEstimator, PoseEstimator};
pub use landmark::{FrameSize, Landmark, LandmarkIndex, Pose};
#[cfg(feature = "desktop")]
pub use preprocess::preprocess_for_blazepose;
