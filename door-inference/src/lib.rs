pub mod engine;
pub mod inference;
pub mod utils;

pub use inference::door_classify::{DoorClassify, DoorClassifySession, DoorProbability};
pub use inference::door_detect::{
    DetectionVector, DetectorConfig, DoorDetector, FrameDetection, StripScore,
    DOOR_CONFIDENCE_THRESHOLD,
};
pub use utils::tensor::TensorLayout;
