pub mod door_classify;
pub mod door_detect;
