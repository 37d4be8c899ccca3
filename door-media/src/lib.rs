pub mod capture;
pub mod display;
pub mod frame;
pub mod overlay;
pub mod strip;

pub use frame::{Frame, FrameSize, BGR, MIN_FRAME_WIDTH};
pub use overlay::Overlay;
pub use strip::{SegmentFrame, Strip, StripBounds, STRIP_COUNT};
