use crate::frame::Frame;
use anyhow::Result;

mod raw;
pub use raw::RawVideoSource;

#[cfg(feature = "opencv")]
mod opencv_capture;
#[cfg(feature = "opencv")]
pub use opencv_capture::OpenCvCapture;

/// Source of camera frames.
pub trait FrameSource {
    /// Blocks until the next frame is available. `Ok(None)` marks the end of the stream.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Releases the underlying device. Called once after the loop ends.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        (**self).read_frame()
    }

    fn release(&mut self) -> Result<()> {
        (**self).release()
    }
}
