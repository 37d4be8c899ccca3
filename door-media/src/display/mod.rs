use crate::frame::Frame;
use crate::overlay::Overlay;
use anyhow::Result;
use log::{debug, trace};

#[cfg(feature = "opencv")]
mod opencv_window;
#[cfg(feature = "opencv")]
pub use opencv_window::OpenCvDisplay;

/// Operator-facing output of the annotated frame.
pub trait FrameDisplay {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<()>;

    /// Polls for an operator quit request. Must not block.
    fn quit_requested(&mut self) -> Result<bool> {
        Ok(false)
    }
}

impl<T: FrameDisplay + ?Sized> FrameDisplay for Box<T> {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<()> {
        (**self).show(frame, overlay)
    }

    fn quit_requested(&mut self) -> Result<bool> {
        (**self).quit_requested()
    }
}

/// Display for runs without a window: overlay labels go to the log.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    shown: u64,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_shown(&self) -> u64 {
        self.shown
    }
}

impl FrameDisplay for HeadlessDisplay {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<()> {
        self.shown += 1;
        trace!("Frame {} ({}): {} shapes", self.shown, frame.get_size(), overlay.shapes().len());
        debug!("{}", overlay.labels().collect::<Vec<_>>().join(" | "));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameSize, BGR};

    #[test]
    fn headless_display_counts_frames_and_never_quits() -> Result<()> {
        let size = FrameSize::new(8, 2);
        let frame = Frame::filled(size, BGR(0, 0, 0))?;
        let overlay = Overlay::builder(size)
            .draw_text("50.00%", (2, 1), 0.7, BGR::RED, 2)
            .build();

        let mut display: Box<dyn FrameDisplay> = Box::new(HeadlessDisplay::new());
        display.show(&frame, &overlay)?;
        display.show(&frame, &overlay)?;
        assert!(!display.quit_requested()?);

        let mut headless = HeadlessDisplay::new();
        headless.show(&frame, &overlay)?;
        assert_eq!(headless.frames_shown(), 1);
        Ok(())
    }
}
