use crate::capture::FrameSource;
use crate::frame::{Frame, FrameSize};
use anyhow::{bail, Context, Result};
use log::{info, warn};
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use std::path::Path;

/// Camera or video file read through OpenCV; frames arrive as bgr24.
pub struct OpenCvCapture {
    cap: VideoCapture,
    frames_read: u64,
}

impl OpenCvCapture {
    pub fn open_camera(index: i32) -> Result<Self> {
        let cap = VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open camera {index}."))?;
        Self::from_capture(cap, &format!("camera {index}"))
    }

    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .to_str()
            .with_context(|| format!("Video path is not valid UTF-8: {}", path.display()))?;
        let cap = VideoCapture::from_file(name, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open video {}.", path.display()))?;
        Self::from_capture(cap, name)
    }

    fn from_capture(cap: VideoCapture, name: &str) -> Result<Self> {
        if !cap.is_opened()? {
            bail!("Failed to open capture {name}.");
        }

        let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
        let fps = cap.get(videoio::CAP_PROP_FPS)?;
        info!("Opened {name}: {width}x{height} @ {fps:.1} FPS");

        Ok(Self { cap, frames_read: 0 })
    }
}

impl FrameSource for OpenCvCapture {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut mat = Mat::default();

        // Skip reads that produced an unusable image instead of handing them to the segmenter.
        loop {
            if !self.cap.read(&mut mat)? || mat.empty() {
                return Ok(None);
            }
            if mat.typ() != opencv::core::CV_8UC3 {
                bail!("Unsupported capture pixel type {}.", mat.typ());
            }
            let size = FrameSize::new(mat.cols().max(0) as u32, mat.rows().max(0) as u32);
            if size.is_segmentable() {
                break;
            }
            warn!("Skipping degenerate {}x{} capture.", mat.cols(), mat.rows());
        }

        let mat = if mat.is_continuous() { mat } else { mat.try_clone()? };
        let size = FrameSize::new(mat.cols() as u32, mat.rows() as u32);
        self.frames_read += 1;

        Frame::new(size, mat.data_bytes()?.to_vec()).map(Some)
    }

    fn release(&mut self) -> Result<()> {
        info!("Releasing capture after {} frames.", self.frames_read);
        self.cap.release()?;
        Ok(())
    }
}
