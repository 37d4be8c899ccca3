use crate::display::FrameDisplay;
use crate::frame::{Frame, BGR};
use crate::overlay::{Overlay, Shape};
use anyhow::Result;
use opencv::core::{self, Mat, Scalar};
use opencv::prelude::*;
use opencv::{highgui, imgproc};

const QUIT_KEY: i32 = b'q' as i32;

pub struct OpenCvDisplay {
    window: String,
    pending_quit: bool,
}

impl OpenCvDisplay {
    pub fn new(window: impl Into<String>) -> Result<Self> {
        let window = window.into();
        highgui::named_window(&window, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            window,
            pending_quit: false,
        })
    }

    fn to_mat(frame: &Frame) -> Result<Mat> {
        let size = frame.get_size();
        let mut mat = Mat::new_rows_cols_with_default(
            size.height as i32,
            size.width as i32,
            core::CV_8UC3,
            Scalar::all(0.0),
        )?;
        mat.data_bytes_mut()?.copy_from_slice(frame.raw_data());
        Ok(mat)
    }
}

fn scalar(color: BGR) -> Scalar {
    Scalar::new(color.0 as f64, color.1 as f64, color.2 as f64, 0.0)
}

impl FrameDisplay for OpenCvDisplay {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<()> {
        let mut mat = Self::to_mat(frame)?;

        for shape in overlay.shapes() {
            match shape {
                Shape::Rect {
                    top_left,
                    bottom_right,
                    color,
                    thickness,
                } => imgproc::rectangle_points(
                    &mut mat,
                    core::Point::new(top_left.0, top_left.1),
                    core::Point::new(bottom_right.0, bottom_right.1),
                    scalar(*color),
                    *thickness,
                    imgproc::LINE_8,
                    0,
                )?,
                Shape::Text {
                    text,
                    origin,
                    scale,
                    color,
                    thickness,
                } => imgproc::put_text(
                    &mut mat,
                    text,
                    core::Point::new(origin.0, origin.1),
                    imgproc::FONT_HERSHEY_SIMPLEX,
                    *scale,
                    scalar(*color),
                    *thickness,
                    imgproc::LINE_8,
                    false,
                )?,
            }
        }

        highgui::imshow(&self.window, &mat)?;
        // wait_key pumps the window's event loop; remember a quit press for the next poll.
        if highgui::wait_key(1)? & 0xFF == QUIT_KEY {
            self.pending_quit = true;
        }
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool> {
        Ok(std::mem::take(&mut self.pending_quit))
    }
}

impl Drop for OpenCvDisplay {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.window) {
            log::warn!("Failed to close window {}: {e}", self.window);
        }
    }
}
