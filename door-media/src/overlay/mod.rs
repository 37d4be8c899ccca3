mod builder;

use crate::frame::{FrameSize, BGR};
use std::marker::PhantomData;

pub use builder::{Locked, OverlayState, UnLocked};

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Rectangle outline between two corners, inclusive.
    Rect {
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: BGR,
        thickness: i32,
    },
    /// Text anchored at its bottom-left corner.
    Text {
        text: String,
        origin: (i32, i32),
        scale: f64,
        color: BGR,
        thickness: i32,
    },
}

/// Diagnostics drawn over a frame before it is shown, recorded as a list of shapes
/// so every display backend renders the same picture.
#[derive(Debug, Clone)]
pub struct Overlay<T: OverlayState = Locked> {
    pub(crate) size: FrameSize,
    pub(crate) shapes: Vec<Shape>,
    pub(crate) _marker: PhantomData<T>,
}

impl<T: OverlayState> Overlay<T> {
    pub fn get_size(&self) -> FrameSize {
        self.size
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            Shape::Rect { .. } => None,
        })
    }
}
