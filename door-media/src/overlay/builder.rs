use crate::frame::{FrameSize, BGR};
use crate::overlay::{Overlay, Shape};
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy)]
pub struct Locked;
#[derive(Debug, Clone, Copy)]
pub struct UnLocked;

pub trait OverlayState {}

impl OverlayState for Locked {}
impl OverlayState for UnLocked {}

impl Overlay {
    pub fn builder(size: FrameSize) -> Overlay<UnLocked> {
        Overlay {
            size,
            shapes: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl Overlay<UnLocked> {
    pub fn draw_rect(
        mut self,
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: BGR,
        thickness: i32,
    ) -> Self {
        self.shapes.push(Shape::Rect {
            top_left,
            bottom_right,
            color,
            thickness,
        });
        self
    }

    pub fn draw_text(
        mut self,
        text: impl Into<String>,
        origin: (i32, i32),
        scale: f64,
        color: BGR,
        thickness: i32,
    ) -> Self {
        self.shapes.push(Shape::Text {
            text: text.into(),
            origin,
            scale,
            color,
            thickness,
        });
        self
    }

    pub fn build(self) -> Overlay<Locked> {
        Overlay {
            size: self.size,
            shapes: self.shapes,
            _marker: PhantomData,
        }
    }
}
