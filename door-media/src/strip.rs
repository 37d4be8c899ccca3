use crate::frame::{Frame, BGR};

pub const STRIP_COUNT: usize = 4;

/// Column extent `[left, right)` of one vertical band of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StripBounds {
    pub index: usize,
    pub left: u32,
    pub right: u32,
    pub height: u32,
}

impl StripBounds {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Splits a `width` x `height` frame into four bands, left to right.
    /// Boundaries are rounded to the nearest column, ties to even, so the last band always
    /// ends at `width`.
    pub fn split(width: u32, height: u32) -> [StripBounds; STRIP_COUNT] {
        let quarter = width as f64 / STRIP_COUNT as f64;
        let edge = |i: usize| ((quarter * i as f64).round_ties_even() as u32).min(width);

        std::array::from_fn(|index| StripBounds {
            index,
            left: edge(index),
            right: edge(index + 1),
            height,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Strip<'a> {
    frame: &'a Frame,
    bounds: StripBounds,
}

impl<'a> Strip<'a> {
    pub fn bounds(&self) -> StripBounds {
        self.bounds
    }

    pub fn index(&self) -> usize {
        self.bounds.index
    }

    pub fn get_width(&self) -> u32 {
        self.bounds.width()
    }

    pub fn get_height(&self) -> u32 {
        self.bounds.height
    }

    /// Pixel at `(x, y)` relative to the strip's left edge.
    pub fn pixel(&self, x: u32, y: u32) -> BGR {
        self.frame.pixel(self.bounds.left + x, y)
    }
}

pub trait SegmentFrame {
    fn segment(&self) -> [Strip<'_>; STRIP_COUNT];
}

impl SegmentFrame for Frame {
    fn segment(&self) -> [Strip<'_>; STRIP_COUNT] {
        StripBounds::split(self.get_width(), self.get_height()).map(|bounds| Strip {
            frame: self,
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameSize;

    #[test]
    fn quarters_of_vga() {
        let bounds = StripBounds::split(640, 480);
        let extents = bounds.map(|b| (b.left, b.right));

        assert_eq!(extents, [(0, 160), (160, 320), (320, 480), (480, 640)]);
        assert!(bounds.iter().all(|b| b.height == 480));
    }

    #[test]
    fn rounds_uneven_widths_to_nearest_column() {
        // 10 / 4 = 2.5 per strip: edges at 0, 2.5, 5, 7.5, 10; halves go to the even column
        let extents = StripBounds::split(10, 1).map(|b| (b.left, b.right));
        assert_eq!(extents, [(0, 2), (2, 5), (5, 8), (8, 10)]);

        let extents = StripBounds::split(6, 1).map(|b| (b.left, b.right));
        assert_eq!(extents, [(0, 2), (2, 3), (3, 4), (4, 6)]);

        let extents = StripBounds::split(7, 1).map(|b| (b.left, b.right));
        assert_eq!(extents, [(0, 2), (2, 4), (4, 5), (5, 7)]);
    }

    #[test]
    fn strips_cover_frame_without_overlap() {
        for width in 4..=97 {
            let bounds = StripBounds::split(width, 3);
            assert_eq!(bounds[0].left, 0);
            assert_eq!(bounds[3].right, width);
            for pair in bounds.windows(2) {
                assert_eq!(pair[0].right, pair[1].left);
            }
        }
    }

    #[test]
    fn segmenting_twice_gives_same_bounds() -> anyhow::Result<()> {
        let frame = Frame::filled(FrameSize::new(637, 211), BGR(9, 9, 9))?;
        let first = frame.segment().map(|s| s.bounds());
        let second = frame.segment().map(|s| s.bounds());

        assert_eq!(first, second);
        assert_eq!(first.map(|b| b.index), [0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn strip_pixels_are_offset_by_left_edge() -> anyhow::Result<()> {
        let mut frame = Frame::filled(FrameSize::new(8, 2), BGR(0, 0, 0))?;
        frame.fill_columns(6, 8, BGR::GREEN);

        let strips = frame.segment();
        assert_eq!(strips[3].pixel(0, 1), BGR::GREEN);
        assert_eq!(strips[2].pixel(1, 1), BGR(0, 0, 0));
        Ok(())
    }
}
