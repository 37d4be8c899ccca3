use crate::strip::STRIP_COUNT;
use anyhow::{bail, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Bytes per packed bgr24 pixel.
pub const CHANNELS: usize = 3;
/// Narrowest frame that still gives every strip at least one column.
pub const MIN_FRAME_WIDTH: u32 = STRIP_COUNT as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BGR(pub u8, pub u8, pub u8);

impl BGR {
    pub const GREEN: BGR = BGR(0, 255, 0);
    pub const RED: BGR = BGR(0, 0, 255);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Wide enough to give every strip at least one column, and at least one row high.
    pub fn is_segmentable(&self) -> bool {
        self.width >= MIN_FRAME_WIDTH && self.height > 0
    }

    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }
}

impl Display for FrameSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for FrameSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w.trim().parse::<u32>().map_err(|e| format!("bad width '{w}': {e}"))?;
        let height = h.trim().parse::<u32>().map_err(|e| format!("bad height '{h}': {e}"))?;
        let size = Self { width, height };
        if !size.is_segmentable() {
            return Err(format!(
                "frame must be at least {MIN_FRAME_WIDTH} pixels wide and 1 high, got '{s}'"
            ));
        }

        Ok(size)
    }
}

/// One captured camera image, packed bgr24, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    size: FrameSize,
}

impl Frame {
    pub fn new(size: FrameSize, data: Vec<u8>) -> Result<Self> {
        if !size.is_segmentable() {
            bail!("Frame {size} is too small to split into {STRIP_COUNT} strips.");
        }
        if data.len() != size.byte_len() {
            bail!(
                "Frame buffer holds {} bytes, expected {} for {size} bgr24.",
                data.len(),
                size.byte_len()
            );
        }

        Ok(Self { data, size })
    }

    pub fn filled(size: FrameSize, color: BGR) -> Result<Self> {
        let data = [color.0, color.1, color.2].repeat(size.width as usize * size.height as usize);
        Self::new(size, data)
    }

    pub fn get_size(&self) -> FrameSize {
        self.size
    }

    pub fn get_width(&self) -> u32 {
        self.size.width
    }

    pub fn get_height(&self) -> u32 {
        self.size.height
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> BGR {
        let offset = self.offset(x, y);
        BGR(self.data[offset], self.data[offset + 1], self.data[offset + 2])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: BGR) {
        let offset = self.offset(x, y);
        self.data[offset..offset + CHANNELS].copy_from_slice(&[color.0, color.1, color.2]);
    }

    /// Paints the columns `[left, right)` over the full height.
    pub fn fill_columns(&mut self, left: u32, right: u32, color: BGR) {
        let right = right.min(self.size.width);
        for y in 0..self.size.height {
            for x in left..right {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.size.width && y < self.size.height);
        (y as usize * self.size.width as usize + x as usize) * CHANNELS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(Frame::new(FrameSize::new(4, 2), vec![0; 23]).is_err());
        assert!(Frame::new(FrameSize::new(0, 2), vec![]).is_err());
        assert!(Frame::new(FrameSize::new(4, 0), vec![]).is_err());
        assert!(Frame::new(FrameSize::new(4, 2), vec![0; 24]).is_ok());
    }

    #[test]
    fn pixels_are_packed_bgr() -> Result<()> {
        let mut frame = Frame::filled(FrameSize::new(4, 2), BGR(1, 2, 3))?;
        frame.set_pixel(2, 1, BGR::RED);

        assert_eq!(frame.pixel(0, 0), BGR(1, 2, 3));
        assert_eq!(frame.pixel(2, 1), BGR::RED);
        assert_eq!(&frame.raw_data()[18..21], &[0, 0, 255]);
        Ok(())
    }

    #[test]
    fn parses_frame_size() {
        assert_eq!("640x480".parse::<FrameSize>(), Ok(FrameSize::new(640, 480)));
        assert_eq!("32X8".parse::<FrameSize>(), Ok(FrameSize::new(32, 8)));
        assert!("640".parse::<FrameSize>().is_err());
        assert!("0x480".parse::<FrameSize>().is_err());
        assert!("axb".parse::<FrameSize>().is_err());
    }

    #[test]
    fn frames_narrower_than_the_strip_count_are_rejected() {
        for width in 1..MIN_FRAME_WIDTH {
            let size = FrameSize::new(width, 2);
            assert!(format!("{width}x2").parse::<FrameSize>().is_err());
            assert!(Frame::filled(size, BGR(0, 0, 0)).is_err());
        }
        assert!(!FrameSize::new(3, 480).is_segmentable());
        assert!(!FrameSize::new(640, 0).is_segmentable());
        assert!(FrameSize::new(4, 1).is_segmentable());
        assert_eq!("4x1".parse::<FrameSize>(), Ok(FrameSize::new(4, 1)));
        assert!(Frame::filled(FrameSize::new(4, 1), BGR(0, 0, 0)).is_ok());
    }
}
