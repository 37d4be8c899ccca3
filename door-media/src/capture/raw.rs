use crate::capture::FrameSource;
use crate::frame::{Frame, FrameSize};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::{ErrorKind, Read};

/// Reads fixed-size packed bgr24 frames from a byte stream, e.g. the output of
/// `ffmpeg -i <input> -f rawvideo -pix_fmt bgr24 -`.
pub struct RawVideoSource<R: Read> {
    reader: R,
    size: FrameSize,
    frames_read: u64,
    finished: bool,
}

impl<R: Read> RawVideoSource<R> {
    pub fn new(reader: R, size: FrameSize) -> Self {
        Self {
            reader,
            size,
            frames_read: 0,
            finished: false,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn fill(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buffer.len() {
            match self.reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("Failed to read raw video stream."),
            }
        }

        Ok(filled)
    }
}

impl<R: Read> FrameSource for RawVideoSource<R> {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        let mut buffer = vec![0u8; self.size.byte_len()];
        let filled = self.fill(&mut buffer)?;

        if filled < buffer.len() {
            self.finished = true;
            if filled > 0 {
                warn!(
                    "Dropping truncated frame after {} frames ({} of {} bytes).",
                    self.frames_read,
                    filled,
                    buffer.len()
                );
            }
            debug!("Raw video stream ended after {} frames.", self.frames_read);
            return Ok(None);
        }

        self.frames_read += 1;
        Frame::new(self.size, buffer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_whole_frames_until_eof() -> Result<()> {
        let size = FrameSize::new(4, 1);
        let mut bytes = vec![7u8; size.byte_len()];
        bytes.extend(vec![9u8; size.byte_len()]);

        let mut source = RawVideoSource::new(Cursor::new(bytes), size);
        let first = source.read_frame()?.expect("first frame");
        let second = source.read_frame()?.expect("second frame");

        assert!(first.raw_data().iter().all(|&b| b == 7));
        assert!(second.raw_data().iter().all(|&b| b == 9));
        assert!(source.read_frame()?.is_none());
        assert!(source.read_frame()?.is_none());
        assert_eq!(source.frames_read(), 2);
        Ok(())
    }

    #[test]
    fn frames_too_narrow_to_segment_are_an_error() {
        let size = FrameSize::new(2, 2);
        let mut source = RawVideoSource::new(Cursor::new(vec![0u8; size.byte_len()]), size);
        assert!(source.read_frame().is_err());
    }

    #[test]
    fn truncated_tail_ends_stream() -> Result<()> {
        let size = FrameSize::new(4, 1);
        let bytes = vec![1u8; size.byte_len() + 5];

        let mut source = RawVideoSource::new(Cursor::new(bytes), size);
        assert!(source.read_frame()?.is_some());
        assert!(source.read_frame()?.is_none());
        Ok(())
    }
}
