//! Transport layer for the motor link

use crate::error::Result;

mod mock;
mod serial;

pub use mock::MockTransport;
pub use serial::SerialTransport;

/// Byte sink carrying directives to the robot
pub trait Transport {
    /// Write data from buffer, returns number of bytes written
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Flush any pending writes (blocking until complete)
    fn flush(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
