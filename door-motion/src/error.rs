//! Error types for the motor link

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A previous write failed; the robot's state is unknown
    #[error("Motor link is closed")]
    LinkClosed,

    /// Write accepted fewer bytes than the directive holds
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}
