//! Mock transport for testing

use super::Transport;
use crate::error::Result;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Mock transport recording every write; clones share the same record
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Default)]
struct MockTransportInner {
    writes: Vec<Vec<u8>>,
    fail_after: Option<usize>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every write once `writes` writes have succeeded
    pub fn fail_after(&self, writes: usize) {
        self.inner.lock().fail_after = Some(writes);
    }

    /// Get every write, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.inner.lock().writes.clone()
    }

}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        if inner.fail_after.is_some_and(|limit| inner.writes.len() >= limit) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock link down").into());
        }
        inner.writes.push(data.to_vec());
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
