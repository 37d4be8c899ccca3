use crate::command::NavigationCommand;
use crate::error::{Error, Result};
use crate::protocol::Directive;
use crate::transport::Transport;
use log::{debug, error, info, warn};
use std::thread;
use std::time::Duration;

/// How long to wait after a directive before the next frame is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settle {
    Standard,
    /// After the lag-compensating turn made when a door is first aligned.
    Correction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTiming {
    pub settle: Duration,
    pub correction_settle: Duration,
    pub start_delay: Duration,
    pub control_delay: Duration,
    pub stop_delay: Duration,
}

impl Default for MotionTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            correction_settle: Duration::from_secs(2),
            start_delay: Duration::from_secs(1),
            control_delay: Duration::from_secs(2),
            stop_delay: Duration::from_millis(200),
        }
    }
}

impl MotionTiming {
    /// No waits at all; for driving the actuator against a mock link.
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            correction_settle: Duration::ZERO,
            start_delay: Duration::ZERO,
            control_delay: Duration::ZERO,
            stop_delay: Duration::ZERO,
        }
    }

    pub fn settle_for(&self, settle: Settle) -> Duration {
        match settle {
            Settle::Standard => self.settle,
            Settle::Correction => self.correction_settle,
        }
    }
}

/// Executes navigation commands on the robot base. Every call blocks until the motion
/// has had time to complete.
pub trait MotionActuator {
    /// Puts the base under external control.
    fn wake(&mut self) -> Result<()>;

    /// Issues one directive for `command`, then waits out the settle delay.
    fn execute(&mut self, command: NavigationCommand, settle: Settle) -> Result<()>;

    /// Stops both drive wheels if the link is still usable. Idempotent.
    fn shutdown(&mut self) -> Result<()>;
}

impl<T: MotionActuator + ?Sized> MotionActuator for Box<T> {
    fn wake(&mut self) -> Result<()> {
        (**self).wake()
    }

    fn execute(&mut self, command: NavigationCommand, settle: Settle) -> Result<()> {
        (**self).execute(command, settle)
    }

    fn shutdown(&mut self) -> Result<()> {
        (**self).shutdown()
    }
}

pub struct RoombaActuator<T: Transport> {
    transport: T,
    timing: MotionTiming,
    link_open: bool,
}

impl<T: Transport> RoombaActuator<T> {
    pub fn new(transport: T, timing: MotionTiming) -> Self {
        Self {
            transport,
            timing,
            link_open: true,
        }
    }

    pub fn is_link_open(&self) -> bool {
        self.link_open
    }

    /// Writes one directive. Any failure closes the link for good.
    fn send(&mut self, directive: Directive) -> Result<()> {
        if !self.link_open {
            return Err(Error::LinkClosed);
        }

        let bytes = directive.encode();
        let written = self
            .transport
            .write(&bytes)
            .and_then(|written| self.transport.flush().map(|_| written));

        match written {
            Ok(written) if written == bytes.len() => {
                debug!("Sent {directive:?}: {bytes:02X?}");
                Ok(())
            }
            Ok(written) => {
                self.link_open = false;
                Err(Error::ShortWrite {
                    written,
                    expected: bytes.len(),
                })
            }
            Err(e) => {
                self.link_open = false;
                error!("Motor link failed while sending {directive:?}: {e}");
                Err(e)
            }
        }
    }
}

impl<T: Transport> MotionActuator for RoombaActuator<T> {
    fn wake(&mut self) -> Result<()> {
        self.send(Directive::Start)?;
        thread::sleep(self.timing.start_delay);
        self.send(Directive::Control)?;
        thread::sleep(self.timing.control_delay);
        info!("Robot base under external control");
        Ok(())
    }

    fn execute(&mut self, command: NavigationCommand, settle: Settle) -> Result<()> {
        self.send(Directive::from(command))?;
        thread::sleep(self.timing.settle_for(settle));
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if !self.link_open {
            return Ok(());
        }

        self.send(Directive::Stop)?;
        thread::sleep(self.timing.stop_delay);
        self.link_open = false;
        info!("Robot base stopped, motor link closed");
        Ok(())
    }
}

impl<T: Transport> Drop for RoombaActuator<T> {
    fn drop(&mut self) {
        if self.link_open {
            warn!("Motor link dropped while open, sending stop");
            if let Err(e) = self.shutdown() {
                error!("Failed to stop robot base: {e}");
            }
        }
    }
}
