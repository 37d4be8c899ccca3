//! Motor side of the door scanner: navigation commands, their Roomba Open Interface
//! encodings, and the serial link they travel over.

pub mod actuator;
pub mod command;
pub mod error;
pub mod protocol;
pub mod transport;

pub use actuator::{MotionActuator, MotionTiming, RoombaActuator, Settle};
pub use command::NavigationCommand;
pub use error::{Error, Result};
pub use transport::{MockTransport, SerialTransport, Transport};
