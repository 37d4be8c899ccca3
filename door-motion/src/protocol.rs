//! Roomba Open Interface directives.
//!
//! Multi-byte operands are big-endian two's complement. A rotate or move is sent as one
//! write: start driving, have the interface wait until the angle or distance is covered,
//! then stop.

use crate::command::NavigationCommand;

pub mod opcode {
    pub const START: u8 = 0x80;
    /// Legacy "control" opcode, equivalent to safe mode.
    pub const CONTROL: u8 = 0x82;
    pub const DRIVE: u8 = 0x89;
    pub const WAIT_DISTANCE: u8 = 0x9C;
    pub const WAIT_ANGLE: u8 = 0x9D;
}

/// Drive radius meaning "straight ahead".
pub const RADIUS_STRAIGHT: i16 = i16::MIN;
/// Drive radius for spinning in place counter-clockwise.
pub const RADIUS_SPIN_CCW: i16 = 1;
/// Drive radius for spinning in place clockwise.
pub const RADIUS_SPIN_CW: i16 = -1;
pub const MAX_VELOCITY: i16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Start,
    Control,
    Rotate { angle: i16, velocity: i16 },
    Move { distance: i16, velocity: i16 },
    Stop,
}

impl From<NavigationCommand> for Directive {
    fn from(command: NavigationCommand) -> Self {
        match command {
            NavigationCommand::Advance { distance, velocity } => Directive::Move { distance, velocity },
            NavigationCommand::Rotate { angle, velocity } => Directive::Rotate { angle, velocity },
            NavigationCommand::Stop => Directive::Stop,
        }
    }
}

impl Directive {
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            Directive::Start => vec![opcode::START],
            Directive::Control => vec![opcode::CONTROL],
            Directive::Stop => drive(0, 0).to_vec(),
            Directive::Rotate { angle, velocity } => {
                let radius = if angle > 0 { RADIUS_SPIN_CCW } else { RADIUS_SPIN_CW };
                let mut bytes = drive(speed(velocity), radius).to_vec();
                bytes.push(opcode::WAIT_ANGLE);
                bytes.extend_from_slice(&angle.to_be_bytes());
                bytes.extend_from_slice(&drive(0, 0));
                bytes
            }
            Directive::Move { distance, velocity } => {
                let velocity = if distance < 0 { -speed(velocity) } else { speed(velocity) };
                let mut bytes = drive(velocity, RADIUS_STRAIGHT).to_vec();
                bytes.push(opcode::WAIT_DISTANCE);
                bytes.extend_from_slice(&distance.to_be_bytes());
                bytes.extend_from_slice(&drive(0, 0));
                bytes
            }
        }
    }
}

fn speed(velocity: i16) -> i16 {
    velocity.saturating_abs().min(MAX_VELOCITY)
}

fn drive(velocity: i16, radius: i16) -> [u8; 5] {
    let [v_hi, v_lo] = velocity.to_be_bytes();
    let [r_hi, r_lo] = radius.to_be_bytes();
    [opcode::DRIVE, v_hi, v_lo, r_hi, r_lo]
}
