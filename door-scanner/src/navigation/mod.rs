mod policy;

pub use policy::NavigationPolicy;

use door_motion::NavigationCommand;
use std::fmt::{Display, Formatter};

/// Whether the robot still has to square up with a newly found door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanPhase {
    /// No aligned door yet; the next advance starts with a correction turn.
    #[default]
    Scanning,
    /// Aligned and advancing.
    Tracking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Maneuver {
    Advance,
    TurnRight,
    TurnLeft,
    Scan,
}

impl Display for Maneuver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Maneuver::Advance => write!(f, "advancing"),
            Maneuver::TurnRight => write!(f, "turning right"),
            Maneuver::TurnLeft => write!(f, "turning left"),
            Maneuver::Scan => write!(f, "looking for the room exit"),
        }
    }
}

/// Outcome of one policy step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub maneuver: Maneuver,
    /// Turn issued before `command` to make up for the frame delay.
    pub correction: Option<NavigationCommand>,
    pub command: NavigationCommand,
    /// Phase to carry into the next frame.
    pub phase: ScanPhase,
}
