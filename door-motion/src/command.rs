use std::fmt::{Display, Formatter};

/// One motion request for the robot base.
///
/// Distances are millimetres, angles degrees (positive turns counter-clockwise, i.e. left),
/// velocities mm/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationCommand {
    Advance { distance: i16, velocity: i16 },
    Rotate { angle: i16, velocity: i16 },
    Stop,
}

impl Display for NavigationCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationCommand::Advance { distance, velocity } => {
                write!(f, "advance {distance} mm at {velocity} mm/s")
            }
            NavigationCommand::Rotate { angle, velocity } => {
                write!(f, "rotate {angle} deg at {velocity} mm/s")
            }
            NavigationCommand::Stop => write!(f, "stop"),
        }
    }
}
