use crate::config::NavigationConfig;
use crate::navigation::{Decision, Maneuver, ScanPhase};
use door_inference::DetectionVector;
use door_motion::NavigationCommand;

/// Maps a frame's door vector and the current phase to a motion.
#[derive(Debug, Clone, Copy)]
pub struct NavigationPolicy {
    params: NavigationConfig,
}

impl NavigationPolicy {
    pub fn new(params: NavigationConfig) -> Self {
        Self { params }
    }

    pub fn decide(&self, vector: DetectionVector, phase: ScanPhase) -> Decision {
        let maneuver = Self::maneuver(vector);
        let NavigationConfig {
            velocity,
            angle_steps,
            distance_steps,
        } = self.params;

        let rotate = |angle: i16| NavigationCommand::Rotate { angle, velocity };
        let advance = NavigationCommand::Advance {
            distance: distance_steps,
            velocity,
        };

        let (correction, command, mut next) = match maneuver {
            Maneuver::Advance => match phase {
                // The detector sees the frame from before the last turn finished; a hard
                // clockwise turn lines the robot up before it first drives at the door.
                ScanPhase::Scanning => (
                    Some(rotate(angle_steps.saturating_mul(-2))),
                    advance,
                    ScanPhase::Tracking,
                ),
                ScanPhase::Tracking => (None, advance, ScanPhase::Tracking),
            },
            // Negative angles turn clockwise.
            Maneuver::TurnRight => (None, rotate(angle_steps.saturating_neg()), phase),
            Maneuver::TurnLeft | Maneuver::Scan => (None, rotate(angle_steps), phase),
        };

        // Door lost after advancing: re-arm the correction for the next sighting.
        if next == ScanPhase::Tracking && vector.is_empty() {
            next = ScanPhase::Scanning;
        }

        Decision {
            maneuver,
            correction,
            command,
            phase: next,
        }
    }

    fn maneuver(vector: DetectionVector) -> Maneuver {
        let [far_left, left, right, far_right] = vector.as_array();

        if (left && right) || vector.count() > 1 {
            Maneuver::Advance
        } else if (left && !right) || far_left {
            Maneuver::TurnRight
        } else if (right && far_right) || far_right {
            Maneuver::TurnLeft
        } else {
            Maneuver::Scan
        }
    }
}
