pub mod config;
pub mod navigation;
pub mod scanner;

pub use config::ScannerConfig;
pub use navigation::{Decision, Maneuver, NavigationPolicy, ScanPhase};
pub use scanner::{DoorScanner, LoopExit, ScanSummary};
