pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod hal;
pub mod inference;
pub mod motion;
pub mod oracle;
pub mod pinmap;
pub mod scanner;
pub mod sequence;

pub use board::{Color, MoveRecord, OccupancyGrid, Square};
pub use clock::ChessClock;
pub use config::Config;
pub use error::{ControlError, ControlResult};
pub use hal::{BoardHal, Motor, ReedBank};
pub use inference::{Inference, MoveInference};
pub use motion::{Direction, MotionPlanner, Speed};
pub use oracle::{GameEnd, MoveOracle, OracleVerdict};
pub use scanner::Scanner;
pub use sequence::{ControlStatus, Controller, GameOutcome, SequenceState};
