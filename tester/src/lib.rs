pub mod board_physics;
pub mod scripted_oracle;
pub mod sim_hal;

pub use board_physics::BoardPhysics;
pub use scripted_oracle::ScriptedOracle;
pub use sim_hal::SimHal;
