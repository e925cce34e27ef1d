use crate::board::Color;

/// One of the four 16-channel reed banks. All banks share the multiplexer
/// address lines and expose one signal line each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReedBank {
    A,
    B,
    C,
    D,
}

impl ReedBank {
    pub const ALL: [ReedBank; 4] = [ReedBank::A, ReedBank::B, ReedBank::C, ReedBank::D];

    /// Linear square index of this bank's channel 0.
    pub const fn base_index(self) -> usize {
        match self {
            ReedBank::A => 0,
            ReedBank::B => 16,
            ReedBank::C => 32,
            ReedBank::D => 48,
        }
    }
}

/// The two carriage steppers. The white-side motor drives the file axis,
/// the black-side motor the rank axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motor {
    White,
    Black,
}

/// The Hardware Abstraction Layer trait required by the board controller.
/// The same logic runs against real pins on the target and against the
/// simulated bench in tests.
pub trait BoardHal {
    /// Drive the four shared multiplexer address lines.
    fn set_mux_address(&mut self, pattern: [bool; 4]);

    /// Read the routed signal line of one reed bank. High = switch closed.
    /// Only valid one settle interval after the address lines changed.
    fn read_reed_bank(&mut self, bank: ReedBank) -> bool;

    /// Latch the travel direction of one stepper. High = increasing
    /// coordinate (left-to-right, bottom-to-top).
    fn set_motor_dir(&mut self, motor: Motor, forward: bool);

    /// Issue a single step pulse on one stepper.
    fn pulse_motor(&mut self, motor: Motor);

    /// Switch the carriage electromagnet.
    fn set_magnet(&mut self, on: bool);

    /// Manual override button for one side. True while pressed.
    fn button_pressed(&mut self, side: Color) -> bool;

    /// Monotonic milliseconds since startup.
    fn now_ms(&self) -> u32;

    /// Busy-wait for the given number of microseconds.
    fn sleep_us(&mut self, us: u32);
}
