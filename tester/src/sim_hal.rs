use std::cell::RefCell;
use std::rc::Rc;

use chessboard_common::pinmap::MUX_CHANNEL;
use chessboard_common::{BoardHal, Color, Config, Motor, ReedBank, Square};

use crate::board_physics::BoardPhysics;

/// HAL over the simulated bench. The reed banks decode the latched address
/// pattern exactly the way the wiring table routes them, and step pulses
/// move the simulated carriage. Time advances only through `sleep_us` and
/// explicit `advance_ms` calls, so tests own the clock.
pub struct SimHal {
    physics: Rc<RefCell<BoardPhysics>>,
    mux_address: [bool; 4],
    dir_forward: [bool; 2],
    mm_per_step: f32,
    buttons: [bool; 2],
    now_us: u64,
}

impl SimHal {
    pub fn new(physics: Rc<RefCell<BoardPhysics>>, cfg: &Config) -> Self {
        Self {
            physics,
            mux_address: [false; 4],
            dir_forward: [true; 2],
            mm_per_step: 1.0 / cfg.steps_per_mm,
            buttons: [false; 2],
            now_us: 0,
        }
    }

    pub fn advance_ms(&mut self, ms: u32) {
        self.now_us += u64::from(ms) * 1000;
    }

    /// Latch one button press; it reads as pressed exactly once.
    pub fn press_button(&mut self, side: Color) {
        self.buttons[side.index()] = true;
    }

    fn motor_index(motor: Motor) -> usize {
        match motor {
            Motor::White => 0,
            Motor::Black => 1,
        }
    }
}

impl BoardHal for SimHal {
    fn set_mux_address(&mut self, pattern: [bool; 4]) {
        self.mux_address = pattern;
    }

    fn read_reed_bank(&mut self, bank: ReedBank) -> bool {
        let Some(channel) = MUX_CHANNEL.iter().position(|p| *p == self.mux_address) else {
            return false;
        };
        let index = bank.base_index() + channel;
        self.physics.borrow().reed_closed(Square::from_index(index))
    }

    fn set_motor_dir(&mut self, motor: Motor, forward: bool) {
        self.dir_forward[Self::motor_index(motor)] = forward;
    }

    fn pulse_motor(&mut self, motor: Motor) {
        let i = Self::motor_index(motor);
        let delta = if self.dir_forward[i] {
            self.mm_per_step
        } else {
            -self.mm_per_step
        };
        let (dx, dy) = if i == 0 { (delta, 0.0) } else { (0.0, delta) };
        self.physics.borrow_mut().move_carriage_mm(dx, dy);
    }

    fn set_magnet(&mut self, on: bool) {
        self.physics.borrow_mut().set_magnet(on);
    }

    fn button_pressed(&mut self, side: Color) -> bool {
        std::mem::take(&mut self.buttons[side.index()])
    }

    fn now_ms(&self) -> u32 {
        (self.now_us / 1000) as u32
    }

    fn sleep_us(&mut self, us: u32) {
        self.now_us += u64::from(us);
    }
}
