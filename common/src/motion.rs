use log::{debug, info};

use crate::board::Square;
use crate::config::Config;
use crate::error::{ControlError, ControlResult};
use crate::hal::{BoardHal, Motor};

/// Closed set of carriage travel primitives. Every trip decomposes into at
/// most a diagonal leg and one straight leg; free vectors are not part of
/// the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
    LrBt,
    RlTb,
    LrTb,
    RlBt,
}

impl Direction {
    /// Classify a step delta. `None` means no travel.
    pub fn classify(dx: i32, dy: i32) -> Option<Direction> {
        match (dx.signum(), dy.signum()) {
            (0, 0) => None,
            (1, 0) => Some(Direction::LeftRight),
            (-1, 0) => Some(Direction::RightLeft),
            (0, 1) => Some(Direction::BottomTop),
            (0, -1) => Some(Direction::TopBottom),
            (1, 1) => Some(Direction::LrBt),
            (-1, -1) => Some(Direction::RlTb),
            (1, -1) => Some(Direction::LrTb),
            (-1, 1) => Some(Direction::RlBt),
            _ => None,
        }
    }

    /// Direction-pin levels asserted per motor. `None` leaves that motor
    /// parked for the leg.
    fn levels(self) -> (Option<bool>, Option<bool>) {
        match self {
            Direction::LeftRight => (Some(true), None),
            Direction::RightLeft => (Some(false), None),
            Direction::BottomTop => (None, Some(true)),
            Direction::TopBottom => (None, Some(false)),
            Direction::LrBt => (Some(true), Some(true)),
            Direction::RlTb => (Some(false), Some(false)),
            Direction::LrTb => (Some(true), Some(false)),
            Direction::RlBt => (Some(false), Some(true)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    /// Calibration profile.
    Slow,
    /// Normal play profile.
    Fast,
}

/// Converts board squares into carriage travel and sequences the
/// electromagnet. Position is tracked in whole motor steps from the homed
/// corner; the steppers are open-loop, so any interruption mid-travel makes
/// the count untrustworthy and only a new calibration pass restores it.
pub struct MotionPlanner {
    square_size_mm: f32,
    start_offset_mm: (f32, f32),
    steps_per_mm: f32,
    slow_delay_us: u32,
    fast_delay_us: u32,
    position_steps: (i32, i32),
    calibrated: bool,
}

impl MotionPlanner {
    pub fn new(cfg: &Config) -> Self {
        Self {
            square_size_mm: cfg.square_size_mm,
            start_offset_mm: (cfg.start_offset_x_mm, cfg.start_offset_y_mm),
            steps_per_mm: cfg.steps_per_mm,
            slow_delay_us: cfg.step_delay_slow_us,
            fast_delay_us: cfg.step_delay_fast_us,
            position_steps: (0, 0),
            calibrated: false,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Drop all trust in the tracked position, e.g. after a stall or power
    /// interruption was reported. Motion is refused until `calibrate` runs.
    pub fn invalidate(&mut self) {
        self.calibrated = false;
    }

    /// Open-loop homing: drive both axes past full travel toward the
    /// mechanical origin at the calibration speed, then zero the counters.
    /// The frame itself is the reference; there are no limit switches.
    pub fn calibrate<H: BoardHal>(&mut self, hal: &mut H) {
        hal.set_magnet(false);
        let span_mm =
            self.start_offset_mm.0.max(self.start_offset_mm.1) + 8.0 * self.square_size_mm;
        let span_steps = (span_mm * self.steps_per_mm).ceil() as i32 + 16;
        hal.set_motor_dir(Motor::White, false);
        hal.set_motor_dir(Motor::Black, false);
        for _ in 0..span_steps {
            hal.pulse_motor(Motor::White);
            hal.pulse_motor(Motor::Black);
            hal.sleep_us(self.slow_delay_us);
        }
        self.position_steps = (0, 0);
        self.calibrated = true;
        info!("carriage homed ({span_steps} steps per axis)");
    }

    pub fn position_steps(&self) -> (i32, i32) {
        self.position_steps
    }

    /// Step position of a square center, relative to the homed corner.
    pub fn square_position_steps(&self, sq: Square) -> (i32, i32) {
        let x = self.start_offset_mm.0 + f32::from(sq.file()) * self.square_size_mm;
        let y = self.start_offset_mm.1 + f32::from(sq.rank()) * self.square_size_mm;
        (
            (x * self.steps_per_mm).round() as i32,
            (y * self.steps_per_mm).round() as i32,
        )
    }

    /// Carry one piece. The magnet engages only once the carriage sits under
    /// the origin square and releases only after the destination leg is
    /// complete.
    pub fn move_piece<H: BoardHal>(
        &mut self,
        hal: &mut H,
        from: Square,
        to: Square,
        speed: Speed,
    ) -> ControlResult<()> {
        self.ensure_calibrated()?;
        self.travel_to(hal, self.square_position_steps(from), speed);
        hal.set_magnet(true);
        self.travel_to(hal, self.square_position_steps(to), speed);
        hal.set_magnet(false);
        debug!("carried piece {from} -> {to}");
        Ok(())
    }

    /// Drag a captured piece off the grid and drop it in the margin lane at
    /// the home corner.
    pub fn discard<H: BoardHal>(
        &mut self,
        hal: &mut H,
        sq: Square,
        speed: Speed,
    ) -> ControlResult<()> {
        self.ensure_calibrated()?;
        self.travel_to(hal, self.square_position_steps(sq), speed);
        hal.set_magnet(true);
        self.travel_to(hal, (0, 0), speed);
        hal.set_magnet(false);
        debug!("discarded piece from {sq}");
        Ok(())
    }

    fn ensure_calibrated(&self) -> ControlResult<()> {
        if self.calibrated {
            Ok(())
        } else {
            Err(ControlError::NotCalibrated)
        }
    }

    fn step_delay(&self, speed: Speed) -> u32 {
        match speed {
            Speed::Slow => self.slow_delay_us,
            Speed::Fast => self.fast_delay_us,
        }
    }

    fn travel_to<H: BoardHal>(&mut self, hal: &mut H, target: (i32, i32), speed: Speed) {
        let dx = target.0 - self.position_steps.0;
        let dy = target.1 - self.position_steps.1;
        let delay = self.step_delay(speed);
        // Diagonal leg first, then the straight remainder.
        let diag = dx.abs().min(dy.abs());
        if let Some(dir) = Direction::classify(dx.signum() * diag, dy.signum() * diag) {
            self.run_leg(hal, dir, diag, delay);
        }
        let (rx, ry) = (dx - dx.signum() * diag, dy - dy.signum() * diag);
        if let Some(dir) = Direction::classify(rx, ry) {
            self.run_leg(hal, dir, rx.abs().max(ry.abs()), delay);
        }
        self.position_steps = target;
    }

    fn run_leg<H: BoardHal>(&mut self, hal: &mut H, dir: Direction, steps: i32, delay_us: u32) {
        let (x_level, y_level) = dir.levels();
        if let Some(level) = x_level {
            hal.set_motor_dir(Motor::White, level);
        }
        if let Some(level) = y_level {
            hal.set_motor_dir(Motor::Black, level);
        }
        for _ in 0..steps {
            if x_level.is_some() {
                hal.pulse_motor(Motor::White);
            }
            if y_level.is_some() {
                hal.pulse_motor(Motor::Black);
            }
            hal.sleep_us(delay_us);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::hal::ReedBank;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Dir(Motor, bool),
        Pulse(Motor),
        Magnet(bool),
    }

    #[derive(Default)]
    struct RecHal {
        events: Vec<Event>,
    }

    impl BoardHal for RecHal {
        fn set_mux_address(&mut self, _pattern: [bool; 4]) {}
        fn read_reed_bank(&mut self, _bank: ReedBank) -> bool {
            false
        }
        fn set_motor_dir(&mut self, motor: Motor, forward: bool) {
            self.events.push(Event::Dir(motor, forward));
        }
        fn pulse_motor(&mut self, motor: Motor) {
            self.events.push(Event::Pulse(motor));
        }
        fn set_magnet(&mut self, on: bool) {
            self.events.push(Event::Magnet(on));
        }
        fn button_pressed(&mut self, _side: Color) -> bool {
            false
        }
        fn now_ms(&self) -> u32 {
            0
        }
        fn sleep_us(&mut self, _us: u32) {}
    }

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn calibrated_planner(hal: &mut RecHal) -> MotionPlanner {
        let mut planner = MotionPlanner::new(&Config::default());
        planner.calibrate(hal);
        hal.events.clear();
        planner
    }

    #[test]
    fn motion_is_refused_before_homing() {
        let mut hal = RecHal::default();
        let mut planner = MotionPlanner::new(&Config::default());
        let err = planner
            .move_piece(&mut hal, sq("e2"), sq("e4"), Speed::Fast)
            .unwrap_err();
        assert!(matches!(err, ControlError::NotCalibrated));
        assert!(hal.events.is_empty());
    }

    #[test]
    fn invalidate_drops_position_trust() {
        let mut hal = RecHal::default();
        let mut planner = calibrated_planner(&mut hal);
        planner.invalidate();
        assert!(planner
            .move_piece(&mut hal, sq("a1"), sq("a2"), Speed::Fast)
            .is_err());
    }

    #[test]
    fn round_trip_returns_to_the_same_step_position() {
        let mut hal = RecHal::default();
        let mut planner = calibrated_planner(&mut hal);

        planner
            .move_piece(&mut hal, sq("b1"), sq("c3"), Speed::Fast)
            .unwrap();
        let after_first = planner.position_steps();
        assert_eq!(after_first, planner.square_position_steps(sq("c3")));

        planner
            .move_piece(&mut hal, sq("c3"), sq("b1"), Speed::Fast)
            .unwrap();
        assert_eq!(
            planner.position_steps(),
            planner.square_position_steps(sq("b1"))
        );
    }

    #[test]
    fn magnet_engages_at_origin_and_releases_after_destination() {
        let mut hal = RecHal::default();
        let mut planner = calibrated_planner(&mut hal);
        planner
            .move_piece(&mut hal, sq("e2"), sq("e4"), Speed::Fast)
            .unwrap();

        let magnets: Vec<usize> = hal
            .events
            .iter()
            .enumerate()
            .filter_map(|(i, e)| matches!(e, Event::Magnet(_)).then_some(i))
            .collect();
        assert_eq!(magnets.len(), 2);
        assert_eq!(hal.events[magnets[0]], Event::Magnet(true));
        assert_eq!(*hal.events.last().unwrap(), Event::Magnet(false));
        // The destination leg happens strictly between engage and release.
        assert!(hal.events[magnets[0] + 1..magnets[1]]
            .iter()
            .any(|e| matches!(e, Event::Pulse(_))));
    }

    #[test]
    fn straight_travel_pulses_a_single_axis() {
        let mut hal = RecHal::default();
        let mut planner = calibrated_planner(&mut hal);
        // Carriage is at the home corner; first approach e2, then drag to e4.
        planner
            .move_piece(&mut hal, sq("e2"), sq("e4"), Speed::Fast)
            .unwrap();

        let engage = hal
            .events
            .iter()
            .position(|e| *e == Event::Magnet(true))
            .unwrap();
        let drag = &hal.events[engage + 1..];
        // e2 -> e4 is two ranks straight up: only the rank motor pulses.
        assert!(drag
            .iter()
            .filter(|e| matches!(e, Event::Pulse(_)))
            .all(|e| *e == Event::Pulse(Motor::Black)));
        let expected = planner.square_position_steps(sq("e4")).1
            - planner.square_position_steps(sq("e2")).1;
        let pulses = drag.iter().filter(|e| matches!(e, Event::Pulse(_))).count();
        assert_eq!(pulses as i32, expected);
    }

    #[test]
    fn discard_parks_at_the_home_corner() {
        let mut hal = RecHal::default();
        let mut planner = calibrated_planner(&mut hal);
        planner.discard(&mut hal, sq("d5"), Speed::Fast).unwrap();
        assert_eq!(planner.position_steps(), (0, 0));
        assert_eq!(*hal.events.last().unwrap(), Event::Magnet(false));
    }

    #[test]
    fn classify_covers_the_travel_vocabulary() {
        assert_eq!(Direction::classify(0, 0), None);
        assert_eq!(Direction::classify(5, 0), Some(Direction::LeftRight));
        assert_eq!(Direction::classify(-5, 0), Some(Direction::RightLeft));
        assert_eq!(Direction::classify(0, 5), Some(Direction::BottomTop));
        assert_eq!(Direction::classify(0, -5), Some(Direction::TopBottom));
        assert_eq!(Direction::classify(3, 3), Some(Direction::LrBt));
        assert_eq!(Direction::classify(-3, -3), Some(Direction::RlTb));
        assert_eq!(Direction::classify(3, -3), Some(Direction::LrTb));
        assert_eq!(Direction::classify(-3, 3), Some(Direction::RlBt));
    }
}
