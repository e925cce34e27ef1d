use chessboard_common::{Config, OccupancyGrid, Square};

/// Simulated bench: magnetized pieces on a reed grid plus the carriage and
/// electromagnet underneath. Positions are in millimeters from the homed
/// corner; the frame is a hard stop there.
pub struct BoardPhysics {
    pieces: OccupancyGrid,
    carriage_mm: (f32, f32),
    magnet_on: bool,
    holding: bool,
    discarded: u32,
    square_size_mm: f32,
    start_offset_mm: (f32, f32),
}

impl BoardPhysics {
    pub fn new(start: OccupancyGrid, cfg: &Config) -> Self {
        Self {
            pieces: start,
            carriage_mm: (0.0, 0.0),
            magnet_on: false,
            holding: false,
            discarded: 0,
            square_size_mm: cfg.square_size_mm,
            start_offset_mm: (cfg.start_offset_x_mm, cfg.start_offset_y_mm),
        }
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.pieces
    }

    pub fn carriage_mm(&self) -> (f32, f32) {
        self.carriage_mm
    }

    /// True while a piece hangs on the magnet.
    pub fn holding(&self) -> bool {
        self.holding
    }

    /// Pieces dropped out of play in the margin lane.
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    pub fn reed_closed(&self, sq: Square) -> bool {
        self.pieces.get(sq)
    }

    /// Human hand: take a piece off a square.
    pub fn lift(&mut self, sq: Square) {
        assert!(self.pieces.get(sq), "no piece on {sq}");
        self.pieces.set(sq, false);
    }

    /// Human hand: put a piece down.
    pub fn place(&mut self, sq: Square) {
        assert!(!self.pieces.get(sq), "{sq} already occupied");
        self.pieces.set(sq, true);
    }

    pub fn move_carriage_mm(&mut self, dx: f32, dy: f32) {
        self.carriage_mm.0 = (self.carriage_mm.0 + dx).max(0.0);
        self.carriage_mm.1 = (self.carriage_mm.1 + dy).max(0.0);
    }

    /// Engaging over an occupied square center picks that piece up; releasing
    /// drops it on the square underneath, or out of play when the carriage
    /// sits in the off-grid margin.
    pub fn set_magnet(&mut self, on: bool) {
        if on && !self.magnet_on {
            if let Some(sq) = self.square_under_carriage() {
                if self.pieces.get(sq) {
                    self.pieces.set(sq, false);
                    self.holding = true;
                }
            }
        } else if !on && self.magnet_on && self.holding {
            match self.square_under_carriage() {
                Some(sq) => self.pieces.set(sq, true),
                None => self.discarded += 1,
            }
            self.holding = false;
        }
        self.magnet_on = on;
    }

    fn square_under_carriage(&self) -> Option<Square> {
        let tolerance = self.square_size_mm / 4.0;
        let file = ((self.carriage_mm.0 - self.start_offset_mm.0) / self.square_size_mm).round();
        let rank = ((self.carriage_mm.1 - self.start_offset_mm.1) / self.square_size_mm).round();
        if !(0.0..=7.0).contains(&file) || !(0.0..=7.0).contains(&rank) {
            return None;
        }
        let center_x = self.start_offset_mm.0 + file * self.square_size_mm;
        let center_y = self.start_offset_mm.1 + rank * self.square_size_mm;
        if (self.carriage_mm.0 - center_x).abs() > tolerance
            || (self.carriage_mm.1 - center_y).abs() > tolerance
        {
            return None;
        }
        Square::new(file as u8, rank as u8).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn at_square(physics: &mut BoardPhysics, sq: Square) {
        let cfg = Config::default();
        let target = (
            cfg.start_offset_x_mm + f32::from(sq.file()) * cfg.square_size_mm,
            cfg.start_offset_y_mm + f32::from(sq.rank()) * cfg.square_size_mm,
        );
        let (x, y) = physics.carriage_mm();
        physics.move_carriage_mm(target.0 - x, target.1 - y);
    }

    #[test]
    fn magnet_carries_a_piece_between_squares() {
        let cfg = Config::default();
        let mut physics = BoardPhysics::new(OccupancyGrid::standard_start(), &cfg);

        at_square(&mut physics, sq("e2"));
        physics.set_magnet(true);
        assert!(physics.holding());
        assert!(!physics.reed_closed(sq("e2")));

        at_square(&mut physics, sq("e4"));
        physics.set_magnet(false);
        assert!(!physics.holding());
        assert!(physics.reed_closed(sq("e4")));
    }

    #[test]
    fn releasing_in_the_margin_discards_the_piece() {
        let cfg = Config::default();
        let mut physics = BoardPhysics::new(OccupancyGrid::standard_start(), &cfg);

        at_square(&mut physics, sq("a1"));
        physics.set_magnet(true);
        assert!(physics.holding());

        let (x, y) = physics.carriage_mm();
        physics.move_carriage_mm(-x, -y);
        physics.set_magnet(false);
        assert!(!physics.holding());
        let on_board = OccupancyGrid::squares()
            .filter(|&s| physics.reed_closed(s))
            .count();
        assert_eq!(on_board, 31);
        assert_eq!(physics.discarded(), 1);
    }

    #[test]
    fn frame_is_a_hard_stop() {
        let cfg = Config::default();
        let mut physics = BoardPhysics::new(OccupancyGrid::empty(), &cfg);
        physics.move_carriage_mm(-500.0, -500.0);
        assert_eq!(physics.carriage_mm(), (0.0, 0.0));
    }
}
