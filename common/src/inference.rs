use log::{debug, warn};

use crate::board::{MoveRecord, OccupancyGrid, Square};

/// What one fresh snapshot told us about the move in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inference {
    /// Board matches the confirmed state, nothing is happening.
    Idle,
    /// One piece is in the air; waiting for it to land.
    InProgress,
    /// More squares differ than a single move can explain. The board must
    /// return to one coherent difference, or exactly to the confirmed state.
    NoValidMove,
    /// A completed move. Confirmed state has been advanced to the snapshot.
    Resolved(MoveRecord),
}

/// Turns the evolving occupancy snapshots into completed moves.
///
/// The engine keeps two grids beside the live snapshot: the confirmed state
/// (last accepted position) and a transient snapshot of the previous sweep,
/// used to tell "piece still in hand" from "piece placed". Occupancy alone
/// cannot name pieces, so a capture is reported as origin vacated plus a
/// previously occupied destination going empty and filled again; legality
/// stays the oracle's problem. `first_lift` remembers which square went
/// empty while it was the only one, so a piece returned after a multi-lift
/// incoherence is not mistaken for a capture landing.
pub struct MoveInference {
    confirmed: OccupancyGrid,
    transient: OccupancyGrid,
    previous: OccupancyGrid,
    first_lift: Option<Square>,
    no_valid_move: bool,
}

impl MoveInference {
    pub fn new(initial: OccupancyGrid) -> Self {
        Self {
            confirmed: initial,
            transient: initial,
            previous: initial,
            first_lift: None,
            no_valid_move: false,
        }
    }

    pub fn confirmed(&self) -> &OccupancyGrid {
        &self.confirmed
    }

    pub fn no_valid_move(&self) -> bool {
        self.no_valid_move
    }

    /// Feed one full sweep. Must only be called with snapshots taken while
    /// the carriage is at rest; motion and the magnet fake reed transitions.
    pub fn update(&mut self, scan: &OccupancyGrid) -> Inference {
        if *scan == self.confirmed {
            // Also covers an aborted move: piece went back to its square.
            self.transient = self.confirmed;
            self.first_lift = None;
            self.no_valid_move = false;
            return Inference::Idle;
        }

        let vacated = self.confirmed.occupied_not_in(scan);
        let filled = scan.occupied_not_in(&self.confirmed);
        let placed = scan.occupied_not_in(&self.transient);

        let resolved = match (vacated.as_slice(), filled.as_slice()) {
            ([origin], [dest]) => Some(MoveRecord {
                from: *origin,
                to: *dest,
            }),
            // Capture: the captured piece came off first, while its square
            // was the only lifted one, and the capturing piece just landed
            // there. A placement onto a square that went empty together with
            // others is indistinguishable from the piece being put back, so
            // it never resolves.
            ([origin], []) => match placed.as_slice() {
                [dest] if self.first_lift == Some(*dest) => Some(MoveRecord {
                    from: *origin,
                    to: *dest,
                }),
                _ => None,
            },
            _ => None,
        };
        self.transient = *scan;

        match resolved {
            Some(mov) => {
                self.previous = self.confirmed;
                self.confirmed = *scan;
                self.first_lift = None;
                self.no_valid_move = false;
                debug!("resolved move {mov}");
                Inference::Resolved(mov)
            }
            None => {
                if vacated.len() == 1 && filled.is_empty() {
                    self.first_lift = Some(vacated[0]);
                    self.no_valid_move = false;
                    Inference::InProgress
                } else {
                    if !self.no_valid_move {
                        warn!(
                            "board incoherent: {} vacated, {} filled",
                            vacated.len(),
                            filled.len()
                        );
                    }
                    self.no_valid_move = true;
                    Inference::NoValidMove
                }
            }
        }
    }

    /// Roll the confirmed state back to the position before the last
    /// resolution. Used after an oracle rejection; the human restores the
    /// board and scanning re-synchronizes against the old position.
    pub fn revert(&mut self) {
        self.confirmed = self.previous;
        self.transient = self.previous;
        self.first_lift = None;
        self.no_valid_move = false;
    }

    /// Advance the confirmed state for a move the machine just executed.
    pub fn apply_machine_move(&mut self, mov: MoveRecord) {
        self.previous = self.confirmed;
        self.confirmed.set(mov.from, false);
        self.confirmed.set(mov.to, true);
        self.transient = self.confirmed;
        self.first_lift = None;
    }

    /// Advance the confirmed state for a captured piece carried off-board.
    pub fn apply_discard(&mut self, sq: Square) {
        self.previous = self.confirmed;
        self.confirmed.set(sq, false);
        self.transient = self.confirmed;
        self.first_lift = None;
    }
}
