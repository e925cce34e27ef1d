use log::{info, warn};

use crate::board::{Color, MoveRecord, OccupancyGrid};
use crate::clock::ChessClock;
use crate::config::Config;
use crate::error::ControlResult;
use crate::hal::BoardHal;
use crate::inference::{Inference, MoveInference};
use crate::motion::{MotionPlanner, Speed};
use crate::oracle::{GameEnd, MoveOracle, OracleVerdict};
use crate::scanner::Scanner;

/// Top-level game sequence. Exactly one state is active at a time;
/// calibration gates all motion and the player states alternate on
/// confirmed, oracle-validated moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    Calibration,
    PlayerWhite,
    PlayerBlack,
}

impl SequenceState {
    fn for_side(side: Color) -> Self {
        match side {
            Color::White => SequenceState::PlayerWhite,
            Color::Black => SequenceState::PlayerBlack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// A side's countdown reached zero.
    Timeout(Color),
    /// The oracle declared the game over.
    Decided(GameEnd),
}

/// What one control cycle produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStatus {
    /// Homing finished; white is to move.
    Homed,
    /// Board matches the confirmed state, waiting on the side to move.
    Waiting(Color),
    /// A piece is in the air.
    MoveInProgress,
    /// Sensing ambiguity; the board must return to a coherent state.
    NoValidMove,
    /// A human move was resolved and accepted; no reply was due.
    Played(MoveRecord),
    /// A human move was accepted and the engine's reply was executed on the
    /// board.
    Executed(MoveRecord),
    /// The oracle rejected the last move; waiting for the operator to
    /// restore the previous position.
    RestorePending,
    GameOver(GameOutcome),
}

/// Owns the whole control core and runs the scan-infer-act cycle. One call
/// to `poll` is one cycle; scanning never overlaps carriage motion because
/// motion runs to completion inside the cycle.
pub struct Controller<O: MoveOracle> {
    state: SequenceState,
    scanner: Scanner,
    inference: MoveInference,
    planner: MotionPlanner,
    clock: ChessClock,
    oracle: O,
    outcome: Option<GameOutcome>,
    awaiting_restore: bool,
}

impl<O: MoveOracle> Controller<O> {
    pub fn new(cfg: &Config, initial: OccupancyGrid, oracle: O) -> Self {
        Self {
            state: SequenceState::Calibration,
            scanner: Scanner::new(cfg),
            inference: MoveInference::new(initial),
            planner: MotionPlanner::new(cfg),
            clock: ChessClock::new(cfg.clock_minutes, cfg.clock_seconds),
            oracle,
            outcome: None,
            awaiting_restore: false,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn clock(&self) -> &ChessClock {
        &self.clock
    }

    pub fn confirmed(&self) -> &OccupancyGrid {
        self.inference.confirmed()
    }

    pub fn planner(&self) -> &MotionPlanner {
        &self.planner
    }

    /// Report a stall, skipped steps or power interruption during carriage
    /// travel. Position trust is gone: motion is refused and the sequence
    /// re-enters calibration. Nothing is retried automatically.
    pub fn report_motion_fault(&mut self) {
        warn!("motion desynchronized, re-entering calibration");
        self.planner.invalidate();
        self.state = SequenceState::Calibration;
    }

    /// One scan-infer-act cycle. Call repeatedly from the main loop.
    pub fn poll<H: BoardHal>(&mut self, hal: &mut H) -> ControlResult<ControlStatus> {
        if let Some(outcome) = self.outcome {
            return Ok(ControlStatus::GameOver(outcome));
        }
        match self.state {
            SequenceState::Calibration => {
                self.planner.calibrate(hal);
                self.state = SequenceState::PlayerWhite;
                self.clock.start(Color::White, hal.now_ms());
                info!("calibration complete, white to move");
                Ok(ControlStatus::Homed)
            }
            SequenceState::PlayerWhite => self.player_cycle(hal, Color::White),
            SequenceState::PlayerBlack => self.player_cycle(hal, Color::Black),
        }
    }

    fn player_cycle<H: BoardHal>(
        &mut self,
        hal: &mut H,
        side: Color,
    ) -> ControlResult<ControlStatus> {
        self.clock.tick(hal.now_ms());
        if let Some(loser) = self.clock.expired() {
            let outcome = GameOutcome::Timeout(loser);
            self.outcome = Some(outcome);
            return Ok(ControlStatus::GameOver(outcome));
        }

        let other = side.opponent();
        if hal.button_pressed(other) {
            info!("{other:?} takes the turn by manual override");
            self.force_turn(other, hal.now_ms());
            return Ok(ControlStatus::Waiting(other));
        }

        let snapshot = self.scanner.scan(hal);
        if self.awaiting_restore {
            if snapshot == *self.inference.confirmed() {
                self.awaiting_restore = false;
                info!("board restored to the last confirmed position");
                return Ok(ControlStatus::Waiting(side));
            }
            return Ok(ControlStatus::RestorePending);
        }

        match self.inference.update(&snapshot) {
            Inference::Idle => Ok(ControlStatus::Waiting(side)),
            Inference::InProgress => Ok(ControlStatus::MoveInProgress),
            Inference::NoValidMove => Ok(ControlStatus::NoValidMove),
            Inference::Resolved(mov) => self.submit(hal, side, mov),
        }
    }

    fn submit<H: BoardHal>(
        &mut self,
        hal: &mut H,
        side: Color,
        mov: MoveRecord,
    ) -> ControlResult<ControlStatus> {
        info!("{side:?} played {mov}");
        match self.oracle.submit(mov) {
            OracleVerdict::Rejected => {
                warn!("oracle rejected {mov}, restore the previous position");
                self.inference.revert();
                self.awaiting_restore = true;
                Ok(ControlStatus::RestorePending)
            }
            OracleVerdict::GameOver(end) => {
                let outcome = GameOutcome::Decided(end);
                self.outcome = Some(outcome);
                Ok(ControlStatus::GameOver(outcome))
            }
            OracleVerdict::Accepted { reply } => {
                self.switch_turn(hal.now_ms());
                match reply {
                    None => Ok(ControlStatus::Played(mov)),
                    Some(reply) => {
                        self.execute(hal, reply)?;
                        self.switch_turn(hal.now_ms());
                        Ok(ControlStatus::Executed(reply))
                    }
                }
            }
        }
    }

    /// Physically execute an oracle move. A capture first carries the
    /// occupant of the destination off the grid.
    fn execute<H: BoardHal>(&mut self, hal: &mut H, mov: MoveRecord) -> ControlResult<()> {
        if self.inference.confirmed().get(mov.to) {
            self.planner.discard(hal, mov.to, Speed::Fast)?;
            self.inference.apply_discard(mov.to);
        }
        self.planner.move_piece(hal, mov.from, mov.to, Speed::Fast)?;
        self.inference.apply_machine_move(mov);
        info!("executed reply {mov}");
        Ok(())
    }

    fn switch_turn(&mut self, now_ms: u32) {
        let side = match self.state {
            SequenceState::PlayerWhite => Color::Black,
            SequenceState::PlayerBlack => Color::White,
            SequenceState::Calibration => return,
        };
        self.state = SequenceState::for_side(side);
        self.clock.switch_to(side, now_ms);
    }

    fn force_turn(&mut self, side: Color, now_ms: u32) {
        self.state = SequenceState::for_side(side);
        self.clock.switch_to(side, now_ms);
    }
}
