use crate::board::MoveRecord;

/// External move-generation and validation engine. The controller knows
/// square transitions, not chess; every resolved move goes through this seam
/// and any reply comes back through it as an opaque move record.
pub trait MoveOracle {
    /// Validate a physically played move. The verdict may carry the engine's
    /// reply, which the controller must execute on the board.
    fn submit(&mut self, mov: MoveRecord) -> OracleVerdict;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleVerdict {
    Accepted { reply: Option<MoveRecord> },
    /// Illegal per the oracle. The physical board must be restored to the
    /// previous position by the operator; nothing is auto-corrected.
    Rejected,
    /// The submitted move ended the game.
    GameOver(GameEnd),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    WhiteWins,
    BlackWins,
    Draw,
}
