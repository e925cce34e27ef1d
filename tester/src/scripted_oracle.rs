use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chessboard_common::{MoveOracle, MoveRecord, OracleVerdict};

/// Replays a fixed list of verdicts and records every move it is handed.
/// Once the script runs out, everything is accepted without a reply.
pub struct ScriptedOracle {
    verdicts: VecDeque<OracleVerdict>,
    received: Rc<RefCell<Vec<MoveRecord>>>,
}

impl ScriptedOracle {
    pub fn new(verdicts: impl IntoIterator<Item = OracleVerdict>) -> Self {
        Self {
            verdicts: verdicts.into_iter().collect(),
            received: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared handle to the submitted-move log, for assertions after the
    /// controller has taken ownership of the oracle.
    pub fn received(&self) -> Rc<RefCell<Vec<MoveRecord>>> {
        self.received.clone()
    }
}

impl MoveOracle for ScriptedOracle {
    fn submit(&mut self, mov: MoveRecord) -> OracleVerdict {
        self.received.borrow_mut().push(mov);
        self.verdicts
            .pop_front()
            .unwrap_or(OracleVerdict::Accepted { reply: None })
    }
}
