use log::warn;

use crate::board::Color;

/// Per-side countdown clock. Driven by a monotonic millisecond source
/// sampled from the HAL; whole elapsed seconds are charged to the active
/// side, so scan-cycle latency never distorts the count.
pub struct ChessClock {
    remaining_s: [u32; 2],
    active: Option<Color>,
    last_sample_ms: u32,
    expired: Option<Color>,
}

impl ChessClock {
    /// The configured default is a raw mm:ss pair; seconds above 59 spill
    /// into whole minutes (the stock 9:60 is ten minutes).
    pub fn new(minutes: u8, seconds: u8) -> Self {
        let total = u32::from(minutes) * 60 + u32::from(seconds);
        Self {
            remaining_s: [total; 2],
            active: None,
            last_sample_ms: 0,
            expired: None,
        }
    }

    pub fn start(&mut self, side: Color, now_ms: u32) {
        self.active = Some(side);
        self.last_sample_ms = now_ms;
    }

    /// Stop the outgoing side and resume the incoming side. Remaining time
    /// carries across turns; it is never reset mid-game.
    pub fn switch_to(&mut self, side: Color, now_ms: u32) {
        self.tick(now_ms);
        if self.expired.is_none() {
            self.start(side, now_ms);
        }
    }

    /// Charge elapsed whole seconds to the active side. Returns the side
    /// whose flag fell on this call, if any.
    pub fn tick(&mut self, now_ms: u32) -> Option<Color> {
        let side = self.active?;
        let elapsed_s = now_ms.wrapping_sub(self.last_sample_ms) / 1000;
        if elapsed_s == 0 {
            return None;
        }
        self.last_sample_ms = self.last_sample_ms.wrapping_add(elapsed_s * 1000);
        let remaining = &mut self.remaining_s[side.index()];
        *remaining = remaining.saturating_sub(elapsed_s);
        if *remaining == 0 {
            warn!("{side:?} flag fell");
            self.active = None;
            self.expired = Some(side);
            return Some(side);
        }
        None
    }

    pub fn remaining(&self, side: Color) -> (u32, u32) {
        let s = self.remaining_s[side.index()];
        (s / 60, s % 60)
    }

    pub fn active(&self) -> Option<Color> {
        self.active
    }

    pub fn expired(&self) -> Option<Color> {
        self.expired
    }
}
