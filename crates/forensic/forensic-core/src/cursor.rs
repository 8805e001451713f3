//! Cyclic replay cursor over an annotated batch.

use std::sync::Arc;

use forensic_spi::{ForensicError, Result};
use serde::{Deserialize, Serialize};

/// Where a tick lands in the cyclic replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub tick: u64,
    /// Completed passes over the batch.
    pub cycle: u64,
    /// Index into the batch.
    pub position: usize,
    /// Total amount seen from tick 0 through this tick, inclusive.
    pub cumulative_sum: f64,
}

/// Monotonic playback pointer that wraps around a fixed batch.
///
/// Prefix sums are computed once; clones share them.
#[derive(Debug, Clone)]
pub struct ReplayCursor {
    prefix: Arc<[f64]>,
    last_tick: Option<u64>,
}

impl ReplayCursor {
    pub fn new(amounts: &[f64]) -> Self {
        let mut prefix = Vec::with_capacity(amounts.len() + 1);
        let mut running = 0.0;
        prefix.push(running);
        for &amount in amounts {
            running += amount;
            prefix.push(running);
        }
        Self {
            prefix: prefix.into(),
            last_tick: None,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.prefix.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.batch_size() == 0
    }

    /// Sum of the whole batch.
    pub fn batch_total(&self) -> f64 {
        self.prefix[self.batch_size()]
    }

    /// Last tick accepted by [`advance`](Self::advance).
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    /// Resolve `tick` without moving the cursor. `None` for an empty batch.
    pub fn position_at(&self, tick: u64) -> Option<CursorPosition> {
        let size = self.batch_size() as u64;
        if size == 0 {
            return None;
        }
        let cycle = tick / size;
        let position = (tick % size) as usize;
        Some(CursorPosition {
            tick,
            cycle,
            position,
            cumulative_sum: cycle as f64 * self.batch_total() + self.prefix[position + 1],
        })
    }

    /// Move the cursor to `tick`.
    ///
    /// Ticks never decrease; repeating the last tick is allowed. An empty
    /// batch reports `None` and leaves the cursor untouched.
    pub fn advance(&mut self, tick: u64) -> Result<Option<CursorPosition>> {
        if let Some(last) = self.last_tick {
            if tick < last {
                return Err(ForensicError::TickRegression { last, got: tick });
            }
        }
        let position = self.position_at(tick);
        if position.is_some() {
            self.last_tick = Some(tick);
        }
        Ok(position)
    }
}
