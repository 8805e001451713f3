//! Replay session: the explicit tick state transition.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use forensic_api::{ForensicConfig, ReplayConfig};
use forensic_spi::{
    AwardSource, DigitDistribution, DisplayFrame, FeedEntry, ForensicError, Result, ScatterData,
    ScatterPoint,
};
use tracing::{debug, warn};

use crate::cursor::ReplayCursor;
use crate::digits::{expected_distribution, DigitProfiler};
use crate::engine::{AnnotatedBatch, ForensicEngine};
use crate::feed::{truncate_name, FeedLog};
use crate::format::{format_clock, format_currency, format_time};
use crate::ledger::AnomalyLedger;
use crate::sources::fetch_or_empty;

/// Read-only context of one ingested batch, shared by every tick.
#[derive(Debug, Clone)]
pub struct Session {
    batch: AnnotatedBatch,
    expected: DigitDistribution,
    cursor: ReplayCursor,
    replay: ReplayConfig,
}

/// Mutable per-session state. Owned by a single caller.
#[derive(Debug, Clone)]
pub struct MonitorState {
    pub cursor: ReplayCursor,
    pub ledger: AnomalyLedger,
    pub feed: FeedLog,
}

impl Session {
    pub fn new(batch: AnnotatedBatch, replay: ReplayConfig) -> Self {
        let cursor = ReplayCursor::new(&batch.amounts());
        Self {
            batch,
            expected: expected_distribution(),
            cursor,
            replay,
        }
    }

    /// Fetch from `source` and annotate. A failed fetch yields an empty session.
    pub fn from_source(source: &dyn AwardSource, config: &ForensicConfig) -> Result<Self> {
        let engine = ForensicEngine::new(config.detector.clone())?;
        config.replay.validate()?;
        let batch = engine.annotate(&fetch_or_empty(source));
        Ok(Self::new(batch, config.replay.clone()))
    }

    pub fn batch(&self) -> &AnnotatedBatch {
        &self.batch
    }

    /// Benford reference curve.
    pub fn expected(&self) -> &DigitDistribution {
        &self.expected
    }

    pub fn replay_config(&self) -> &ReplayConfig {
        &self.replay
    }

    pub fn has_data(&self) -> bool {
        !self.batch.is_empty()
    }

    pub fn initial_state(&self) -> MonitorState {
        MonitorState {
            cursor: self.cursor.clone(),
            ledger: AnomalyLedger::new(),
            feed: FeedLog::new(self.replay.feed_capacity),
        }
    }

    /// Apply one tick to `prior` and render its frame.
    ///
    /// `prior` is never modified: on error the caller still holds the last
    /// consistent state. An empty batch yields the "no data" frame.
    pub fn step(
        &self,
        prior: &MonitorState,
        tick: u64,
        now: DateTime<Utc>,
    ) -> Result<(MonitorState, DisplayFrame)> {
        if prior.cursor.batch_size() != self.batch.len() {
            return Err(ForensicError::invalid_parameter(
                "state",
                format!(
                    "cursor covers {} records, session has {}",
                    prior.cursor.batch_size(),
                    self.batch.len()
                ),
            ));
        }
        let clock = format_clock(now);
        let mut state = prior.clone();

        let Some(position) = state.cursor.advance(tick)? else {
            return Ok((state, DisplayFrame::no_data(clock)));
        };

        let transactions = self.batch.transactions();
        let current = &transactions[position.position];
        let observation = state.ledger.observe(current);
        state.feed.push(FeedEntry {
            time: format_time(now),
            name: truncate_name(&current.recipient_name, self.replay.name_width),
            status: observation.status,
            color: observation.status.color().to_string(),
        });

        let seen = &transactions[..=position.position];
        let profiler = DigitProfiler::from_digits(seen.iter().map(|t| t.leading_digit));

        let background_source = if position.cycle > 0 { transactions } else { seen };
        let background = background_source
            .iter()
            .map(|t| ScatterPoint {
                index: t.index,
                amount: t.amount,
            })
            .collect();
        let mut flagged: Vec<ScatterPoint> = state
            .ledger
            .snapshot()
            .iter()
            .map(|t| ScatterPoint {
                index: t.index,
                amount: t.amount,
            })
            .collect();
        flagged.sort_by_key(|p| p.index);

        if position.cumulative_sum < 0.0 {
            warn!(tick, cumulative_sum = position.cumulative_sum, "capital analyzed is negative");
        }
        debug!(
            tick,
            cycle = position.cycle,
            position = position.position,
            status = observation.status.label(),
            ledger = state.ledger.count(),
            "tick applied"
        );

        let frame = DisplayFrame {
            clock,
            tick,
            cycle: position.cycle,
            position: position.position,
            feed: state.feed.to_vec(),
            capital_analyzed: position.cumulative_sum,
            capital_display: format_currency(position.cumulative_sum),
            capital_color: Some(observation.status.color().to_string()),
            ledger_count: state.ledger.count(),
            observed: profiler.distribution(),
            expected: self.expected,
            benford_chi_squared: profiler.chi_squared(&self.expected),
            scatter: ScatterData { background, flagged },
            ledger: state.ledger.snapshot().to_vec(),
        };
        Ok((state, frame))
    }
}

/// Single-writer driver of a session: applies consecutive ticks and keeps
/// the last good frame.
#[derive(Debug)]
pub struct Monitor {
    session: Arc<Session>,
    state: MonitorState,
    next_tick: u64,
    frame: DisplayFrame,
}

impl Monitor {
    pub fn new(session: Arc<Session>) -> Self {
        let state = session.initial_state();
        Self {
            session,
            state,
            next_tick: 0,
            frame: DisplayFrame::no_data(""),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn next_tick(&self) -> u64 {
        self.next_tick
    }

    /// Last successfully rendered frame.
    pub fn frame(&self) -> &DisplayFrame {
        &self.frame
    }

    /// Apply the next tick. A failed tick is logged and the prior frame kept.
    pub fn tick(&mut self, now: DateTime<Utc>) -> &DisplayFrame {
        self.apply(self.next_tick, now);
        &self.frame
    }

    /// Apply an explicit tick, e.g. when the timer skipped intervals.
    pub fn tick_at(&mut self, tick: u64, now: DateTime<Utc>) -> Result<&DisplayFrame> {
        let (state, frame) = self.session.step(&self.state, tick, now)?;
        self.state = state;
        self.frame = frame;
        self.next_tick = tick.saturating_add(1);
        Ok(&self.frame)
    }

    fn apply(&mut self, tick: u64, now: DateTime<Utc>) {
        match self.session.step(&self.state, tick, now) {
            Ok((state, frame)) => {
                self.state = state;
                self.frame = frame;
                self.next_tick = tick.saturating_add(1);
            }
            Err(e) => {
                warn!(tick, error = %e, "tick failed, keeping previous frame");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use forensic_spi::{ScanStatus, Transaction};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn tx(index: usize, amount: f64, is_outlier: bool) -> Transaction {
        Transaction {
            index,
            id: format!("W91-0000000000-T{}", index),
            recipient_name: format!("Recipient {}", index),
            amount,
            is_outlier,
            leading_digit: crate::digits::leading_digit(amount),
        }
    }

    fn session() -> Session {
        let batch = AnnotatedBatch::new(vec![
            tx(0, 100.0, false),
            tx(1, 250.0, true),
            tx(2, 300.0, false),
        ]);
        Session::new(batch, ReplayConfig::default())
    }

    #[test]
    fn test_first_cycle_frames() {
        let session = session();
        let state = session.initial_state();

        let (state, frame) = session.step(&state, 0, now()).unwrap();
        assert_eq!(frame.clock, "03:04:05 UTC");
        assert_eq!(frame.capital_analyzed, 100.0);
        assert_eq!(frame.capital_display, "$100.00");
        assert_eq!(frame.feed.len(), 1);
        assert_eq!(frame.feed[0].status, ScanStatus::Passed);
        assert_eq!(frame.scatter.background.len(), 1);
        assert!(frame.scatter.flagged.is_empty());

        let (state, frame) = session.step(&state, 1, now()).unwrap();
        assert_eq!(frame.feed[1].status, ScanStatus::Flagged);
        assert_eq!(frame.ledger_count, 1);
        assert_eq!(
            frame.scatter.flagged,
            vec![ScatterPoint {
                index: 1,
                amount: 250.0
            }]
        );
        assert_eq!(frame.capital_color.as_deref(), Some("#ff4d4d"));
        assert!((frame.observed.get(1) - 0.5).abs() < 1e-12);
        assert!((frame.observed.get(2) - 0.5).abs() < 1e-12);

        let (_, frame) = session.step(&state, 2, now()).unwrap();
        assert_eq!(frame.capital_analyzed, 650.0);
        assert_eq!(frame.scatter.background.len(), 3);
    }

    #[test]
    fn test_second_cycle_monitors_and_shows_full_background() {
        let session = session();
        let mut state = session.initial_state();
        let mut frame = DisplayFrame::no_data("");
        for tick in 0..5 {
            let (next, f) = session.step(&state, tick, now()).unwrap();
            state = next;
            frame = f;
        }
        // tick 4 is position 1 of cycle 1
        assert_eq!((frame.cycle, frame.position), (1, 1));
        assert_eq!(frame.feed.last().unwrap().status, ScanStatus::Monitored);
        assert_eq!(frame.ledger_count, 1);
        assert_eq!(frame.scatter.background.len(), 3);
        assert_eq!(frame.capital_analyzed, 650.0 + 350.0);
        // observed digits restart with the cycle
        assert!((frame.observed.get(1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_step_does_not_mutate_prior() {
        let session = session();
        let state = session.initial_state();
        let (next, _) = session.step(&state, 1, now()).unwrap();
        assert!(state.ledger.is_empty());
        assert!(state.feed.is_empty());
        assert_eq!(next.ledger.count(), 1);
    }

    #[test]
    fn test_regressing_tick_fails() {
        let session = session();
        let (state, _) = session.step(&session.initial_state(), 5, now()).unwrap();
        assert!(matches!(
            session.step(&state, 4, now()),
            Err(ForensicError::TickRegression { .. })
        ));
    }

    #[test]
    fn test_empty_session_is_steady_no_data() {
        let session = Session::new(AnnotatedBatch::empty(), ReplayConfig::default());
        assert!(!session.has_data());
        let mut state = session.initial_state();
        for tick in 0..3 {
            let (next, frame) = session.step(&state, tick, now()).unwrap();
            assert!(frame.is_empty());
            assert_eq!(frame.capital_display, "$0.00");
            assert_eq!(frame.ledger_count, 0);
            assert_eq!(frame.clock, "03:04:05 UTC");
            state = next;
        }
    }

    #[test]
    fn test_monitor_keeps_frame_on_failure() {
        let mut monitor = Monitor::new(Arc::new(session()));
        monitor.tick(now());
        monitor.tick_at(6, now()).unwrap();
        let before = monitor.frame().clone();

        assert!(monitor.tick_at(2, now()).is_err());
        assert_eq!(monitor.frame(), &before);
        assert_eq!(monitor.next_tick(), 7);

        let frame = monitor.tick(now());
        assert_eq!(frame.tick, 7);
    }

    #[test]
    fn test_state_from_other_session_is_rejected() {
        let other = Session::new(
            AnnotatedBatch::new(vec![tx(0, 1.0, false)]),
            ReplayConfig::default(),
        );
        let foreign = other.initial_state();
        let session = session();
        assert!(matches!(
            session.step(&foreign, 2, now()),
            Err(ForensicError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_monitor_tick_at_last_tick_saturates() {
        let mut monitor = Monitor::new(Arc::new(session()));
        let frame = monitor.tick_at(u64::MAX, now()).unwrap();
        assert_eq!(frame.tick, u64::MAX);
        assert_eq!(monitor.next_tick(), u64::MAX);
        // repeating the last tick is allowed
        assert_eq!(monitor.tick(now()).tick, u64::MAX);
    }

    #[test]
    fn test_feed_respects_name_width() {
        let batch = AnnotatedBatch::new(vec![Transaction {
            recipient_name: "X".repeat(80),
            ..tx(0, 5.0, false)
        }]);
        let session = Session::new(batch, ReplayConfig::default());
        let (_, frame) = session.step(&session.initial_state(), 0, now()).unwrap();
        assert_eq!(frame.feed[0].name.len(), 35);
    }
}
