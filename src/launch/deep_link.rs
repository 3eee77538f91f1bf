//! Timed fallback for custom-scheme links.
//!
//! Launching a deep link gives no signal about whether anything handled it.
//! Each attempt starts a hidden probe at the link, then checks back after
//! [`FALLBACK_DELAY_MS`]. If the check runs less than [`HANDOFF_THRESHOLD_MS`]
//! after the attempt began, nothing took the user away, so the store/web
//! fallback is opened. If the check itself ran late, a hand-off is assumed and
//! nothing more happens. A spurious store page is the accepted failure mode.
//!
//! Starting a new attempt supersedes every pending one: its probe is torn down
//! and it settles without a fallback.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::system::navigator::{Navigator, ProbeGuard, Prober};

pub const FALLBACK_DELAY_MS: i64 = 1500;
pub const HANDOFF_THRESHOLD_MS: i64 = 2000;
/// How many of the most recent attempts keep their final state.
pub const RETAINED_OUTCOMES: u64 = 32;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<DateTime<Utc>>>);

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    pub fn advance_ms(&self, ms: i64) {
        self.0.set(self.0.get() + Duration::milliseconds(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Attempting,
    Settled,
    FallbackFired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The check ran late; the link is assumed to have been handled.
    HandedOff { elapsed_ms: i64 },
    /// A newer attempt replaced this one before its check.
    Superseded,
    FallbackOpened { url: String, elapsed_ms: i64 },
    /// Fallback was due but the record had nothing to fall back to.
    NoFallback { elapsed_ms: i64 },
    FallbackFailed { url: String, error: String },
}

impl Resolution {
    pub fn state(&self) -> AttemptState {
        match self {
            Resolution::HandedOff { .. } | Resolution::Superseded => AttemptState::Settled,
            Resolution::FallbackOpened { .. }
            | Resolution::NoFallback { .. }
            | Resolution::FallbackFailed { .. } => AttemptState::FallbackFired,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub id: AttemptId,
    pub link: String,
    pub resolution: Resolution,
}

struct Attempt {
    id: AttemptId,
    link: String,
    fallback: Option<String>,
    started_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
    probe: Option<ProbeGuard>,
}

pub struct DeepLinkEngine<C: Clock> {
    clock: C,
    next_id: u64,
    pending: Vec<Attempt>,
    settled: Vec<AttemptReport>,
    outcomes: HashMap<AttemptId, AttemptState>,
}

impl<C: Clock> DeepLinkEngine<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            pending: Vec::new(),
            settled: Vec::new(),
            outcomes: HashMap::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn begin(
        &mut self,
        link: &str,
        fallback: Option<String>,
        prober: &mut dyn Prober,
    ) -> AttemptId {
        self.supersede_pending();

        let id = AttemptId(self.next_id);
        self.next_id += 1;

        let probe = match prober.start_probe(link) {
            Ok(handle) => Some(ProbeGuard::new(handle)),
            Err(e) => {
                warn!(link, error = %e, "deep link probe failed to start");
                None
            }
        };

        let started_at = self.clock.now();
        info!(link, attempt = id.0, "deep link attempt started");
        self.pending.push(Attempt {
            id,
            link: link.to_string(),
            fallback,
            started_at,
            due_at: started_at + Duration::milliseconds(FALLBACK_DELAY_MS),
            probe,
        });
        id
    }

    /// Attempts older than the last `RETAINED_OUTCOMES` report `Settled`.
    pub fn state(&self, id: AttemptId) -> AttemptState {
        if self.pending.iter().any(|attempt| attempt.id == id) {
            return AttemptState::Attempting;
        }
        self.outcomes
            .get(&id)
            .copied()
            .unwrap_or(AttemptState::Settled)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Runs every fallback check that is due and returns the attempts that
    /// finished since the last poll.
    pub fn poll(&mut self, navigator: &mut dyn Navigator) -> Vec<AttemptReport> {
        let now = self.clock.now();
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|attempt| attempt.due_at <= now);
        self.pending = waiting;

        for mut attempt in due {
            if let Some(probe) = attempt.probe.take() {
                probe.release();
            }

            let elapsed_ms = (now - attempt.started_at).num_milliseconds();
            let resolution = if elapsed_ms < HANDOFF_THRESHOLD_MS {
                fire_fallback(&attempt, elapsed_ms, navigator)
            } else {
                debug!(link = %attempt.link, elapsed_ms, "check ran late, assuming hand-off");
                Resolution::HandedOff { elapsed_ms }
            };

            self.settled.push(AttemptReport {
                id: attempt.id,
                link: attempt.link,
                resolution,
            });
        }

        for report in &self.settled {
            self.outcomes.insert(report.id, report.resolution.state());
        }
        let oldest = self.next_id.saturating_sub(RETAINED_OUTCOMES);
        self.outcomes.retain(|id, _| id.0 >= oldest);
        std::mem::take(&mut self.settled)
    }

    fn supersede_pending(&mut self) {
        for mut attempt in std::mem::take(&mut self.pending) {
            if let Some(probe) = attempt.probe.take() {
                probe.release();
            }
            debug!(link = %attempt.link, attempt = attempt.id.0, "deep link attempt superseded");
            self.settled.push(AttemptReport {
                id: attempt.id,
                link: attempt.link,
                resolution: Resolution::Superseded,
            });
        }
    }
}

fn fire_fallback(attempt: &Attempt, elapsed_ms: i64, navigator: &mut dyn Navigator) -> Resolution {
    let Some(url) = attempt.fallback.clone() else {
        info!(link = %attempt.link, "deep link not handled and no fallback available");
        return Resolution::NoFallback { elapsed_ms };
    };

    info!(link = %attempt.link, fallback = %url, elapsed_ms, "deep link not handled, opening fallback");
    match navigator.open_external(&url) {
        Ok(()) => Resolution::FallbackOpened { url, elapsed_ms },
        Err(e) => {
            warn!(url = %url, error = %e, "fallback open failed");
            Resolution::FallbackFailed {
                url,
                error: e.to_string(),
            }
        }
    }
}
