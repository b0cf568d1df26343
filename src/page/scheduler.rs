//! Staged page convergence.
//!
//! The displayed page never jumps to the target: it walks one sheet at a
//! time, fast while far away, slowing for the final two turns so the last
//! flips read clearly. Timing is deadline-based against the host clock, so
//! the whole walk is driven from the per-frame advance call and needs no
//! host timers.

use super::store::PageStore;

/// Delay before the next turn while more than [`FAST_STEP_DISTANCE`]
/// sheets from the target.
pub const FAST_STEP_DELAY_MS: f64 = 50.0;
/// Delay before the next turn over the final sheets.
pub const SLOW_STEP_DELAY_MS: f64 = 150.0;
/// Distances strictly beyond this use the fast delay.
pub const FAST_STEP_DISTANCE: usize = 2;

/// Where the scheduler stands between writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerState {
    /// Displayed page equals the target; nothing pending.
    Idle,
    /// A turn is due at `deadline_ms`. `target` records the goal this
    /// deadline was paced for; the step itself re-reads the live store,
    /// so a superseded goal changes course without a stale step.
    Converging { deadline_ms: f64, target: usize },
}

/// Walks the displayed page toward the store target one sheet at a time.
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    displayed: usize,
    state: SchedulerState,
}

impl TurnScheduler {
    pub fn new(initial_page: usize) -> Self {
        Self {
            displayed: initial_page,
            state: SchedulerState::Idle,
        }
    }

    /// Page the book currently shows.
    pub fn displayed(&self) -> usize {
        self.displayed
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    /// React to a target write: drop any pending deadline and take the
    /// first step right away. Returns whether a sheet turned.
    pub fn retarget(&mut self, now_ms: f64, store: &PageStore) -> bool {
        self.step(now_ms, store)
    }

    /// Drive pending deadlines from the frame clock. At most one sheet
    /// turns per call, and the next deadline is measured from `now_ms`, so
    /// a stalled tab resumes with real gaps instead of a burst of turns.
    pub fn advance(&mut self, now_ms: f64, store: &PageStore) -> bool {
        match self.state {
            SchedulerState::Idle => false,
            SchedulerState::Converging { deadline_ms, .. } => {
                if now_ms < deadline_ms {
                    false
                } else {
                    self.step(now_ms, store)
                }
            }
        }
    }

    fn step(&mut self, now_ms: f64, store: &PageStore) -> bool {
        let target = store.target();
        if target == self.displayed {
            self.state = SchedulerState::Idle;
            return false;
        }

        // Pacing uses the distance before the step, so the slow delay
        // kicks in for the turn after the one that brings us within reach.
        let distance = self.displayed.abs_diff(target);
        let delay = if distance > FAST_STEP_DISTANCE {
            FAST_STEP_DELAY_MS
        } else {
            SLOW_STEP_DELAY_MS
        };

        if target > self.displayed {
            self.displayed += 1;
        } else {
            self.displayed -= 1;
        }

        self.state = if self.displayed == target {
            SchedulerState::Idle
        } else {
            SchedulerState::Converging {
                deadline_ms: now_ms + delay,
                target,
            }
        };
        true
    }
}
