//! # Deferred save scheduling
//!
//! Every flash write consumes a slot in the wear-leveling ring and, eventually, an erase cycle. A user leaning on a
//! repeat button would burn through dozens of slots in a second if each increment were saved eagerly.
//!
//! [`SaveTimer`] debounces saves in time instead: every state change restarts a countdown, and the commit only
//! happens once the state has been quiescent for the whole settle period. A burst of rapid presses costs one flash
//! write, not one per press.

use crate::config::SAVE_DELAY_MS;

/// A deferred save timer is represented here.
///
/// One timer covers one persisted domain. The controllers that mutate the domain call [`reset`](SaveTimer::reset) on
/// every change; whoever owns the flash store polls [`should_save`](SaveTimer::should_save) and calls
/// [`mark_saved`](SaveTimer::mark_saved) after committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SaveTimer {
    /// Time of the last state change, `None` while no save is pending
    start_time: Option<u32>,

    delay_ms: u32,
}

impl SaveTimer {
    /// `SaveTimer::new()` is a new save timer with the configured settle period and no pending save
    pub fn new() -> Self {
        Self::with_delay(SAVE_DELAY_MS)
    }

    /// `SaveTimer::with_delay(d)` is a new save timer with a settle period of `d` milliseconds
    pub fn with_delay(delay_ms: u32) -> Self {
        Self {
            start_time: None,
            delay_ms,
        }
    }

    /// `st.reset(now_ms)` restarts the countdown, called on every state-changing event
    pub fn reset(&mut self, now_ms: u32) {
        self.start_time = Some(now_ms);
    }

    /// `st.should_save(now_ms)` is true iff a save is pending and the settle period has elapsed
    ///
    /// Timestamps may wrap; the comparison is done with wrapping arithmetic.
    pub fn should_save(&self, now_ms: u32) -> bool {
        match self.start_time {
            Some(start) => self.delay_ms < now_ms.wrapping_sub(start),
            None => false,
        }
    }

    /// `st.mark_saved()` clears the pending save after a successful commit
    pub fn mark_saved(&mut self) {
        self.start_time = None;
    }
}

impl Default for SaveTimer {
    fn default() -> Self {
        Self::new()
    }
}
