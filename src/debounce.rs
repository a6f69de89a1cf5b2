//! # Switch debouncing, edge detection, and key repeat
//!
//! Mechanical footswitches bounce: a single press or release shows up as a burst of transitions lasting a few
//! milliseconds. The types in this module turn a noisy raw switch line, sampled once per control-loop tick, into:
//!
//! * a clean debounced boolean ([`Debouncer`])
//!
//! * a signed edge event on clean transitions ([`EdgeDetector`])
//!
//! * an auto-repeating trigger stream for press-and-hold increment buttons ([`RepeatButton`])
//!
//! Two debouncing policies are available. The standard policy debounces both press and release. The immediate-press
//! policy reports a press on the very first `true` reading and only debounces the release. False positive presses are
//! tolerable for momentary controls, but release bounce on a sustained pedal is very audible, so the release path is
//! always filtered.
//!
//! All time based behavior takes a caller supplied millisecond timestamp. Nothing in here reads a clock.

/// Debouncing policy for a switch line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceMode {
    /// Press and release both require `SAMPLES` consistent readings
    Standard,
    /// Press is reported on the first `true` reading, release is still debounced
    ImmediatePress,
}

/// A switch debouncer is represented here.
///
/// # Generic arguments:
///
/// * `SAMPLES` - the number of consistent readings required to change state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer<const SAMPLES: u32> {
    counter: u32,
    state: bool,
    mode: DebounceMode,
}

impl<const SAMPLES: u32> Debouncer<SAMPLES> {
    /// `Debouncer::new(mode)` is a new debouncer with the given debouncing policy, initially released
    pub fn new(mode: DebounceMode) -> Self {
        Self {
            counter: 0,
            state: false,
            mode,
        }
    }

    /// `deb.process(raw)` is the debounced switch state after folding in the raw reading `raw`
    ///
    /// Expected to be called once per control-loop tick.
    ///
    /// The debounced state goes true on the `SAMPLES`-th consecutive `true` reading (or immediately in
    /// [`DebounceMode::ImmediatePress`]), and goes false once `false` readings have walked the counter back to zero.
    pub fn process(&mut self, raw: bool) -> bool {
        if raw {
            match self.mode {
                DebounceMode::Standard => {
                    if self.counter < SAMPLES {
                        self.counter += 1;
                    }
                    if self.counter == SAMPLES {
                        self.state = true;
                    }
                }
                DebounceMode::ImmediatePress => {
                    self.counter = SAMPLES;
                    self.state = true;
                }
            }
        } else {
            if self.counter > 0 {
                self.counter -= 1;
            }
            if self.counter == 0 {
                self.state = false;
            }
        }
        self.state
    }
}

/// A debounced switch transition is represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// The debounced state went false -> true
    Rising,
    /// The debounced state went true -> false
    Falling,
}

/// A switch edge detector is represented here.
///
/// Wraps a [`Debouncer`] and reports the sample at which the debounced state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeDetector<const SAMPLES: u32> {
    debouncer: Debouncer<SAMPLES>,
    prev: bool,
}

impl<const SAMPLES: u32> EdgeDetector<SAMPLES> {
    /// `EdgeDetector::new(mode)` is a new edge detector with the given debouncing policy
    pub fn new(mode: DebounceMode) -> Self {
        Self {
            debouncer: Debouncer::new(mode),
            prev: false,
        }
    }

    /// `ed.process(raw)` is the edge produced by the raw reading `raw`, if any
    ///
    /// Returns `Some(Edge::Rising)` on the sample where the debounced state transitions false -> true,
    /// `Some(Edge::Falling)` on true -> false, and `None` otherwise.
    pub fn process(&mut self, raw: bool) -> Option<Edge> {
        let curr = self.debouncer.process(raw);
        if self.prev != curr {
            self.prev = curr;
            if curr {
                return Some(Edge::Rising);
            }
            return Some(Edge::Falling);
        }
        None
    }
}

/// A press-and-hold button with key repeat is represented here.
///
/// Behaves like a keyboard key: it fires once when pressed, then after an initial delay it fires repeatedly at the
/// repeat rate for as long as it is held. Used for incrementing program and bank values while a footswitch is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RepeatButton<const SAMPLES: u32> {
    edge: EdgeDetector<SAMPLES>,

    /// Time of the last fire, `None` while the button is up
    start_time: Option<u32>,

    /// The currently pending delay, the initial delay right after a press and the repeat rate afterwards
    pending_delay_ms: u32,

    initial_delay_ms: u32,
    repeat_rate_ms: u32,
}

impl<const SAMPLES: u32> RepeatButton<SAMPLES> {
    /// `RepeatButton::new(d, r, mode)` is a new repeat button with initial delay `d` and repeat rate `r`, both in
    /// milliseconds
    pub fn new(initial_delay_ms: u32, repeat_rate_ms: u32, mode: DebounceMode) -> Self {
        Self {
            edge: EdgeDetector::new(mode),
            start_time: None,
            pending_delay_ms: initial_delay_ms,
            initial_delay_ms,
            repeat_rate_ms,
        }
    }

    /// `rb.process(raw, now_ms)` is true iff the button action should fire on this tick
    ///
    /// # Arguments:
    ///
    /// * `raw` - the raw switch reading for this tick
    ///
    /// * `now_ms` - the current timestamp in milliseconds, may wrap
    pub fn process(&mut self, raw: bool, now_ms: u32) -> bool {
        match self.edge.process(raw) {
            Some(Edge::Rising) => {
                self.start_time = Some(now_ms);
                self.pending_delay_ms = self.initial_delay_ms;
                true
            }
            Some(Edge::Falling) => {
                self.start_time = None;
                false
            }
            None => match self.start_time {
                Some(start) if self.pending_delay_ms < now_ms.wrapping_sub(start) => {
                    self.start_time = Some(now_ms);
                    self.pending_delay_ms = self.repeat_rate_ms;
                    true
                }
                _ => false,
            },
        }
    }
}
