//! # Noise gate
//!
//! A noise gate suppresses reporting of values which are still inside the sensor noise around the last reported value.
//!
//! Analog pots on a foot controller jitter by a count or two even when nobody is touching them. Without a gate every
//! jitter would turn into MIDI traffic. The gate only reports a new value once it has moved outside a window around
//! the last value it reported.

/// A noise gate is represented here.
///
/// # Generic arguments:
///
/// * `WINDOW` - the half-width of the suppression window around the last reported value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoiseGate<const WINDOW: i32> {
    last: i32,
}

impl<const WINDOW: i32> NoiseGate<WINDOW> {
    /// `NoiseGate::new()` is a new noise gate with its last reported value at zero
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// `gate.process(s)` is true iff `s` is outside the window around the last reported value
    ///
    /// When the gate reports true it also stores `s` as the new last reported value.
    ///
    /// # Examples
    ///
    /// ```
    /// use pedal_utils::noise_gate::NoiseGate;
    ///
    /// let mut gate = NoiseGate::<2>::new();
    ///
    /// assert!(gate.process(100)); // moved from 0 to 100, report it
    /// assert!(!gate.process(101)); // still inside the noise window
    /// assert!(gate.process(103)); // moved far enough, report it
    /// ```
    pub fn process(&mut self, s: i32) -> bool {
        if (s < (self.last - WINDOW)) || (s > (self.last + WINDOW)) {
            self.last = s;
            return true;
        }
        false
    }
}

impl<const WINDOW: i32> Default for NoiseGate<WINDOW> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_on_the_window_edge_are_suppressed() {
        let mut gate = NoiseGate::<5>::new();

        assert!(gate.process(100));
        assert!(!gate.process(105));
        assert!(!gate.process(95));
    }

    #[test]
    fn values_just_past_the_window_are_reported() {
        let mut gate = NoiseGate::<5>::new();

        assert!(gate.process(100));
        assert!(gate.process(106));
    }

    #[test]
    fn reporting_moves_the_window() {
        let mut gate = NoiseGate::<5>::new();

        assert!(gate.process(100));
        assert!(gate.process(106));

        // the window is now centered on 106, not 100
        assert!(!gate.process(103));
        assert!(gate.process(112));
    }

    #[test]
    fn downward_movement_is_reported_too() {
        let mut gate = NoiseGate::<5>::new();

        assert!(gate.process(100));
        assert!(gate.process(94));
    }

    #[test]
    fn starts_centered_on_zero() {
        let mut gate = NoiseGate::<5>::new();

        assert!(!gate.process(5));
        assert!(gate.process(6));
    }
}
