//! # Leaky integrator lowpass filter
//!
//! A single pole lowpass filter used to smooth raw ADC readings before they are turned into MIDI events.
//!
//! This simulates an analog RC filter in digital form using the equation:
//!
//! `y[i] = rho * y[i-1] + s` where `rho < 1`
//!
//! To avoid floating point math we use the integer constant `K` instead, where `rho = 1 - (1/K)`. The update actually
//! performed is:
//!
//! `y += s - (y / K)`
//!
//! and the filter output is `y / K`. Larger values of `K` mean a slower response. Powers of 2 are recommended so the
//! division compiles down to a shift on small targets.

/// A leaky integrator lowpass filter is represented here.
///
/// # Generic arguments:
///
/// * `K` - the filter coefficient, must be positive, powers of 2 are cheapest
///
/// The accumulator is an `i32`, which leaves plenty of headroom for 10-bit input samples with any reasonable `K`
/// (the accumulator settles near `K * sample`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lowpass<const K: i32> {
    y: i32,
}

impl<const K: i32> Lowpass<K> {
    /// `Lowpass::new()` is a new lowpass filter with its accumulator at zero
    pub fn new() -> Self {
        Self { y: 0 }
    }

    /// `lp.process(s)` is the sample `s` smoothed by the filter, must be called once per input sample
    ///
    /// # Examples
    ///
    /// ```
    /// use pedal_utils::lowpass::Lowpass;
    ///
    /// let mut lp = Lowpass::<8>::new();
    ///
    /// // a constant input converges on that input
    /// let mut out = 0;
    /// for _ in 0..100 {
    ///     out = lp.process(500);
    /// }
    /// assert_eq!(out, 500);
    /// ```
    pub fn process(&mut self, s: i32) -> i32 {
        self.y += s - (self.y / K);
        self.y / K
    }
}

impl<const K: i32> Default for Lowpass<K> {
    fn default() -> Self {
        Self::new()
    }
}
