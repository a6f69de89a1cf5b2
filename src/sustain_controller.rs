//! # Sustain pedal controller
//!
//! Runs an edge detector over the sustain footswitch line and emits CC 64 (sustain) on clean transitions.
//!
//! Note the polarity: a rising debounced edge sends value 0 and a falling edge sends value 127. The switch is wired
//! so that pressing the pedal reads as the debounced-false state, which is what makes this come out right on the
//! wire. Confirm against the actual hardware wiring before "fixing" this.

use crate::{
    config,
    debounce::{DebounceMode, Edge, EdgeDetector},
    midi_out::MidiSink,
};
use midi_convert::midi_types::{Control, MidiMessage, Value7};

/// The MIDI CC number for the sustain pedal
const CC_SUSTAIN: u8 = 0x40;

/// A sustain pedal controller is represented here.
pub struct SustainController {
    edge: EdgeDetector<{ config::DEBOUNCE_SAMPLES }>,
}

impl SustainController {
    /// `SustainController::new(mode)` is a new sustain controller with the given debouncing policy
    pub fn new(mode: DebounceMode) -> Self {
        Self {
            edge: EdgeDetector::new(mode),
        }
    }

    /// `sc.process(sw, sink)` folds in the raw switch reading `sw` and emits sustain CC messages on clean edges
    ///
    /// Expected to be called once per control-loop tick.
    pub fn process<S: MidiSink>(&mut self, sw: bool, sink: &mut S) {
        match self.edge.process(sw) {
            Some(Edge::Rising) => sink.send(MidiMessage::ControlChange(
                config::midi_channel(),
                Control::new(CC_SUSTAIN),
                Value7::new(0),
            )),
            Some(Edge::Falling) => sink.send(MidiMessage::ControlChange(
                config::midi_channel(),
                Control::new(CC_SUSTAIN),
                Value7::new(127),
            )),
            None => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    const SAMPLES: usize = config::DEBOUNCE_SAMPLES as usize;

    #[test]
    fn rising_edge_sends_zero() {
        let mut sc = SustainController::new(DebounceMode::Standard);
        let mut out: Vec<MidiMessage, 8> = Vec::new();

        for _ in 0..SAMPLES {
            sc.process(true, &mut out);
        }

        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0],
            MidiMessage::ControlChange(config::midi_channel(), Control::new(CC_SUSTAIN), Value7::new(0))
        );
    }

    #[test]
    fn falling_edge_sends_full_value() {
        let mut sc = SustainController::new(DebounceMode::Standard);
        let mut out: Vec<MidiMessage, 8> = Vec::new();

        for _ in 0..SAMPLES {
            sc.process(true, &mut out);
        }
        for _ in 0..SAMPLES {
            sc.process(false, &mut out);
        }

        assert_eq!(out.len(), 2);
        assert_eq!(
            out[1],
            MidiMessage::ControlChange(config::midi_channel(), Control::new(CC_SUSTAIN), Value7::new(127))
        );
    }

    #[test]
    fn holding_emits_nothing_further() {
        let mut sc = SustainController::new(DebounceMode::Standard);
        let mut out: Vec<MidiMessage, 8> = Vec::new();

        for _ in 0..SAMPLES * 10 {
            sc.process(true, &mut out);
        }
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn contact_bounce_does_not_produce_extra_messages() {
        let mut sc = SustainController::new(DebounceMode::Standard);
        let mut out: Vec<MidiMessage, 8> = Vec::new();

        // a bouncy press: short false glitches inside the press never complete a release debounce
        for _ in 0..SAMPLES * 2 {
            sc.process(true, &mut out);
        }
        sc.process(false, &mut out);
        sc.process(false, &mut out);
        for _ in 0..SAMPLES * 2 {
            sc.process(true, &mut out);
        }

        assert_eq!(out.len(), 1);
    }
}
