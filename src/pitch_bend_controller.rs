//! # Pitch bend controller
//!
//! Same analog conditioning as the continuous controller (two cascaded lowpass filters into a noise gate), but the
//! result goes out as a single 14-bit Pitch Bend message instead of a CC pair.
//!
//! The 10-bit filtered value is expanded to 14 bits as `(val << 4) + (val % 16)`. This is not a clean bit shift: the
//! low bits are folded back in so that a full-scale input of 1023 lands exactly on the full-scale bend of 16383
//! rather than 16368. Receivers depend on reaching the end stops, so the expansion is preserved bit-exactly.

use crate::{
    config,
    lowpass::Lowpass,
    midi_out::MidiSink,
    noise_gate::NoiseGate,
};
use midi_convert::midi_types::{MidiMessage, Value14};

/// A pitch bend controller is represented here.
pub struct PitchBendController {
    lp_coarse: Lowpass<{ config::LOWPASS_COARSE_K }>,
    lp_fine: Lowpass<{ config::LOWPASS_FINE_K }>,
    gate: NoiseGate<{ config::NOISE_WINDOW }>,
}

impl PitchBendController {
    /// `PitchBendController::new()` is a new pitch bend controller
    pub fn new() -> Self {
        Self {
            lp_coarse: Lowpass::new(),
            lp_fine: Lowpass::new(),
            gate: NoiseGate::new(),
        }
    }

    /// `pb.process(s, sink)` conditions the raw 10-bit sample `s` and emits a pitch bend message if the value moved
    ///
    /// Expected to be called once per control-loop tick.
    pub fn process<S: MidiSink>(&mut self, sample: i32, sink: &mut S) {
        let val = self.lp_fine.process(self.lp_coarse.process(sample));
        if self.gate.process(val) {
            let bend = ((val << 4) + (val % 16)) as u16;
            sink.send(MidiMessage::PitchBendChange(
                config::midi_channel(),
                Value14::from(bend),
            ));
        }
    }
}

impl Default for PitchBendController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[test]
    fn full_scale_input_reaches_the_full_scale_bend() {
        let mut pb = PitchBendController::new();
        let mut out: Vec<MidiMessage, 1024> = Vec::new();

        for _ in 0..500 {
            pb.process(1023, &mut out);
        }
        assert!(!out.is_empty());

        // 1023 expands to (1023 << 4) + 15 = 16383, the very top of the 14-bit range
        let last = out[out.len() - 1];
        match last {
            MidiMessage::PitchBendChange(_, value) => {
                let bend = u16::from(value);
                assert!(16383 - 48 <= bend, "bend {} is not near full scale", bend);
            }
            _ => panic!("expected a pitch bend"),
        }
    }

    #[test]
    fn midpoint_input_maps_near_the_bend_midpoint() {
        let mut pb = PitchBendController::new();
        let mut out: Vec<MidiMessage, 1024> = Vec::new();

        for _ in 0..500 {
            pb.process(512, &mut out);
        }
        assert!(!out.is_empty());

        let last = out[out.len() - 1];
        match last {
            MidiMessage::PitchBendChange(_, value) => {
                let bend = u16::from(value);
                // 512 expands to (512 << 4) + 0 = 8192, give or take the gate's final resting point
                assert!(8192 - 48 <= bend && bend <= 8192 + 48);
            }
            _ => panic!("expected a pitch bend"),
        }
    }

    #[test]
    fn expansion_is_exact_when_the_gate_fires_on_a_known_value() {
        let mut pb = PitchBendController::new();
        let mut out: Vec<MidiMessage, 8> = Vec::new();

        // first tick: coarse filter passes 1000/8 = 125, fine passes 125/16 = 7
        pb.process(1000, &mut out);
        assert_eq!(out.len(), 1);
        match out[0] {
            MidiMessage::PitchBendChange(_, value) => {
                // 7 expands to (7 << 4) + 7 = 119
                assert_eq!(u16::from(value), 119);
            }
            _ => panic!("expected a pitch bend"),
        }
    }

    #[test]
    fn a_quiet_input_emits_nothing() {
        let mut pb = PitchBendController::new();
        let mut out: Vec<MidiMessage, 8> = Vec::new();

        for _ in 0..100 {
            pb.process(0, &mut out);
        }
        assert!(out.is_empty());
    }
}
