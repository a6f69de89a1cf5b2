//! # Continuous controller
//!
//! Turns a raw analog pot reading into 14-bit MIDI Control Change messages. Used for volume, effects, modulation,
//! or any other expression-pedal style control.
//!
//! The raw 10-bit sample runs through two cascaded lowpass filters (a coarse one and a slower fine one) and then a
//! noise gate. Only when the gated value actually moves does anything go out on the wire, which keeps a noisy pot
//! from flooding the MIDI stream.
//!
//! The 10-bit value is split across two 7-bit CC messages following the MIDI convention where the LSB controller
//! number is the MSB controller number plus `0x20`. The split is `msb = val >> 3`, `lsb = (val << 4) & 0x7F`; the
//! LSB goes out first so a receiver tracking both never sees a torn value. Receivers that only understand the MSB
//! controller simply ignore the companion message.

use crate::{
    config,
    lowpass::Lowpass,
    midi_out::MidiSink,
    noise_gate::NoiseGate,
};
use midi_convert::midi_types::{Control, MidiMessage, Value7};

/// The controller-number offset between an MSB control and its LSB companion
const LSB_CC_OFFSET: u8 = 0x20;

/// A continuous MIDI controller is represented here.
pub struct ContinuousController {
    /// The MSB controller number, the LSB companion is derived from it
    control: u8,

    lp_coarse: Lowpass<{ config::LOWPASS_COARSE_K }>,
    lp_fine: Lowpass<{ config::LOWPASS_FINE_K }>,
    gate: NoiseGate<{ config::NOISE_WINDOW }>,
}

impl ContinuousController {
    /// `ContinuousController::new(cc)` is a new continuous controller sending on MSB controller number `cc`
    ///
    /// `cc` should be below `0x20` so that `cc | 0x20` is the standard LSB companion number.
    pub fn new(control: u8) -> Self {
        Self {
            control,
            lp_coarse: Lowpass::new(),
            lp_fine: Lowpass::new(),
            gate: NoiseGate::new(),
        }
    }

    /// `ctl.process(s, sink)` conditions the raw 10-bit sample `s` and emits CC messages if the value moved
    ///
    /// Expected to be called once per control-loop tick.
    pub fn process<S: MidiSink>(&mut self, sample: i32, sink: &mut S) {
        let val = self.lp_fine.process(self.lp_coarse.process(sample));
        if self.gate.process(val) {
            let msb = (val >> 3) as u8;
            let lsb = ((val << 4) & 0x7F) as u8;

            sink.send(MidiMessage::ControlChange(
                config::midi_channel(),
                Control::new(self.control | LSB_CC_OFFSET),
                Value7::new(lsb),
            ));
            sink.send(MidiMessage::ControlChange(
                config::midi_channel(),
                Control::new(self.control),
                Value7::new(msb),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    const CC_VOLUME: u8 = 0x07;

    /// `settle(ctl, s, sink)` feeds a constant sample until the filters have converged
    fn settle<S: MidiSink>(ctl: &mut ContinuousController, sample: i32, sink: &mut S) {
        for _ in 0..500 {
            ctl.process(sample, sink);
        }
    }

    #[test]
    fn a_steady_input_eventually_goes_quiet() {
        let mut ctl = ContinuousController::new(CC_VOLUME);
        let mut out: Vec<MidiMessage, 64> = Vec::new();

        settle(&mut ctl, 500, &mut out);
        out.clear();

        // filters are converged, the gate suppresses everything now
        for _ in 0..100 {
            ctl.process(500, &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn a_moved_value_emits_lsb_then_msb() {
        let mut ctl = ContinuousController::new(CC_VOLUME);
        let mut out: Vec<MidiMessage, 1024> = Vec::new();

        settle(&mut ctl, 0, &mut out);
        out.clear();

        settle(&mut ctl, 1023, &mut out);
        assert!(!out.is_empty());

        // the last report is near full scale, so its MSB is 127; the exact LSB depends on where the gate last fired
        let n = out.len();
        match out[n - 2] {
            MidiMessage::ControlChange(_, cc, _) => assert_eq!(u8::from(cc), CC_VOLUME | 0x20),
            _ => panic!("expected a control change"),
        }
        assert_eq!(
            out[n - 1],
            MidiMessage::ControlChange(
                config::midi_channel(),
                Control::new(CC_VOLUME),
                Value7::new(127),
            )
        );
    }

    #[test]
    fn messages_come_in_lsb_msb_pairs() {
        let mut ctl = ContinuousController::new(CC_VOLUME);
        let mut out: Vec<MidiMessage, 1024> = Vec::new();

        settle(&mut ctl, 800, &mut out);

        assert!(!out.is_empty());
        assert_eq!(out.len() % 2, 0);
        for pair in out.chunks(2) {
            let lsb_cc = match pair[0] {
                MidiMessage::ControlChange(_, cc, _) => u8::from(cc),
                _ => panic!("expected a control change"),
            };
            let msb_cc = match pair[1] {
                MidiMessage::ControlChange(_, cc, _) => u8::from(cc),
                _ => panic!("expected a control change"),
            };
            assert_eq!(lsb_cc, CC_VOLUME | 0x20);
            assert_eq!(msb_cc, CC_VOLUME);
        }
    }

    #[test]
    fn small_jitter_is_gated_out() {
        let mut ctl = ContinuousController::new(CC_VOLUME);
        let mut out: Vec<MidiMessage, 64> = Vec::new();

        // the filters and the gate both start at zero, so a quiet pot at zero emits nothing
        for _ in 0..100 {
            ctl.process(0, &mut out);
        }
        assert!(out.is_empty());

        // a couple counts of noise stays inside the gate window
        for _ in 0..100 {
            ctl.process(1, &mut out);
            ctl.process(2, &mut out);
            ctl.process(0, &mut out);
        }
        assert!(out.is_empty());
    }
}
