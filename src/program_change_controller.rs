//! # Program change controller
//!
//! Selects the MIDI program from two inputs which combine:
//!
//! * a 5-way rotary/selector read as an analog voltage, mapped to a zone in `[0..4]` with a hysteresis band so the
//!   value can't chatter at a zone boundary
//!
//! * a persisted `base` value stepped up and down with footswitches (±1, or ±5 with the group buttons), with
//!   keyboard-style repeat while held
//!
//! The transmitted program is `clamp(zone + base, 0, 127)`. The zone is never persisted; it is recomputed from the
//! analog input after every boot and defaults to 0 until the first sample arrives. The base is persisted through the
//! wear-leveling flash ring, with the actual write deferred by the save timer so bursts of presses cost one write.
//!
//! With the `pc-cc-mapping` feature the controller also mirrors the zone onto five consecutive CC numbers in a
//! one-hot pattern, for receivers that cannot remap program change messages. All five CCs are sent every time so a
//! receiver that missed an earlier message still converges to a consistent state.

use crate::{
    config,
    debounce::{DebounceMode, RepeatButton},
    flash::{Flash, WearRing},
    midi_out::MidiSink,
    save_policy::SaveTimer,
};
use midi_convert::midi_types::{MidiMessage, Program};
#[cfg(feature = "pc-cc-mapping")]
use midi_convert::midi_types::{Control, Value7};

/// Analog span of one zone of the 5-way selector, 1024 / 5 rounded
const ZONE_SPAN: i32 = 205;

/// Samples closer than this to the center of the current zone are ignored
const HYSTERESIS_BAND: i32 = 8;

/// A program change controller is represented here.
pub struct ProgramChangeController {
    /// Current zone of the 5-way selector in `[0..4]`, never persisted
    curr: i16,

    /// Persisted program base, stepped by the buttons
    base: i16,

    btn_up: RepeatButton<{ config::DEBOUNCE_SAMPLES }>,
    btn_down: RepeatButton<{ config::DEBOUNCE_SAMPLES }>,
    grp_btn_up: RepeatButton<{ config::DEBOUNCE_SAMPLES }>,
    grp_btn_down: RepeatButton<{ config::DEBOUNCE_SAMPLES }>,
}

impl ProgramChangeController {
    /// `ProgramChangeController::new(mode)` is a new program change controller with the given button debouncing
    /// policy, zone and base both at zero
    pub fn new(mode: DebounceMode) -> Self {
        let button = || RepeatButton::new(config::REPEAT_INITIAL_DELAY_MS, config::REPEAT_RATE_MS, mode);
        Self {
            curr: 0,
            base: 0,
            btn_up: button(),
            btn_down: button(),
            grp_btn_up: button(),
            grp_btn_down: button(),
        }
    }

    /// `pc.load(store)` restores the persisted base from flash, keeping the default when the store is empty
    pub fn load<F: Flash>(&mut self, store: &WearRing<F>) {
        if !store.empty() {
            self.base = store.read() as i16;
        }
    }

    /// `pc.save(store)` commits the base to flash, skipping the write when the stored value already matches
    ///
    /// Skipping unchanged values is what conserves wear-ring slots and, eventually, erase cycles.
    pub fn save<F: Flash>(&mut self, store: &mut WearRing<F>) {
        let base = self.base.clamp(0, 127) as u8;
        if base != store.read() {
            store.write(base);
        }
    }

    /// `pc.get()` is the current program number, the zone and base combined and clamped to the valid MIDI range
    pub fn get(&self) -> u8 {
        (self.curr + self.base).clamp(0, 127) as u8
    }

    /// `pc.transmit(sink)` emits the current program as a Program Change message
    ///
    /// With the `pc-cc-mapping` feature the one-hot CC mirror of the zone follows the program change.
    pub fn transmit<S: MidiSink>(&self, sink: &mut S) {
        sink.send(MidiMessage::ProgramChange(
            config::midi_channel(),
            Program::new(self.get()),
        ));

        #[cfg(feature = "pc-cc-mapping")]
        self.send_cc_mapping(sink);
    }

    /// `pc.send_cc_mapping(sink)` emits the one-hot CC mirror of the current zone
    ///
    /// Always sends all five CCs in ascending order so receivers converge even after a dropped message.
    #[cfg(feature = "pc-cc-mapping")]
    fn send_cc_mapping<S: MidiSink>(&self, sink: &mut S) {
        if !(0..=4).contains(&self.curr) {
            return;
        }
        for i in 0..5_i16 {
            let value = if i == self.curr { 127 } else { 0 };
            sink.send(MidiMessage::ControlChange(
                config::midi_channel(),
                Control::new(config::PC_CC_MAPPING_START + i as u8),
                Value7::new(value),
            ));
        }
    }

    /// `pc.process(s, sink)` folds in the raw 10-bit selector sample `s`, transmitting when the zone changes
    ///
    /// Samples inside the hysteresis band around the current zone's center are ignored outright, which keeps the
    /// selector from chattering when it rests right on a zone boundary.
    pub fn process<S: MidiSink>(&mut self, sample: i32, sink: &mut S) {
        let center = self.curr as i32 * ZONE_SPAN;
        let diff = (center - sample).abs();
        if diff < HYSTERESIS_BAND {
            return;
        }

        let val = ((sample * 5) / 1024) as i16;
        if val != self.curr {
            self.curr = val;
            self.transmit(sink);
        }
    }

    /// `pc.up(sw, now_ms, save, sink)` steps the base up by 1 while the up button fires
    pub fn up<S: MidiSink>(&mut self, sw: bool, now_ms: u32, save: &mut SaveTimer, sink: &mut S) {
        if self.btn_up.process(sw, now_ms) && self.base < 127 {
            self.base += 1;
            save.reset(now_ms);
            self.transmit(sink);
        }
    }

    /// `pc.down(sw, now_ms, save, sink)` steps the base down by 1 while the down button fires
    pub fn down<S: MidiSink>(&mut self, sw: bool, now_ms: u32, save: &mut SaveTimer, sink: &mut S) {
        if self.btn_down.process(sw, now_ms) && self.base > 0 {
            self.base -= 1;
            save.reset(now_ms);
            self.transmit(sink);
        }
    }

    /// `pc.group_up(sw, now_ms, save, sink)` steps the base up by 5 while the group-up button fires
    pub fn group_up<S: MidiSink>(&mut self, sw: bool, now_ms: u32, save: &mut SaveTimer, sink: &mut S) {
        if self.grp_btn_up.process(sw, now_ms) && self.base < 127 {
            self.base += 5;
            save.reset(now_ms);
            self.transmit(sink);
        }
    }

    /// `pc.group_down(sw, now_ms, save, sink)` steps the base down by 5 while the group-down button fires
    pub fn group_down<S: MidiSink>(&mut self, sw: bool, now_ms: u32, save: &mut SaveTimer, sink: &mut S) {
        if self.grp_btn_down.process(sw, now_ms) && self.base > 0 {
            self.base -= 5;
            save.reset(now_ms);
            self.transmit(sink);
        }
    }
}
