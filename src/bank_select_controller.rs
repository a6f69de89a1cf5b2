//! # Bank select controller
//!
//! The bank is a single persisted value in `[0..127]`, stepped up and down with a pair of footswitches and sent as
//! CC 0 (bank select). There is no analog input and no transient offset; what the buttons set is exactly what gets
//! persisted and transmitted.

use crate::{
    config,
    debounce::{DebounceMode, RepeatButton},
    flash::{Flash, WearRing},
    midi_out::MidiSink,
    save_policy::SaveTimer,
};
use midi_convert::midi_types::{Control, MidiMessage, Value7};

/// The MIDI CC number for bank select
const CC_BANK_SELECT: u8 = 0x00;

/// A bank select controller is represented here.
pub struct BankSelectController {
    /// Current bank, persisted directly
    curr: i16,

    btn_up: RepeatButton<{ config::DEBOUNCE_SAMPLES }>,
    btn_down: RepeatButton<{ config::DEBOUNCE_SAMPLES }>,
}

impl BankSelectController {
    /// `BankSelectController::new(mode)` is a new bank select controller with the given button debouncing policy
    pub fn new(mode: DebounceMode) -> Self {
        let button = || RepeatButton::new(config::REPEAT_INITIAL_DELAY_MS, config::REPEAT_RATE_MS, mode);
        Self {
            curr: 0,
            btn_up: button(),
            btn_down: button(),
        }
    }

    /// `bs.load(store)` restores the persisted bank from flash, keeping the default when the store is empty
    pub fn load<F: Flash>(&mut self, store: &WearRing<F>) {
        if !store.empty() {
            self.curr = store.read() as i16;
        }
    }

    /// `bs.save(store)` commits the bank to flash, skipping the write when the stored value already matches
    pub fn save<F: Flash>(&mut self, store: &mut WearRing<F>) {
        let curr = self.curr.clamp(0, 127) as u8;
        if curr != store.read() {
            store.write(curr);
        }
    }

    /// `bs.transmit(sink)` emits the current bank as a bank select CC message
    pub fn transmit<S: MidiSink>(&self, sink: &mut S) {
        sink.send(MidiMessage::ControlChange(
            config::midi_channel(),
            Control::new(CC_BANK_SELECT),
            Value7::new(self.curr.clamp(0, 127) as u8),
        ));
    }

    /// `bs.up(sw, now_ms, save, sink)` steps the bank up by 1 while the up button fires
    pub fn up<S: MidiSink>(&mut self, sw: bool, now_ms: u32, save: &mut SaveTimer, sink: &mut S) {
        if self.btn_up.process(sw, now_ms) && self.curr < 127 {
            self.curr += 1;
            save.reset(now_ms);
            self.transmit(sink);
        }
    }

    /// `bs.down(sw, now_ms, save, sink)` steps the bank down by 1 while the down button fires
    pub fn down<S: MidiSink>(&mut self, sw: bool, now_ms: u32, save: &mut SaveTimer, sink: &mut S) {
        if self.btn_down.process(sw, now_ms) && self.curr > 0 {
            self.curr -= 1;
            save.reset(now_ms);
            self.transmit(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::RamFlash;
    use heapless::Vec;

    fn test_controller() -> BankSelectController {
        BankSelectController::new(DebounceMode::ImmediatePress)
    }

    #[test]
    fn up_steps_the_bank_and_transmits() {
        let mut bs = test_controller();
        let mut save = SaveTimer::new();
        let mut out: Vec<MidiMessage, 8> = Vec::new();

        bs.up(true, 0, &mut save, &mut out);
        assert_eq!(bs.curr, 1);
        assert_eq!(
            out[0],
            MidiMessage::ControlChange(config::midi_channel(), Control::new(CC_BANK_SELECT), Value7::new(1))
        );
        assert!(save.should_save(config::SAVE_DELAY_MS + 1));
    }

    #[test]
    fn bank_is_clamped_to_the_midi_range() {
        let mut bs = test_controller();
        let mut save = SaveTimer::new();
        let mut out: Vec<MidiMessage, 8> = Vec::new();

        bs.curr = 127;
        bs.up(true, 0, &mut save, &mut out);
        assert_eq!(bs.curr, 127);
        assert!(out.is_empty());

        let mut bs = test_controller();
        bs.down(true, 0, &mut save, &mut out);
        assert_eq!(bs.curr, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn load_and_save_round_trip_through_the_wear_ring() {
        let mut store = WearRing::new(RamFlash::new());
        let mut bs = test_controller();

        bs.curr = 77;
        bs.save(&mut store);

        let mut restored = test_controller();
        restored.load(&store);
        assert_eq!(restored.curr, 77);
    }

    #[test]
    fn save_skips_the_write_when_the_value_is_unchanged() {
        let mut store = WearRing::new(RamFlash::new());
        let mut bs = test_controller();

        bs.curr = 3;
        bs.save(&mut store);
        bs.save(&mut store);
        bs.save(&mut store);

        // only one slot consumed
        assert_eq!(store.read(), 3);
        bs.curr = 4;
        bs.save(&mut store);
        assert_eq!(store.read(), 4);
    }

    #[test]
    fn an_empty_store_keeps_the_default_bank() {
        let store: WearRing<RamFlash> = WearRing::new(RamFlash::new());
        let mut bs = test_controller();

        bs.load(&store);
        assert_eq!(bs.curr, 0);
    }
}
