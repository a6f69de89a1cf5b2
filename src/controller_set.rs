//! # Controller set
//!
//! Owns one instance of every controller plus the persistence machinery, and is what the firmware's main loop talks
//! to. The loop reads the hardware (out of scope here), fills in an [`Inputs`] snapshot, and hands it to
//! [`ControllerSet::process`] together with the current millisecond timestamp and a MIDI sink.
//!
//! Everything runs in that single loop context: no interrupts touch this state, so there is no locking anywhere. If
//! this is ever driven from an interrupt-capable platform, the flash erase/write in the save path must not be
//! preempted by further writes.
//!
//! Sampling is rate limited to at most once per millisecond tick. Processing the same tick twice would only push
//! redundant samples through the filters and inflate MIDI traffic, so iterations that land on the same tick as the
//! previous one skip straight to the save check.

use crate::{
    bank_select_controller::BankSelectController,
    continuous_controller::ContinuousController,
    debounce::DebounceMode,
    flash::{Flash, WearRing},
    midi_out::MidiSink,
    pitch_bend_controller::PitchBendController,
    program_change_controller::ProgramChangeController,
    save_policy::SaveTimer,
    sustain_controller::SustainController,
};

/// Standard CC numbers for the continuous controllers
const CC_MODULATION: u8 = 0x01;
const CC_CHANNEL_VOLUME: u8 = 0x07;
const CC_EFFECT_1: u8 = 0x0C;
const CC_EFFECT_2: u8 = 0x0D;

/// One control-loop iteration's worth of conditioned hardware readings.
///
/// Analog values are 10-bit samples in `[0..1023]`, already range-normalized by the hardware layer. Switch readings
/// are raw and bouncy; debouncing happens inside the controllers.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    pub sustain: bool,
    pub volume: i32,
    pub fx1: i32,
    pub fx2: i32,
    pub pitch_bend: i32,
    pub program_change: i32,
    pub modulation: i32,

    pub program_up: bool,
    pub program_down: bool,
    pub program_group_up: bool,
    pub program_group_down: bool,
    pub bank_up: bool,
    pub bank_down: bool,
}

/// The full set of controllers and their persistence state is represented here.
///
/// # Generic arguments:
///
/// * `PF` - the flash segment holding the program-change base
///
/// * `BF` - the flash segment holding the bank select value
pub struct ControllerSet<PF: Flash, BF: Flash> {
    volume: ContinuousController,
    fx1: ContinuousController,
    fx2: ContinuousController,
    modulation: ContinuousController,
    pitch_bend: PitchBendController,
    sustain: SustainController,
    program_change: ProgramChangeController,
    bank_select: BankSelectController,

    program_store: WearRing<PF>,
    bank_store: WearRing<BF>,

    /// One save timer shared by both persisted domains
    save_timer: SaveTimer,

    /// Timestamp of the last processed iteration, for the 1 kHz rate limit
    prev_time_ms: Option<u32>,
}

impl<PF: Flash, BF: Flash> ControllerSet<PF, BF> {
    /// `ControllerSet::new(mode, pf, bf)` is a new controller set with the given switch debouncing policy, persisting
    /// into the flash segments `pf` and `bf`
    pub fn new(mode: DebounceMode, program_flash: PF, bank_flash: BF) -> Self {
        Self {
            volume: ContinuousController::new(CC_CHANNEL_VOLUME),
            fx1: ContinuousController::new(CC_EFFECT_1),
            fx2: ContinuousController::new(CC_EFFECT_2),
            modulation: ContinuousController::new(CC_MODULATION),
            pitch_bend: PitchBendController::new(),
            sustain: SustainController::new(mode),
            program_change: ProgramChangeController::new(mode),
            bank_select: BankSelectController::new(mode),
            program_store: WearRing::new(program_flash),
            bank_store: WearRing::new(bank_flash),
            save_timer: SaveTimer::new(),
            prev_time_ms: None,
        }
    }

    /// `cs.initialize(sink)` restores persisted state from flash and transmits the initial values, call once at boot
    pub fn initialize<S: MidiSink>(&mut self, sink: &mut S) {
        self.program_change.load(&self.program_store);
        self.bank_select.load(&self.bank_store);

        self.program_change.transmit(sink);
        self.bank_select.transmit(sink);
    }

    /// `cs.process(inputs, now_ms, sink)` runs one control-loop iteration
    ///
    /// Fans the readings out to every controller, rate limited to one pass per millisecond tick, then polls the
    /// deferred-save check (which always runs, even on skipped ticks).
    pub fn process<S: MidiSink>(&mut self, inputs: &Inputs, now_ms: u32, sink: &mut S) {
        if self.prev_time_ms != Some(now_ms) {
            self.sustain.process(inputs.sustain, sink);
            self.volume.process(inputs.volume, sink);
            self.fx1.process(inputs.fx1, sink);
            self.fx2.process(inputs.fx2, sink);
            self.pitch_bend.process(inputs.pitch_bend, sink);
            self.program_change.process(inputs.program_change, sink);
            self.modulation.process(inputs.modulation, sink);

            self.program_change
                .up(inputs.program_up, now_ms, &mut self.save_timer, sink);
            self.program_change
                .down(inputs.program_down, now_ms, &mut self.save_timer, sink);
            self.program_change
                .group_up(inputs.program_group_up, now_ms, &mut self.save_timer, sink);
            self.program_change
                .group_down(inputs.program_group_down, now_ms, &mut self.save_timer, sink);
            self.bank_select
                .up(inputs.bank_up, now_ms, &mut self.save_timer, sink);
            self.bank_select
                .down(inputs.bank_down, now_ms, &mut self.save_timer, sink);

            self.prev_time_ms = Some(now_ms);
        }

        self.save_states(now_ms);
    }

    /// `cs.save_states(now_ms)` commits both persisted domains once the save delay has settled
    pub fn save_states(&mut self, now_ms: u32) {
        if self.save_timer.should_save(now_ms) {
            self.program_change.save(&mut self.program_store);
            self.bank_select.save(&mut self.bank_store);
            self.save_timer.mark_saved();
        }
    }
}
