//! # Compile time configuration
//!
//! Every tuning constant for the signal chain and the persistence layer lives here. These are fixed at build time;
//! there is no runtime configuration protocol.

use midi_convert::midi_types::Channel;

/// The MIDI channel every message is sent on, zero based
pub const MIDI_CHANNEL: u8 = 0;

/// `midi_channel()` is the configured MIDI channel as a `midi_types` channel
pub fn midi_channel() -> Channel {
    Channel::new(MIDI_CHANNEL)
}

/// Coarse lowpass coefficient, the first filter in the analog conditioning cascade
pub const LOWPASS_COARSE_K: i32 = 8;

/// Fine lowpass coefficient, the second filter in the cascade, slower than the coarse one
pub const LOWPASS_FINE_K: i32 = 16;

/// Half-width of the noise gate window around the last reported analog value
pub const NOISE_WINDOW: i32 = 2;

/// Number of consistent readings required to debounce a switch transition
pub const DEBOUNCE_SAMPLES: u32 = 10;

/// Initial hold time before a held button starts repeating, in milliseconds
pub const REPEAT_INITIAL_DELAY_MS: u32 = 1000;

/// Repeat interval once a held button is repeating, in milliseconds
pub const REPEAT_RATE_MS: u32 = 100;

/// Quiescent time after the last state change before values are committed to flash, in milliseconds
///
/// Bursts of button presses inside this window coalesce into a single flash write.
pub const SAVE_DELAY_MS: u32 = 3000;

/// Size of one erasable flash segment in bytes
///
/// One segment can absorb this many writes before it has to be erased again.
pub const SEGMENT_LEN: usize = 64;

/// First CC number of the one-hot program-change mapping, uses five consecutive numbers starting here
///
/// Must be at most 0x7A so the whole mapping stays inside the valid CC range.
#[cfg(feature = "pc-cc-mapping")]
pub const PC_CC_MAPPING_START: u8 = 0x66;
