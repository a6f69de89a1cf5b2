#![no_std]
#![doc = include_str!("../README.md")]

pub mod bank_select_controller;
pub mod config;
pub mod continuous_controller;
pub mod controller_set;
pub mod debounce;
pub mod flash;
pub mod lowpass;
pub mod midi_out;
pub mod noise_gate;
pub mod pitch_bend_controller;
pub mod program_change_controller;
pub mod save_policy;
pub mod sustain_controller;
