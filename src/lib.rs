#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod drums;
pub mod instrument;
pub mod physical_modelling;
pub mod utils;

pub use instrument::giant_drum_instrument::GiantDrumInstrument;
pub use instrument::registry::{create_instrument, register_builtin_instruments};
pub use instrument::{Instrument, InstrumentError, NoteEvent};
