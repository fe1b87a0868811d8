//! Resonator building blocks: single modes, the coupled cavity/shell pair, the
//! membrane mode bank and the shell wrapper.

pub mod coupled_resonator;
pub mod membrane_resonator;
pub mod resonant_mode;
pub mod shell_resonator;
