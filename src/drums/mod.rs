//! Drum voices and the voice pool.

pub mod giant_drum_voice;
pub mod voice_manager;

use crate::utils::clamp_finite;

pub const MIN_SCALE_METERS: f32 = 0.1;
pub const MAX_SCALE_METERS: f32 = 20.0;

/// How the drum is hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureParameters {
    /// Strike force, `0.0..=1.0`.
    pub force: f32,
    /// Mallet speed, `0.0..=1.0`.
    pub speed: f32,
    /// Contact area, `0.0..=1.0`. Also used as the strike position, larger
    /// contact reaching further off-center.
    pub contact_area: f32,
    /// Surface roughness, `0.0..=1.0`. Adds inharmonicity.
    pub roughness: f32,
}

impl Default for GestureParameters {
    fn default() -> Self {
        Self {
            force: 0.8,
            speed: 0.7,
            contact_area: 0.5,
            roughness: 0.2,
        }
    }
}

impl GestureParameters {
    pub fn clamped(&self) -> Self {
        Self {
            force: clamp_finite(self.force, 0.0, 1.0, 0.0),
            speed: clamp_finite(self.speed, 0.0, 1.0, 0.0),
            contact_area: clamp_finite(self.contact_area, 0.0, 1.0, 0.5),
            roughness: clamp_finite(self.roughness, 0.0, 1.0, 0.0),
        }
    }
}

/// Physical size and material of the drum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParameters {
    /// Membrane diameter in meters, `0.1..=20.0`.
    pub scale_meters: f32,
    /// Heavier membranes: more inharmonic, stronger shell coupling.
    pub mass_bias: f32,
    /// Air damping, `0.0..=1.0`. Shortens the decay of every mode alike.
    pub air_loss: f32,
    /// Lengthens the decay, `0.0..=1.0`.
    pub transient_slowing: f32,
}

impl Default for ScaleParameters {
    fn default() -> Self {
        Self {
            scale_meters: 1.0,
            mass_bias: 0.5,
            air_loss: 0.3,
            transient_slowing: 0.2,
        }
    }
}

impl ScaleParameters {
    pub fn clamped(&self) -> Self {
        Self {
            scale_meters: clamp_finite(self.scale_meters, MIN_SCALE_METERS, MAX_SCALE_METERS, 1.0),
            mass_bias: clamp_finite(self.mass_bias, 0.0, 1.0, 0.5),
            air_loss: clamp_finite(self.air_loss, 0.0, 1.0, 0.0),
            transient_slowing: clamp_finite(self.transient_slowing, 0.0, 1.0, 0.0),
        }
    }
}
