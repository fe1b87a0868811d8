//! Linear ramping of parameters in rendering loops.
//!
//! The control side only ever publishes a target; the audio side calls
//! [`ParameterInterpolator::set_target`] at the start of a block and
//! [`ParameterInterpolator::next`] once per sample, so a new value is reached
//! through a short ramp instead of a step.

// Based on MIT-licensed code (c) 2015 by Olivier Gillet (ol.gillet@gmail.com)

#[derive(Debug, Default, Copy, Clone)]
pub struct ParameterInterpolator {
    value: f32,
    target: f32,
    increment: f32,
    remaining: usize,
}

impl ParameterInterpolator {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            target: value,
            increment: 0.0,
            remaining: 0,
        }
    }

    /// Jumps to `value` without ramping.
    pub fn init(&mut self, value: f32) {
        *self = Self::new(value);
    }

    /// Starts a ramp from the current value to `target` over `size` samples.
    /// Re-issuing the current target keeps the ramp in progress.
    pub fn set_target(&mut self, target: f32, size: usize) {
        if target == self.target {
            return;
        }

        self.target = target;
        if size == 0 {
            self.value = target;
            self.increment = 0.0;
            self.remaining = 0;
        } else {
            self.increment = (target - self.value) / (size as f32);
            self.remaining = size;
        }
    }

    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.value = if self.remaining == 0 {
                self.target
            } else {
                self.value + self.increment
            };
        }
        self.value
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }
}
