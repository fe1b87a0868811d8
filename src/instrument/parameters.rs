//! Named instrument parameters shared between a control thread and the audio
//! thread.
//!
//! Every value is an `f32` stored as its bit pattern in an `AtomicU32`, so a
//! reader sees either the old or the new value and never blocks. The audio
//! side samples the cells at block boundaries.

use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Deref;
use core::sync::atomic::{AtomicU32, Ordering};

use super::error::InstrumentError;

/// Static description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParameterInfo {
    pub const fn new(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            min,
            max,
            default,
        }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug)]
struct ParameterCells {
    layout: &'static [ParameterInfo],
    values: Vec<AtomicU32>,
}

/// Shared, cheaply clonable access to a parameter set.
#[derive(Debug, Clone)]
pub struct ParameterHandle {
    cells: Arc<ParameterCells>,
}

impl ParameterHandle {
    pub fn layout(&self) -> &'static [ParameterInfo] {
        self.cells.layout
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.cells.layout.iter().position(|info| info.name == name)
    }

    /// Value by index. Panics if `index` is out of range.
    #[inline]
    pub fn value(&self, index: usize) -> f32 {
        f32::from_bits(self.cells.values[index].load(Ordering::Relaxed))
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.index_of(name).map(|index| self.value(index))
    }

    /// Stores `value` clamped to the parameter's range and returns what was
    /// stored. Non-finite values are rejected.
    pub fn set(&self, name: &str, value: f32) -> Result<f32, InstrumentError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| InstrumentError::UnknownParameter(name.to_string()))?;

        if !value.is_finite() {
            return Err(InstrumentError::InvalidParameterValue {
                name: name.to_string(),
                value,
            });
        }

        let value = self.cells.layout[index].clamp(value);
        self.store(index, value);

        Ok(value)
    }

    #[inline]
    pub(crate) fn store(&self, index: usize, value: f32) {
        self.cells.values[index].store(value.to_bits(), Ordering::Relaxed);
    }

    /// `(name, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.cells
            .layout
            .iter()
            .enumerate()
            .map(|(index, info)| (info.name, self.value(index)))
    }
}

/// Owner of a parameter set.
///
/// Dereferences to [`ParameterHandle`]. Cloning a store copies the current
/// values into a new, independent set; use [`ParameterStore::handle`] to share.
#[derive(Debug)]
pub struct ParameterStore {
    handle: ParameterHandle,
}

impl ParameterStore {
    pub fn new(layout: &'static [ParameterInfo]) -> Self {
        let values = layout
            .iter()
            .map(|info| AtomicU32::new(info.default.to_bits()))
            .collect();

        Self {
            handle: ParameterHandle {
                cells: Arc::new(ParameterCells { layout, values }),
            },
        }
    }

    pub fn handle(&self) -> ParameterHandle {
        self.handle.clone()
    }
}

impl Clone for ParameterStore {
    fn clone(&self) -> Self {
        let copy = Self::new(self.layout());
        for index in 0..self.layout().len() {
            copy.store(index, self.value(index));
        }
        copy
    }
}

impl Deref for ParameterStore {
    type Target = ParameterHandle;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}
