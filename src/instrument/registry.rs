//! Name-keyed instrument construction.
//!
//! [`InstrumentRegistry`] is a plain map from names to constructors. The free
//! functions operate on one process-wide registry that the host fills at
//! startup (for example with [`register_builtin_instruments`]) and clears
//! explicitly at shutdown.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use spin::{Lazy, Mutex};

use super::giant_drum_instrument::GiantDrumInstrument;
use super::Instrument;

pub type InstrumentFactory = Box<dyn Fn() -> Box<dyn Instrument> + Send + Sync>;

#[derive(Default)]
pub struct InstrumentRegistry {
    factories: BTreeMap<String, InstrumentFactory>,
}

impl fmt::Debug for InstrumentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl InstrumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the constructor for `name`. Returns `true` if the name
    /// was not registered before.
    pub fn register<F>(&mut self, name: &str, factory: F) -> bool
    where
        F: Fn() -> Box<dyn Instrument> + Send + Sync + 'static,
    {
        let replaced = self
            .factories
            .insert(name.to_string(), Box::new(factory))
            .is_some();
        if replaced {
            log::debug!("replaced instrument factory `{name}`");
        }
        !replaced
    }

    /// Builds a new instance, or `None` if `name` is unknown.
    pub fn create(&self, name: &str) -> Option<Box<dyn Instrument>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns `true` if a factory was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn unregister_all(&mut self) {
        self.factories.clear();
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }
}

static REGISTRY: Lazy<Mutex<InstrumentRegistry>> =
    Lazy::new(|| Mutex::new(InstrumentRegistry::new()));

/// Registers the instruments shipped with this crate.
pub fn register_builtin_instruments() {
    register_instrument_factory(GiantDrumInstrument::NAME, || {
        Box::new(GiantDrumInstrument::new())
    });
}

pub fn register_instrument_factory<F>(name: &str, factory: F) -> bool
where
    F: Fn() -> Box<dyn Instrument> + Send + Sync + 'static,
{
    REGISTRY.lock().register(name, factory)
}

/// The factory runs with the registry locked and must not call back into it.
pub fn create_instrument(name: &str) -> Option<Box<dyn Instrument>> {
    let instrument = REGISTRY.lock().create(name);
    if instrument.is_none() {
        log::debug!("no instrument registered as `{name}`");
    }
    instrument
}

pub fn is_instrument_registered(name: &str) -> bool {
    REGISTRY.lock().is_registered(name)
}

pub fn registered_instrument_count() -> usize {
    REGISTRY.lock().len()
}

pub fn unregister_instrument_factory(name: &str) -> bool {
    REGISTRY.lock().unregister(name)
}

pub fn unregister_all_factories() {
    REGISTRY.lock().unregister_all();
}

pub fn registered_instrument_names() -> Vec<String> {
    REGISTRY.lock().names().map(ToString::to_string).collect()
}
