//! Initialization levels and the extension entry point
//!
//! The host initializes an extension level by level, `Core` first, and tears
//! it down in reverse. Classes remember the level they were registered at so
//! `deinitialize` can remove exactly those.

use tracing::{debug, warn};

use crate::error::RegistrationError;
use crate::registry::ClassRegistry;

/// Initialization level, in start-up order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u32)]
pub enum InitLevel {
    /// Core types
    #[default]
    Core = 0,
    /// Server singletons
    Servers = 1,
    /// Scene classes
    Scene = 2,
    /// Editor-only classes
    Editor = 3,
}

impl InitLevel {
    /// All levels in start-up order
    pub const ALL: [InitLevel; 4] = [
        InitLevel::Core,
        InitLevel::Servers,
        InitLevel::Scene,
        InitLevel::Editor,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Called when a level starts
pub type InitializeFn =
    Box<dyn FnMut(&mut ClassRegistry, InitLevel) -> Result<(), RegistrationError> + Send>;

/// Called when a level ends, before its classes are unregistered
pub type DeinitializeFn = Box<dyn FnMut(&mut ClassRegistry, InitLevel) + Send>;

/// Per-level callbacks of one extension
pub struct ExtensionLibrary {
    initialize: Option<InitializeFn>,
    deinitialize: Option<DeinitializeFn>,
    minimum_level: InitLevel,
    initialized: [bool; 4],
}

impl Default for ExtensionLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionLibrary {
    /// Library with no callbacks and minimum level `Core`
    pub fn new() -> Self {
        ExtensionLibrary {
            initialize: None,
            deinitialize: None,
            minimum_level: InitLevel::Core,
            initialized: [false; 4],
        }
    }

    /// Set the initialize callback
    pub fn on_initialize<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut ClassRegistry, InitLevel) -> Result<(), RegistrationError> + Send + 'static,
    {
        self.initialize = Some(Box::new(f));
        self
    }

    /// Set the deinitialize callback
    pub fn on_deinitialize<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut ClassRegistry, InitLevel) + Send + 'static,
    {
        self.deinitialize = Some(Box::new(f));
        self
    }

    /// Skip levels below `level`
    pub fn with_minimum_level(mut self, level: InitLevel) -> Self {
        self.minimum_level = level;
        self
    }

    /// Lowest level this library takes part in
    pub fn minimum_level(&self) -> InitLevel {
        self.minimum_level
    }

    /// Whether `level` has been initialized and not yet torn down
    pub fn is_initialized(&self, level: InitLevel) -> bool {
        self.initialized[level.slot()]
    }

    /// Start a level: classes registered by the callback belong to it.
    ///
    /// Levels below the minimum and levels already initialized are skipped.
    /// If the callback fails, classes it registered at this level are removed
    /// and the level stays uninitialized.
    pub fn initialize(
        &mut self,
        registry: &mut ClassRegistry,
        level: InitLevel,
    ) -> Result<(), RegistrationError> {
        if level < self.minimum_level || self.initialized[level.slot()] {
            return Ok(());
        }
        debug!(?level, "initializing extension level");
        registry.set_current_level(level);
        if let Some(init) = self.initialize.as_mut() {
            if let Err(err) = init(registry, level) {
                warn!(?level, %err, "extension level failed to initialize; rolling back");
                registry.unregister_level(level);
                return Err(err);
            }
        }
        self.initialized[level.slot()] = true;
        Ok(())
    }

    /// End a level: run the callback, then unregister the level's classes.
    pub fn deinitialize(&mut self, registry: &mut ClassRegistry, level: InitLevel) {
        if level < self.minimum_level || !self.initialized[level.slot()] {
            return;
        }
        debug!(?level, "deinitializing extension level");
        if let Some(deinit) = self.deinitialize.as_mut() {
            deinit(registry, level);
        }
        registry.unregister_level(level);
        self.initialized[level.slot()] = false;
    }

    /// Initialize every level in order, stopping at the first failure
    pub fn initialize_all(&mut self, registry: &mut ClassRegistry) -> Result<(), RegistrationError> {
        for level in InitLevel::ALL {
            self.initialize(registry, level)?;
        }
        Ok(())
    }

    /// Tear every level down in reverse order
    pub fn deinitialize_all(&mut self, registry: &mut ClassRegistry) {
        for level in InitLevel::ALL.into_iter().rev() {
            self.deinitialize(registry, level);
        }
    }
}
