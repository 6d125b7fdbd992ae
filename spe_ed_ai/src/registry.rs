use std::collections::BTreeMap;
use thiserror::Error;

use crate::bad_random::{self, BadRandomAi};
use crate::rules::Rules;
use crate::Ai;

pub type AiConstructor = Box<dyn Fn(Rules) -> Box<dyn Ai> + Send + Sync + 'static>;

fn new_bad_random(rules: Rules) -> Box<dyn Ai> {
    Box::new(BadRandomAi::new(rules))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("an ai named '{0}' is already registered")]
    NameTaken(String),
}

/// Maps AI names to constructors.
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<String, AiConstructor>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every AI shipped with this crate.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .entries
            .insert(bad_random::NAME.to_string(), Box::new(new_bad_random));
        registry
    }

    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        constructor: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Rules) -> Box<dyn Ai> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(RegistryError::NameTaken(name));
        }
        self.entries.insert(name, Box::new(constructor));
        Ok(())
    }

    /// Builds a fresh instance of the AI registered as `name`.
    pub fn create(&self, name: &str, rules: Rules) -> Option<Box<dyn Ai>> {
        self.entries.get(name).map(|constructor| constructor(rules))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
