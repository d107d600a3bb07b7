//! Code generator interface.
//!
//! Target-language backends live outside the core. They are wired up through
//! an explicit registry keyed by target identifier, and each implements a
//! single translate operation turning compiled artifacts into a set of output
//! files. The registry replaces any scheme that would discover backends
//! dynamically; whatever is not registered at startup does not exist.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use scanner::Scanner;
use table::ParseTable;

/// A code generator for one target language.
///
/// Implementations only see the read-only artifact surface: the minimal DFA
/// of a scanner and the parse table of a grammar.
pub trait Generator {
    /// Translate the given artifacts into output files, mapping file name to
    /// file content.
    fn translate(
        &self,
        scanner: Option<&Scanner>,
        table: Option<&ParseTable>,
    ) -> BTreeMap<String, String>;
}

/// A registry of code generators, keyed by target-language identifier.
pub struct GeneratorRegistry {
    generators: IndexMap<String, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> GeneratorRegistry {
        GeneratorRegistry {
            generators: IndexMap::new(),
        }
    }

    /// Register a generator under a target identifier.
    ///
    /// Returns the generator previously registered for the same target, if
    /// any.
    pub fn register<S: Into<String>>(
        &mut self,
        target: S,
        generator: Box<dyn Generator>,
    ) -> Option<Box<dyn Generator>> {
        self.generators.insert(target.into(), generator)
    }

    /// Look up the generator for a target language.
    pub fn get(&self, target: &str) -> Option<&dyn Generator> {
        self.generators.get(target).map(|g| g.as_ref())
    }

    /// The registered target identifiers, in registration order.
    pub fn targets(&self) -> indexmap::map::Keys<String, Box<dyn Generator>> {
        self.generators.keys()
    }
}
