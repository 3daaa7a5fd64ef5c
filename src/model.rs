//! In-memory model produced by the source scan.
//!
//! Everything here is rebuilt from scratch on every run: an optional [`ApiInfo`]
//! read from the firmware entry file and a [`ModuleRegistry`] of the modules
//! declared in the library headers.

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

/// Title, version and description of the whole API.
///
/// Always fully populated: the entry file either yields all three values from a
/// single declaration or no `ApiInfo` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// A named group of routes declared together in one header file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Module name, unique within a registry
    pub name: String,
    /// Module version as written in the declaration
    pub version: String,
    /// Human readable description
    pub description: String,
    /// Route paths in the order they appear in the file (duplicates kept)
    pub routes: Vec<String>,
}

impl Module {
    /// Creates a module with no routes.
    pub fn new(name: String, version: String, description: String) -> Self {
        Self {
            name,
            version,
            description,
            routes: Vec::new(),
        }
    }
}

/// Modules keyed by name, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistry {
    modules: IndexMap<String, Module>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a module, replacing any module already registered under the same name.
    ///
    /// A replaced module keeps its original position, so tag order still follows the
    /// first registration. The replaced module is returned.
    pub fn insert(&mut self, module: Module) -> Option<Module> {
        let replaced = self.modules.insert(module.name.clone(), module);
        if let Some(ref previous) = replaced {
            warn!(
                "Module '{}' registered again, keeping the last declaration (v{} replaced)",
                previous.name, previous.version
            );
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over modules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Total number of routes across all modules.
    pub fn route_count(&self) -> usize {
        self.iter().map(|m| m.routes.len()).sum()
    }
}
