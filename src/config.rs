//! Builder configuration.
//!
//! Options deserialize with `#[serde(default)]`, so a partial JSON or YAML document
//! only has to name the settings it changes.

use serde::{Deserialize, Serialize};

use crate::macros::{Macro, MacroSet};

/// Settings that shape how a [`Builder`](crate::builder::Builder) constructs trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Record the pre-expansion call of every macro in `SourceInfo::macro_calls`.
    pub populate_macro_calls: bool,
    /// Macros that are recognised and expanded. Others stay ordinary calls.
    pub macros: MacroSet,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            populate_macro_calls: true,
            macros: MacroSet::all(),
        }
    }
}

impl BuilderOptions {
    pub fn with_macros(mut self, macros: MacroSet) -> Self {
        self.macros = macros;
        self
    }

    pub fn with_macro_calls(mut self, populate: bool) -> Self {
        self.populate_macro_calls = populate;
        self
    }

    pub(crate) fn expands(&self, m: Macro) -> bool {
        self.macros.contains(m)
    }
}
