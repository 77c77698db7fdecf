//! Core types for the macro system.
//!
//! This module defines which call shapes count as macros. It has no dependencies on
//! the expander, making it the foundation layer shared with [`crate::config`].
//!
//! ## Recognition
//!
//! - `has` is the only global-style macro and takes exactly one argument.
//! - Every other macro is receiver-style (`target.name(var, ...)`) and takes two
//!   arguments; `map` also accepts three (filter-then-map).
//! - `exists_one` is also recognised under its camel-case alias `existsOne`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The built-in macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Macro {
    Has,
    All,
    Exists,
    ExistsOne,
    Map,
    Filter,
}

impl Macro {
    /// Every macro, in declaration order.
    pub const ALL: [Macro; 6] = [
        Macro::Has,
        Macro::All,
        Macro::Exists,
        Macro::ExistsOne,
        Macro::Map,
        Macro::Filter,
    ];

    /// Canonical function name of the macro.
    pub fn function(self) -> &'static str {
        match self {
            Macro::Has => "has",
            Macro::All => "all",
            Macro::Exists => "exists",
            Macro::ExistsOne => "exists_one",
            Macro::Map => "map",
            Macro::Filter => "filter",
        }
    }

    /// True for macros written as `target.name(...)`.
    pub fn is_receiver_style(self) -> bool {
        !matches!(self, Macro::Has)
    }

    /// Whether a call with `arity` arguments can be this macro.
    pub fn accepts_arity(self, arity: usize) -> bool {
        match self {
            Macro::Has => arity == 1,
            Macro::Map => arity == 2 || arity == 3,
            Macro::All | Macro::Exists | Macro::ExistsOne | Macro::Filter => arity == 2,
        }
    }

    /// Resolves a function name to a macro, accepting the `existsOne` alias.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cel_ast::macros::Macro;
    /// assert_eq!(Macro::from_function("existsOne"), Some(Macro::ExistsOne));
    /// assert_eq!(Macro::from_function("size"), None);
    /// ```
    pub fn from_function(name: &str) -> Option<Macro> {
        match name {
            "has" => Some(Macro::Has),
            "all" => Some(Macro::All),
            "exists" => Some(Macro::Exists),
            "exists_one" | "existsOne" => Some(Macro::ExistsOne),
            "map" => Some(Macro::Map),
            "filter" => Some(Macro::Filter),
            _ => None,
        }
    }

    /// Matches a call by name, arity and call style.
    pub fn lookup(name: &str, arity: usize, receiver_style: bool) -> Option<Macro> {
        Macro::from_function(name)
            .filter(|m| m.is_receiver_style() == receiver_style && m.accepts_arity(arity))
    }
}

/// The set of macros a builder is allowed to expand.
///
/// # Examples
///
/// ```rust
/// use cel_ast::macros::{Macro, MacroSet};
/// let set = MacroSet::all().without(Macro::Map);
/// assert!(set.contains(Macro::Filter));
/// assert!(!set.contains(Macro::Map));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacroSet(BTreeSet<Macro>);

impl MacroSet {
    pub fn all() -> Self {
        MacroSet(Macro::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        MacroSet(BTreeSet::new())
    }

    pub fn with(mut self, m: Macro) -> Self {
        self.0.insert(m);
        self
    }

    pub fn without(mut self, m: Macro) -> Self {
        self.0.remove(&m);
        self
    }

    pub fn contains(&self, m: Macro) -> bool {
        self.0.contains(&m)
    }

    pub fn iter(&self) -> impl Iterator<Item = Macro> + '_ {
        self.0.iter().copied()
    }
}

impl Default for MacroSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Macro> for MacroSet {
    fn from_iter<I: IntoIterator<Item = Macro>>(iter: I) -> Self {
        MacroSet(iter.into_iter().collect())
    }
}
