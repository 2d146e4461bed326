//! Record filters.

use std::fmt;
use std::str::FromStr;

use realtime::{Error, bad_request};

use crate::position::{Position, normalize_type};

/// Vehicle category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// Every category.
    #[default]
    All,

    /// Only this category, compared after normalization.
    Only(String),
}

impl TypeFilter {
    /// Whether `record` passes the filter.
    #[must_use]
    pub fn matches(&self, record: &Position) -> bool {
        match self {
            Self::All => true,
            Self::Only(tipo) => record.tipo == *tipo,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_all(s) {
            return Ok(Self::All);
        }
        Ok(Self::Only(normalize_type(s)))
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(tipo) => f.write_str(tipo),
        }
    }
}

/// Ignition state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IgnitionFilter {
    #[default]
    All,
    On,
    Off,
}

impl IgnitionFilter {
    /// Whether `record` passes the filter.
    #[must_use]
    pub const fn matches(self, record: &Position) -> bool {
        match self {
            Self::All => true,
            Self::On => record.ignicao,
            Self::Off => !record.ignicao,
        }
    }
}

impl FromStr for IgnitionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_all(s) {
            return Ok(Self::All);
        }
        match s.trim().to_lowercase().as_str() {
            "on" | "sim" | "true" => Ok(Self::On),
            "off" | "nao" | "não" | "false" => Ok(Self::Off),
            other => Err(bad_request!("invalid ignition filter: {}", other)),
        }
    }
}

impl fmt::Display for IgnitionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// The active filter settings. The default selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub tipo: TypeFilter,
    pub ignicao: IgnitionFilter,
}

impl Filters {
    /// Whether `record` passes every filter.
    #[must_use]
    pub fn matches(&self, record: &Position) -> bool {
        self.tipo.matches(record) && self.ignicao.matches(record)
    }
}

/// Records passing `filters`, in their original relative order.
pub fn filter<'a>(
    records: impl IntoIterator<Item = &'a Position>, filters: &Filters,
) -> Vec<&'a Position> {
    records.into_iter().filter(|record| filters.matches(record)).collect()
}

fn is_all(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todos")
}
