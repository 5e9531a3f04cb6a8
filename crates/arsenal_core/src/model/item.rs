//! Item domain model.
//!
//! # Responsibility
//! - Define the trackable `(category, name)` record and its two flags.
//! - Normalize requested flag combinations into valid ones.
//!
//! # Invariants
//! - `category` and `name` are non-empty after trimming.
//! - `mastered` is never set without `blueprint`.
//! - Items are created with both flags unset and are never deleted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Composite identity of an item.
///
/// Ordering is category first, then name, byte-wise; it matches the store's
/// `ORDER BY category, name` under SQLite's BINARY collation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub category: String,
    pub name: String,
}

impl ItemKey {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    /// Rejects keys with a blank category or name.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.category.trim().is_empty() {
            return Err(ItemValidationError::EmptyCategory);
        }
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName {
                category: self.category.clone(),
            });
        }
        Ok(())
    }
}

impl Display for ItemKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// The two progress flags of one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagState {
    /// Item has been acquired.
    pub blueprint: bool,
    /// Item reached maximum proficiency. Requires `blueprint`.
    pub mastered: bool,
}

impl FlagState {
    pub const UNSET: Self = Self {
        blueprint: false,
        mastered: false,
    };

    pub const COMPLETE: Self = Self {
        blueprint: true,
        mastered: true,
    };

    /// Builds a valid state from what a user asked for.
    ///
    /// Requesting `mastered` implies `blueprint`, whether or not the
    /// blueprint was requested explicitly.
    pub fn from_request(blueprint_requested: bool, mastered_requested: bool) -> Self {
        Self {
            blueprint: blueprint_requested || mastered_requested,
            mastered: mastered_requested,
        }
    }

    pub fn is_valid(self) -> bool {
        self.blueprint || !self.mastered
    }
}

/// Canonical progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub category: String,
    pub name: String,
    pub blueprint: bool,
    pub mastered: bool,
}

impl Item {
    /// Creates an item with both flags unset.
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_flags(category, name, FlagState::UNSET)
    }

    pub fn with_flags(
        category: impl Into<String>,
        name: impl Into<String>,
        flags: FlagState,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            blueprint: flags.blueprint,
            mastered: flags.mastered,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.category.as_str(), self.name.as_str())
    }

    pub fn flags(&self) -> FlagState {
        FlagState {
            blueprint: self.blueprint,
            mastered: self.mastered,
        }
    }

    /// Checks identity and flag invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        self.key().validate()?;
        if !self.flags().is_valid() {
            return Err(ItemValidationError::MasteredWithoutBlueprint(self.key()));
        }
        Ok(())
    }
}

/// Domain validation errors for item identity and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyCategory,
    EmptyName { category: String },
    MasteredWithoutBlueprint(ItemKey),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "item category must not be empty"),
            Self::EmptyName { category } => {
                write!(f, "item name must not be empty (category `{category}`)")
            }
            Self::MasteredWithoutBlueprint(key) => {
                write!(f, "item `{key}` cannot be mastered without its blueprint")
            }
        }
    }
}

impl Error for ItemValidationError {}
