//! Item Model
//!
//! The stored catalog record and its identifier.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{self, NewItem, ValidationErrors};

// == Item Id ==
/// Store-assigned item identity.
///
/// UUIDv7 values sort by creation time, so ordering by id is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generates a fresh, time-ordered id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// == Item ==
/// A priced catalog record as persisted by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Builds the stored form of a validated item.
    ///
    /// Both timestamps are set to `now`.
    pub fn from_new(id: ItemId, new_item: NewItem, now: DateTime<Utc>) -> Self {
        let (name, description, price) = new_item.into_parts();
        Self {
            id,
            name,
            description,
            price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-checks every field invariant on the complete entity.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validation::check_name_text(&self.name) {
            errors.push(e);
        }
        if let Err(e) = validation::check_description_text(&self.description) {
            errors.push(e);
        }
        if let Err(e) = validation::check_price_value(self.price) {
            errors.push(e);
        }
        errors.into_result()
    }
}
