//! List Query Model
//!
//! Turns the raw `GET /items` query string into typed pagination, sort and
//! filter parameters, and derives the response cache key from them.

use std::cmp::Ordering;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{Result, ServiceError};
use crate::models::{Item, ItemId, ListItemsQuery};
use crate::validation::integral_number;

pub const DEFAULT_PAGE: u64 = 1;

// == Sort Field ==
/// The single field a listing is ordered by, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Name,
    Description,
    Price,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            "price" => Some(Self::Price),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    /// Orders two items by this field, breaking ties by id.
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        let primary = match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Description => a.description.cmp(&b.description),
            Self::Price => a.price.cmp(&b.price),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

// == Filters ==
/// One exact-match predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMatch {
    Id(ItemId),
    Name(String),
    Description(String),
    Price(i64),
}

impl FieldMatch {
    fn parse(key: &str, value: &Value) -> Result<Self> {
        let wrong_type = |expected: &str| {
            ServiceError::InvalidQuery(format!("filter '{}' must be {}", key, expected))
        };

        match key {
            "id" => value
                .as_str()
                .and_then(|s| s.parse().ok())
                .map(Self::Id)
                .ok_or_else(|| wrong_type("an item id")),
            "name" => value
                .as_str()
                .map(|s| Self::Name(s.to_string()))
                .ok_or_else(|| wrong_type("a string")),
            "description" => value
                .as_str()
                .map(|s| Self::Description(s.to_string()))
                .ok_or_else(|| wrong_type("a string")),
            "price" => value
                .as_number()
                .and_then(integral_number)
                .and_then(|n| n.ok())
                .map(Self::Price)
                .ok_or_else(|| wrong_type("an integer")),
            other => Err(ServiceError::InvalidQuery(format!(
                "unknown filter field '{}'",
                other
            ))),
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::Description(_) => "description",
            Self::Price(_) => "price",
        }
    }

    fn value(&self) -> Value {
        match self {
            Self::Id(id) => Value::String(id.to_string()),
            Self::Name(s) | Self::Description(s) => Value::String(s.clone()),
            Self::Price(p) => Value::from(*p),
        }
    }

    fn matches(&self, item: &Item) -> bool {
        match self {
            Self::Id(id) => item.id == *id,
            Self::Name(name) => item.name == *name,
            Self::Description(description) => item.description == *description,
            Self::Price(price) => item.price == *price,
        }
    }
}

/// Conjunction of exact-match predicates over stored fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    matches: Vec<FieldMatch>,
}

impl ItemFilter {
    /// Parses a JSON object such as `{"price": 10, "name": "Lamp"}`.
    ///
    /// Malformed JSON, non-objects, unknown keys and mistyped values are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(raw).map_err(|e| {
            ServiceError::InvalidQuery(format!("filters must be a JSON object: {}", e))
        })?;
        let Value::Object(object) = value else {
            return Err(ServiceError::InvalidQuery(
                "filters must be a JSON object".to_string(),
            ));
        };

        let mut matches = object
            .iter()
            .map(|(key, value)| FieldMatch::parse(key, value))
            .collect::<Result<Vec<_>>>()?;
        matches.sort_by_key(FieldMatch::key);

        Ok(Self { matches })
    }

    pub fn with(mut self, field_match: FieldMatch) -> Self {
        self.matches.retain(|m| m.key() != field_match.key());
        self.matches.push(field_match);
        self.matches.sort_by_key(FieldMatch::key);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.matches.iter().all(|m| m.matches(item))
    }

    /// Stable JSON rendering with keys in sorted order.
    pub fn canonical(&self) -> String {
        let object: Map<String, Value> = self
            .matches
            .iter()
            .map(|m| (m.key().to_string(), m.value()))
            .collect();
        Value::Object(object).to_string()
    }
}

// == List Params ==
/// Validated parameters for a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
    pub sort: SortField,
    pub filter: ItemFilter,
}

impl ListParams {
    /// Applies defaults and policy to a raw query.
    ///
    /// `page` and `limit` fall back to their defaults when missing, non-numeric
    /// or zero; `limit` is clamped to `max_limit`. An unknown `sort` field or a
    /// bad `filters` value is an [`ServiceError::InvalidQuery`].
    pub fn from_query(query: &ListItemsQuery, default_limit: u64, max_limit: u64) -> Result<Self> {
        let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(query.limit.as_deref())
            .unwrap_or(default_limit)
            .min(max_limit.max(1));

        let sort = match query.sort.as_deref().map(str::trim) {
            None | Some("") => SortField::default(),
            Some(raw) => SortField::parse(raw).ok_or_else(|| {
                ServiceError::InvalidQuery(format!("unknown sort field '{}'", raw))
            })?,
        };

        let filter = match query.filters.as_deref() {
            Some(raw) => ItemFilter::parse(raw)?,
            None => ItemFilter::default(),
        };

        Ok(Self {
            page,
            limit,
            sort,
            filter,
        })
    }

    /// Offset of the first item on this page.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.limit)
    }

    /// Deterministic cache key over page, limit, sort and filters.
    ///
    /// Filters enter the key as a SHA-256 of their canonical form, so the key
    /// length does not grow with filter text.
    pub fn cache_key(&self) -> String {
        let filters = hex::encode(Sha256::digest(self.filter.canonical().as_bytes()));
        format!(
            "items:list:page={}:limit={}:sort={}:filters={}",
            self.page,
            self.limit,
            self.sort.as_str(),
            filters
        )
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
}
