//! Validation Module
//!
//! Checks item payloads against the field bounds before any store access.
//! Every violation in a payload is collected, so a client sees all of them at once.

use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::models::{CreateItemRequest, Item, UpdateItemRequest};

// == Field Bounds ==
pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const PRICE_MIN: i64 = 0;
pub const PRICE_MAX: i64 = 10_000;

/// Bounds and messages for a trimmed text field.
struct TextRule {
    field: &'static str,
    min: usize,
    max: usize,
    required: &'static str,
    not_text: &'static str,
    too_short: &'static str,
    too_long: &'static str,
}

const NAME_RULE: TextRule = TextRule {
    field: "name",
    min: NAME_MIN_CHARS,
    max: NAME_MAX_CHARS,
    required: "Item name is required",
    not_text: "Item name must be a string",
    too_short: "Item name must be at least 3 characters long",
    too_long: "Item name cannot exceed 100 characters",
};

const DESCRIPTION_RULE: TextRule = TextRule {
    field: "description",
    min: DESCRIPTION_MIN_CHARS,
    max: DESCRIPTION_MAX_CHARS,
    required: "Item description is required",
    not_text: "Description must be a string",
    too_short: "Description must be at least 10 characters long",
    too_long: "Description cannot exceed 500 characters",
};

// == Field Error ==
/// A single violation, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

// == Validation Errors ==
/// Ordered list of field violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

// == Validated Payloads ==
/// A create payload that passed validation. Only [`validate_create`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
    description: String,
    price: i64,
}

impl NewItem {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn into_parts(self) -> (String, String, i64) {
        (self.name, self.description, self.price)
    }
}

/// A non-empty set of validated field changes. Only [`validate_update`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPatch {
    name: Option<String>,
    description: Option<String>,
    price: Option<i64>,
}

impl ItemPatch {
    /// Overwrites the fields this patch carries. Timestamps are left to the store.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            item.description.clone_from(description);
        }
        if let Some(price) = self.price {
            item.price = price;
        }
    }
}

// == Field Checks ==
fn check_text(rule: &TextRule, raw: Option<&Value>) -> Result<String, FieldError> {
    match raw {
        None | Some(Value::Null) => Err(FieldError::new(rule.field, rule.required)),
        Some(Value::String(s)) => bound_text(rule, s),
        Some(_) => Err(FieldError::new(rule.field, rule.not_text)),
    }
}

fn bound_text(rule: &TextRule, raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(rule.field, rule.required));
    }

    let chars = trimmed.chars().count();
    if chars < rule.min {
        return Err(FieldError::new(rule.field, rule.too_short));
    }
    if chars > rule.max {
        return Err(FieldError::new(rule.field, rule.too_long));
    }
    Ok(trimmed.to_string())
}

/// Trims and bounds-checks a name.
pub fn check_name(raw: Option<&Value>) -> Result<String, FieldError> {
    check_text(&NAME_RULE, raw)
}

/// Trims and bounds-checks a description.
pub fn check_description(raw: Option<&Value>) -> Result<String, FieldError> {
    check_text(&DESCRIPTION_RULE, raw)
}

/// Bounds-checks a name that is already known to be text.
pub fn check_name_text(name: &str) -> Result<String, FieldError> {
    bound_text(&NAME_RULE, name)
}

pub fn check_description_text(description: &str) -> Result<String, FieldError> {
    bound_text(&DESCRIPTION_RULE, description)
}

/// Checks a JSON price: present, integral, and within bounds.
///
/// Numeric strings such as `"45"` are accepted; any other non-number is not.
pub fn check_price(raw: Option<&Value>) -> Result<i64, FieldError> {
    match raw {
        None | Some(Value::Null) => Err(FieldError::new("price", "Price is required")),
        Some(Value::Number(number)) => check_price_number(number),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(price) => check_price_value(price),
            Err(_) => Err(FieldError::new("price", "Price must be an integer value")),
        },
        Some(_) => Err(FieldError::new("price", "Price must be an integer value")),
    }
}

/// The integral value of a JSON number, if it has one.
///
/// Floats with no fractional part (`12.0`) count as integers. `Err` carries
/// the sign of an integral value too large for `i64`.
pub fn integral_number(number: &Number) -> Option<Result<i64, std::cmp::Ordering>> {
    if let Some(n) = number.as_i64() {
        return Some(Ok(n));
    }
    if number.is_u64() {
        return Some(Err(std::cmp::Ordering::Greater));
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f < i64::MIN as f64 {
                Some(Err(std::cmp::Ordering::Less))
            } else if f >= i64::MAX as f64 {
                Some(Err(std::cmp::Ordering::Greater))
            } else {
                Some(Ok(f as i64))
            }
        }
        _ => None,
    }
}

fn check_price_number(number: &Number) -> Result<i64, FieldError> {
    match integral_number(number) {
        Some(Ok(price)) => check_price_value(price),
        Some(Err(std::cmp::Ordering::Less)) => {
            Err(FieldError::new("price", "Price cannot be negative"))
        }
        Some(Err(_)) => Err(FieldError::new("price", "Price cannot exceed 10,000")),
        None => Err(FieldError::new("price", "Price must be an integer value")),
    }
}

/// Bounds-checks an integral price.
pub fn check_price_value(price: i64) -> Result<i64, FieldError> {
    if price < PRICE_MIN {
        return Err(FieldError::new("price", "Price cannot be negative"));
    }
    if price > PRICE_MAX {
        return Err(FieldError::new("price", "Price cannot exceed 10,000"));
    }
    Ok(price)
}

// == Payload Validation ==
/// Validates a create payload, collecting every violation.
pub fn validate_create(req: CreateItemRequest) -> Result<NewItem, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = check_name(req.name.as_ref()).map_err(|e| errors.push(e)).ok();
    let description = check_description(req.description.as_ref())
        .map_err(|e| errors.push(e))
        .ok();
    let price = check_price(req.price.as_ref()).map_err(|e| errors.push(e)).ok();

    match (name, description, price) {
        (Some(name), Some(description), Some(price)) if errors.is_empty() => Ok(NewItem {
            name,
            description,
            price,
        }),
        _ => Err(errors),
    }
}

/// Validates the fields present in an update payload.
///
/// A payload that names no field is rejected on `body`.
pub fn validate_update(req: UpdateItemRequest) -> Result<ItemPatch, ValidationErrors> {
    if req.name.is_none() && req.description.is_none() && req.price.is_none() {
        return Err(FieldError::new(
            "body",
            "At least one of name, description or price must be provided",
        )
        .into());
    }

    let mut errors = ValidationErrors::new();
    let mut patch = ItemPatch {
        name: None,
        description: None,
        price: None,
    };

    if let Some(name) = req.name.as_ref() {
        match check_name(Some(name)) {
            Ok(name) => patch.name = Some(name),
            Err(e) => errors.push(e),
        }
    }
    if let Some(description) = req.description.as_ref() {
        match check_description(Some(description)) {
            Ok(description) => patch.description = Some(description),
            Err(e) => errors.push(e),
        }
    }
    if let Some(price) = req.price.as_ref() {
        match check_price(Some(price)) {
            Ok(price) => patch.price = Some(price),
            Err(e) => errors.push(e),
        }
    }

    errors.into_result().map(|()| patch)
}
