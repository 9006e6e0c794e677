//! Positional and keyed field rules.
//!
//! Public channel payloads are JSON arrays where each offset has a fixed
//! raw kind. [`Fields`] checks the arity once, then each accessor applies
//! one rule (quoted decimal, JSON number, quoted timestamp, plain string)
//! to one offset and tags any failure with that offset. Private channel
//! records are JSON objects; [`Record`] applies the same rules by key.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::error::{DecodeError, ResultExt};
use crate::models::Timestamp;

/// A JSON array whose length has been validated.
pub(crate) struct Fields<'a> {
    items: &'a [Value],
}

impl<'a> Fields<'a> {
    /// Requires `value` to be an array of exactly `len` elements.
    pub(crate) fn exact(value: &'a Value, len: usize) -> Result<Self, DecodeError> {
        let items = as_array(value)?;
        if items.len() != len {
            return Err(DecodeError::ArrayLength {
                expected: len.to_string(),
                actual: items.len(),
            });
        }
        Ok(Self { items })
    }

    /// Requires `value` to be an array with a length in `min..=max`.
    pub(crate) fn between(value: &'a Value, min: usize, max: usize) -> Result<Self, DecodeError> {
        let items = as_array(value)?;
        if items.len() < min || items.len() > max {
            return Err(DecodeError::ArrayLength {
                expected: format!("{min} to {max}"),
                actual: items.len(),
            });
        }
        Ok(Self { items })
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Quoted decimal, e.g. `"0.42700000"`.
    pub(crate) fn decimal(&self, offset: usize) -> Result<Decimal, DecodeError> {
        string_as_decimal(&self.items[offset]).at(offset)
    }

    /// Bare JSON integer, e.g. `16169`.
    pub(crate) fn int(&self, offset: usize) -> Result<i64, DecodeError> {
        number_as_i64(&self.items[offset]).at(offset)
    }

    /// Quoted fractional Unix time, e.g. `"1534614057.321597"`.
    pub(crate) fn timestamp(&self, offset: usize) -> Result<Timestamp, DecodeError> {
        string_as_timestamp(&self.items[offset]).at(offset)
    }

    pub(crate) fn string(&self, offset: usize) -> Result<&'a str, DecodeError> {
        as_str(&self.items[offset]).at(offset)
    }
}

/// A JSON object whose fields are read by key. `null` counts as absent.
pub(crate) struct Record<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    pub(crate) fn new(value: &'a Value) -> Result<Self, DecodeError> {
        Ok(Self {
            object: as_object(value)?,
        })
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|value| !value.is_null())
    }

    /// Applies `rule` to `key`, which must be present.
    pub(crate) fn required<T>(
        &self,
        key: &'static str,
        rule: impl FnOnce(&'a Value) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let value = self.get(key).ok_or(DecodeError::MissingField(key))?;
        rule(value).in_field(key)
    }

    /// Applies `rule` to `key`, or returns the zero value if it is absent.
    pub(crate) fn optional<T: Default>(
        &self,
        key: &'static str,
        rule: impl FnOnce(&'a Value) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        match self.get(key) {
            Some(value) => rule(value).in_field(key),
            None => Ok(T::default()),
        }
    }
}

pub(crate) fn as_array(value: &Value) -> Result<&[Value], DecodeError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| DecodeError::expected("JSON array"))
}

pub(crate) fn as_object(value: &Value) -> Result<&Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::expected("JSON object"))
}

pub(crate) fn as_str(value: &Value) -> Result<&str, DecodeError> {
    value
        .as_str()
        .ok_or_else(|| DecodeError::expected("JSON string"))
}

pub(crate) fn as_string(value: &Value) -> Result<String, DecodeError> {
    as_str(value).map(str::to_string)
}

/// Accepts integral JSON numbers only; a float or a quoted number is an error.
pub(crate) fn number_as_i64(value: &Value) -> Result<i64, DecodeError> {
    value
        .as_i64()
        .ok_or_else(|| DecodeError::expected("JSON number"))
}

pub(crate) fn number_as_u64(value: &Value) -> Result<u64, DecodeError> {
    value
        .as_u64()
        .ok_or_else(|| DecodeError::expected("non-negative JSON number"))
}

pub(crate) fn string_as_decimal(value: &Value) -> Result<Decimal, DecodeError> {
    let s = as_str(value)?;
    Decimal::from_str(s).map_err(|source| DecodeError::Decimal {
        value: s.to_string(),
        source,
    })
}

pub(crate) fn string_as_timestamp(value: &Value) -> Result<Timestamp, DecodeError> {
    Ok(as_str(value)?.parse::<Timestamp>()?)
}
