//! Explanation and skill records attached to transformations.

use crate::mapped::MappedExpression;
use std::{borrow::Cow, fmt};

#[cfg(feature = "serde")]
use serde::Serialize;

/// The key of an explanation or skill, such as `"IntegerArithmetic.EvaluateIntegerAddition"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct MetadataKey(Cow<'static, str>);

impl MetadataKey {
    /// Creates a key from a static string.
    pub const fn new(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for MetadataKey {
    fn from(key: &'static str) -> Self {
        Self::new(key)
    }
}

impl From<String> for MetadataKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A key with the expressions it refers to. Each parameter carries mappings pointing back at
/// the parts of the source it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Metadata {
    pub key: MetadataKey,
    pub params: Vec<MappedExpression>,
}

impl Metadata {
    /// Creates a metadata record.
    pub fn new(key: impl Into<MetadataKey>, params: Vec<MappedExpression>) -> Self {
        Self { key: key.into(), params }
    }

    /// A record with no parameters.
    pub fn key(key: impl Into<MetadataKey>) -> Self {
        Self::new(key, Vec::new())
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if !self.params.is_empty() {
            let params = self.params.iter().map(|param| param.expr.to_string()).collect::<Vec<_>>();
            write!(f, "({})", params.join(", "))?;
        }
        Ok(())
    }
}
