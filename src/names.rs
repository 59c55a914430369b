//! Name rules and lookups
//!
//! - GraphQL name validation (`[_A-Za-z][_0-9A-Za-z]*`, no `__` prefix)
//! - Built-in scalars
//! - Fuzzy "did you mean" suggestions for unknown names

use std::fmt;
use std::sync::OnceLock;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

// =============================================================================
// Built-in Scalars
// =============================================================================

/// The scalars every schema has without declaring them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinScalar {
    #[serde(rename = "ID")]
    Id,
    String,
    Int,
    Float,
    Boolean,
}

impl BuiltinScalar {
    pub const ALL: [BuiltinScalar; 5] = [
        BuiltinScalar::Id,
        BuiltinScalar::String,
        BuiltinScalar::Int,
        BuiltinScalar::Float,
        BuiltinScalar::Boolean,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinScalar::Id => "ID",
            BuiltinScalar::String => "String",
            BuiltinScalar::Int => "Int",
            BuiltinScalar::Float => "Float",
            BuiltinScalar::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for BuiltinScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Validation
// =============================================================================

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("name pattern is valid"))
}

/// Check that `name` is usable as a GraphQL type, field, or enum value name
pub fn validate_name(name: &str) -> Result<()> {
    if !name_pattern().is_match(name) {
        return Err(SchemaError::InvalidName {
            name: name.to_string(),
            reason: "must match [_A-Za-z][_0-9A-Za-z]*".to_string(),
        });
    }
    if name.starts_with("__") {
        return Err(SchemaError::InvalidName {
            name: name.to_string(),
            reason: "names starting with '__' are reserved for introspection".to_string(),
        });
    }
    Ok(())
}

/// Enum values additionally may not be `true`, `false`, or `null`
pub fn validate_enum_value(name: &str) -> Result<()> {
    validate_name(name)?;
    if matches!(name, "true" | "false" | "null") {
        return Err(SchemaError::InvalidName {
            name: name.to_string(),
            reason: "enum values cannot be true, false, or null".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Suggestions
// =============================================================================

/// Best fuzzy match for `name` among `candidates`, if any scores at all
pub fn suggest<'a, I>(name: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let matcher = SkimMatcherV2::default().ignore_case();

    candidates
        .into_iter()
        .filter(|candidate| *candidate != name)
        .filter_map(|candidate| {
            matcher
                .fuzzy_match(candidate, name)
                .map(|score| (score, candidate))
        })
        // Highest score wins, ties go to the earlier candidate
        .fold(None, |best: Option<(i64, &str)>, (score, candidate)| match best {
            Some((best_score, _)) if best_score >= score => best,
            _ => Some((score, candidate)),
        })
        .map(|(_, candidate)| candidate.to_string())
}
