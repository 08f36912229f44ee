//! Track identifiers.
//!
//! Callers refer to a track by its string id, by its integer number, or by an
//! object carrying either. Strings of the form `L<n>` additionally resolve by
//! number. All of that is decided once, here, when the identifier is built.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::state::Track;
use crate::value::lenient;

static LANE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^L(-?\d+)$").expect("lane label pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    ById(String),
    ByNumber(i64),
    Composite {
        id: Option<String>,
        number: Option<i64>,
    },
}

impl Identifier {
    /// Parse a string identifier. `"L3"` resolves by id `"L3"` or by number 3.
    pub fn parse(s: &str) -> Self {
        let number = LANE_LABEL
            .captures(s)
            .and_then(|caps| caps[1].parse::<i64>().ok());
        match number {
            Some(number) => Identifier::Composite {
                id: Some(s.to_string()),
                number: Some(number),
            },
            None => Identifier::ById(s.to_string()),
        }
    }

    /// An identifier that matches a track with this id or this number.
    pub fn either(id: impl Into<String>, number: i64) -> Self {
        Identifier::Composite {
            id: Some(id.into()),
            number: Some(number),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Identifier::ById(id) => Some(id),
            Identifier::ByNumber(_) => None,
            Identifier::Composite { id, .. } => id.as_deref(),
        }
    }

    pub fn number(&self) -> Option<i64> {
        match self {
            Identifier::ById(_) => None,
            Identifier::ByNumber(n) => Some(*n),
            Identifier::Composite { number, .. } => *number,
        }
    }

    /// True if the track's id or number matches. The id is compared first.
    pub fn matches(&self, track: &Track) -> bool {
        self.id().is_some_and(|id| id == track.id)
            || self.number().is_some_and(|n| n == track.number)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::parse(s)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::parse(&s)
    }
}

impl From<i64> for Identifier {
    fn from(number: i64) -> Self {
        Identifier::ByNumber(number)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::ById(id) => write!(f, "{}", id),
            Identifier::ByNumber(n) => write!(f, "#{}", n),
            Identifier::Composite { id, number } => match (id, number) {
                (Some(id), Some(n)) => write!(f, "{}|#{}", id, n),
                (Some(id), None) => write!(f, "{}", id),
                (None, Some(n)) => write!(f, "#{}", n),
                (None, None) => write!(f, "<none>"),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Text(String),
    Number(f64),
    Object {
        #[serde(default)]
        id: Option<Value>,
        #[serde(default, deserialize_with = "lenient")]
        number: Option<f64>,
    },
}

/// Non-integral numbers never match a track number.
fn integral(value: Option<f64>) -> Option<i64> {
    value
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        .map(|v| v as i64)
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawIdentifier::deserialize(deserializer)? {
            RawIdentifier::Text(s) => Identifier::parse(&s),
            RawIdentifier::Number(n) => match integral(Some(n)) {
                Some(n) => Identifier::ByNumber(n),
                None => Identifier::Composite { id: None, number: None },
            },
            RawIdentifier::Object { id, number } => Identifier::Composite {
                id: id.and_then(|v| match v {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                }),
                number: integral(number),
            },
        })
    }
}
