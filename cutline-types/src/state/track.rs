use serde::{Deserialize, Serialize};

use crate::value::{lenient, lenient_f64, lenient_i64};

/// A horizontal lane. Resolvable by `id` or by `number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub number: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub lock: bool,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: f64,
    #[serde(default)]
    pub color: String,
}

/// Partial track record as supplied by a caller. Missing fields take defaults
/// during normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub y: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub lock: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl TrackDraft {
    pub fn numbered(number: i64) -> Self {
        Self {
            number: Some(number as f64),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
