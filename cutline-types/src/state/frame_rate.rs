use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::value::{coerce, lenient, to_integer};

/// Exact rational playback rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub num: i64,
    pub den: i64,
}

impl FrameRate {
    pub const DEFAULT: FrameRate = FrameRate { num: 24, den: 1 };

    pub fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Any shape the host may send as a frame rate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FrameRateInput {
    /// Frames per second, e.g. `29.97`.
    Fps(f64),
    /// `{ "num": .., "den": .. }` with loose numbers.
    Ratio {
        #[serde(default, deserialize_with = "lenient")]
        num: Option<f64>,
        #[serde(default, deserialize_with = "lenient")]
        den: Option<f64>,
    },
    /// `[num, den]`
    Pair(Value, Value),
    Other(Value),
}

impl From<f64> for FrameRateInput {
    fn from(fps: f64) -> Self {
        FrameRateInput::Fps(fps)
    }
}

impl From<FrameRate> for FrameRateInput {
    fn from(rate: FrameRate) -> Self {
        FrameRateInput::Ratio {
            num: Some(rate.num as f64),
            den: Some(rate.den as f64),
        }
    }
}

/// Resolve any frame-rate input to an exact rational.
///
/// Positive fps values keep three decimal digits (`29.97` → `29970/1000`).
/// A ratio with a missing or non-positive numerator falls back to 24/1; a
/// missing or non-positive denominator falls back to 1.
pub fn normalize_frame_rate(input: &FrameRateInput) -> FrameRate {
    match input {
        FrameRateInput::Fps(fps) if fps.is_finite() && *fps > 0.0 => {
            FrameRate::new((fps * 1000.0).round() as i64, 1000)
        }
        FrameRateInput::Fps(_) => FrameRate::DEFAULT,
        FrameRateInput::Ratio { num, den } => from_ratio(*num, *den),
        FrameRateInput::Pair(num, den) => from_ratio(coerce(num), coerce(den)),
        FrameRateInput::Other(_) => FrameRate::DEFAULT,
    }
}

fn from_ratio(num: Option<f64>, den: Option<f64>) -> FrameRate {
    let num = to_integer(num, 0);
    if num <= 0 {
        return FrameRate::DEFAULT;
    }
    let den = to_integer(den, 1);
    FrameRate::new(num, if den <= 0 { 1 } else { den })
}

/// `deserialize_with` adapter: accept any frame-rate shape and normalize it.
pub fn deserialize_frame_rate<'de, D>(deserializer: D) -> Result<FrameRate, D::Error>
where
    D: Deserializer<'de>,
{
    let input = FrameRateInput::deserialize(deserializer)?;
    Ok(normalize_frame_rate(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> FrameRate {
        let input: FrameRateInput = serde_json::from_value(value).unwrap();
        normalize_frame_rate(&input)
    }

    #[test]
    fn test_fps_scales_to_thousandths() {
        assert_eq!(parse(json!(29.97)), FrameRate::new(29970, 1000));
        assert_eq!(parse(json!(30)), FrameRate::new(30000, 1000));
    }

    #[test]
    fn test_non_positive_fps_defaults() {
        assert_eq!(parse(json!(0)), FrameRate::DEFAULT);
        assert_eq!(parse(json!(-25.0)), FrameRate::DEFAULT);
    }

    #[test]
    fn test_ratio_invalid_den_falls_back_to_one() {
        assert_eq!(parse(json!({"num": 24, "den": 0})), FrameRate::new(24, 1));
        assert_eq!(parse(json!({"num": 30000, "den": "x"})), FrameRate::new(30000, 1));
        assert_eq!(parse(json!({"num": 25})), FrameRate::new(25, 1));
    }

    #[test]
    fn test_ratio_invalid_num_defaults_whole_rate() {
        assert_eq!(parse(json!({"num": 0, "den": 1001})), FrameRate::DEFAULT);
        assert_eq!(parse(json!({"den": 1001})), FrameRate::DEFAULT);
    }

    #[test]
    fn test_ratio_coerces_to_integers() {
        assert_eq!(parse(json!({"num": "30000", "den": 1001.7})), FrameRate::new(30000, 1001));
    }

    #[test]
    fn test_pair_form() {
        assert_eq!(parse(json!([60, 1])), FrameRate::new(60, 1));
        assert_eq!(parse(json!([60, 0])), FrameRate::new(60, 1));
    }

    #[test]
    fn test_garbage_defaults() {
        assert_eq!(parse(json!("fast")), FrameRate::DEFAULT);
        assert_eq!(parse(Value::Null), FrameRate::DEFAULT);
    }
}
