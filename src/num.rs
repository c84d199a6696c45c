use ordered_float::NotNan;

/// A finite, non-negative, non-NaN f64 value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative(NotNan<f64>);

impl NonNegative {
    pub const ZERO: Self = Self(unsafe { NotNan::new_unchecked(0.0) });

    pub fn new(value: f64) -> Option<Self> {
        let value = NotNan::new(value).ok()?;
        if value.is_sign_negative() || value.is_infinite() {
            return None;
        }
        Some(Self(value))
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl std::fmt::Debug for NonNegative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NonNegative {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NonNegative {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        NonNegative::new(value).ok_or_else(|| {
            serde::de::Error::custom(format!("value must be finite and >= 0, got {value}"))
        })
    }
}

/// Percentile `p` (in [0, 1]) of `values` using linear interpolation between the closest order
/// statistics: sort, take the rank `p * (n - 1)`, and interpolate between the values at the floor
/// and ceiling ranks by the fractional part. Returns `None` for an empty input.
pub fn percentile(values: &[NotNan<f64>], p: NonNegative) -> Option<NotNan<f64>> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let rank = p.as_f64().min(1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let t = rank - lo as f64;
    let (a, b) = (*sorted[lo], *sorted[hi]);
    // Interpolate from the nearer end so the result never leaves [a, b].
    let value = if t >= 0.5 {
        b - (b - a) * (1.0 - t)
    } else {
        a + (b - a) * t
    };
    NotNan::new(value).ok()
}

#[cfg(test)]
#[track_caller]
pub fn assert_within(value: f64, expected: f64, tolerance: f64) {
    let diff = (value - expected).abs();
    assert!(
        diff <= tolerance,
        "Expected value of {expected} +- {tolerance} but got {value} which is off by {diff}",
    );
}
