use crate::num::NonNegative;

/// Reference scales and tolerances used by a [`Selector`](crate::Selector).
///
/// Each selector owns its own copy, so deployments with different reference scales do not
/// interfere with each other.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelectorConfig {
    /// Response time that maps to a speed score of 1.
    pub rt_ref: NonNegative,
    /// Cost that maps to a cost score of 1.
    pub cost_ref: NonNegative,
    /// Absolute quality band under the best quality that still counts as a tie for the
    /// `quality` preference.
    pub quality_tie_delta: NonNegative,
    /// Balanced score difference under which the previous selection is kept.
    pub anti_flap_delta: NonNegative,
    /// Quality percentile (in [0, 1]) used as the cutoff for the `quality_latency` preference.
    pub quality_percentile: NonNegative,
    pub balanced: BalancedWeights,
}

/// Weights of the balanced score `quality * Q + speed * (scale * S) + cost * (scale * C)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalancedWeights {
    pub quality: NonNegative,
    pub speed: NonNegative,
    pub cost: NonNegative,
    /// Lifts the speed and cost scores (around 1) onto the quality scale (1-10).
    pub scale: NonNegative,
}

fn non_negative(value: f64) -> NonNegative {
    NonNegative::new(value).unwrap_or(NonNegative::ZERO)
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            rt_ref: non_negative(800.0),
            cost_ref: non_negative(1.0),
            quality_tie_delta: non_negative(0.2),
            anti_flap_delta: non_negative(0.5),
            quality_percentile: non_negative(0.9),
            balanced: BalancedWeights::default(),
        }
    }
}

impl Default for BalancedWeights {
    fn default() -> Self {
        Self {
            quality: non_negative(0.4),
            speed: non_negative(0.3),
            cost: non_negative(0.3),
            scale: non_negative(10.0),
        }
    }
}

impl SelectorConfig {
    /// Returns `None` for negative or non-finite values, or for a zero reference scale.
    pub fn new(
        rt_ref: f64,
        cost_ref: f64,
        quality_tie_delta: f64,
        anti_flap_delta: f64,
    ) -> Option<Self> {
        let config = Self {
            rt_ref: NonNegative::new(rt_ref)?,
            cost_ref: NonNegative::new(cost_ref)?,
            quality_tie_delta: NonNegative::new(quality_tie_delta)?,
            anti_flap_delta: NonNegative::new(anti_flap_delta)?,
            ..Self::default()
        };
        config.is_valid().then_some(config)
    }

    pub fn with_quality_percentile(mut self, p: f64) -> Option<Self> {
        self.quality_percentile = NonNegative::new(p)?;
        self.is_valid().then_some(self)
    }

    pub fn with_balanced(mut self, balanced: BalancedWeights) -> Self {
        self.balanced = balanced;
        self
    }

    /// Deserialized configs bypass the constructors, so selectors check this too.
    pub fn is_valid(&self) -> bool {
        !self.rt_ref.is_zero()
            && !self.cost_ref.is_zero()
            && self.quality_percentile.as_f64() <= 1.0
    }
}

#[cfg(test)]
mod test {
    use super::SelectorConfig;

    #[test]
    fn reference_constants() {
        let config = SelectorConfig::default();
        assert_eq!(config.rt_ref.as_f64(), 800.0);
        assert_eq!(config.cost_ref.as_f64(), 1.0);
        assert_eq!(config.quality_tie_delta.as_f64(), 0.2);
        assert_eq!(config.anti_flap_delta.as_f64(), 0.5);
        assert_eq!(config.quality_percentile.as_f64(), 0.9);
        assert_eq!(config.balanced.quality.as_f64(), 0.4);
        assert_eq!(config.balanced.speed.as_f64(), 0.3);
        assert_eq!(config.balanced.cost.as_f64(), 0.3);
        assert_eq!(config.balanced.scale.as_f64(), 10.0);
        assert!(config.is_valid());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(SelectorConfig::new(0.0, 1.0, 0.2, 0.5).is_none());
        assert!(SelectorConfig::new(800.0, -1.0, 0.2, 0.5).is_none());
        assert!(SelectorConfig::new(800.0, 1.0, f64::NAN, 0.5).is_none());
        assert!(SelectorConfig::default().with_quality_percentile(1.5).is_none());
        assert!(SelectorConfig::new(200.0, 0.01, 0.0, 0.0).is_some());
    }
}
