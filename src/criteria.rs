pub mod cost;
pub mod latency;

use ordered_float::NotNan;

use crate::{
    config::BalancedWeights,
    error::{Error, Metric},
    num::NonNegative,
    Candidate, SelectorConfig,
};

#[derive(Clone, Copy, Debug)]
pub struct Alternative {
    pub score: f64,
    pub weight: NonNegative,
}

/// We use the [weighted sum model (WSM)](https://en.wikipedia.org/wiki/Weighted_sum_model) to
/// combine quality, speed, and cost into the balanced score. Unlike a product model, a weak
/// criterion can be offset by a strong one, which is what the `balanced` preference asks for.
pub fn weighted_sum_model<Alternatives>(alternatives: Alternatives) -> f64
where
    Alternatives: IntoIterator<Item = Alternative>,
{
    alternatives
        .into_iter()
        .map(|Alternative { score, weight }| weight.as_f64() * score)
        .sum()
}

/// A candidate's criteria, each on a "higher is better" scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Criteria {
    /// Raw quality, passed through unchanged.
    pub quality: NotNan<f64>,
    /// See [`latency::normalize_speed`].
    pub speed: NotNan<f64>,
    /// See [`cost::normalize_cost`].
    pub cost: NotNan<f64>,
}

impl Criteria {
    pub fn new<C>(candidate: &C, config: &SelectorConfig) -> Result<Self, Error>
    where
        C: Candidate + ?Sized,
    {
        let quality = finite(candidate, Metric::Quality, candidate.quality())?;
        let response_time = positive(candidate, Metric::ResponseTime, candidate.response_time())?;
        let cost = positive(candidate, Metric::Cost, candidate.cost())?;
        Ok(Self {
            quality,
            // A tiny positive input can still overflow the ratio.
            speed: finite(
                candidate,
                Metric::ResponseTime,
                latency::normalize_speed(config.rt_ref, *response_time),
            )?,
            cost: finite(
                candidate,
                Metric::Cost,
                cost::normalize_cost(config.cost_ref, *cost),
            )?,
        })
    }

    pub fn balanced_score(&self, weights: &BalancedWeights) -> f64 {
        let scale = weights.scale.as_f64();
        weighted_sum_model([
            Alternative {
                score: *self.quality,
                weight: weights.quality,
            },
            Alternative {
                score: scale * *self.speed,
                weight: weights.speed,
            },
            Alternative {
                score: scale * *self.cost,
                weight: weights.cost,
            },
        ])
    }
}

fn finite<C>(candidate: &C, metric: Metric, value: f64) -> Result<NotNan<f64>, Error>
where
    C: Candidate + ?Sized,
{
    match NotNan::new(value) {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidMetric {
            name: candidate.name().to_string(),
            metric,
            value,
        }),
    }
}

fn positive<C>(candidate: &C, metric: Metric, value: f64) -> Result<NotNan<f64>, Error>
where
    C: Candidate + ?Sized,
{
    let value = finite(candidate, metric, value)?;
    if *value <= 0.0 {
        return Err(Error::InvalidMetric {
            name: candidate.name().to_string(),
            metric,
            value: *value,
        });
    }
    Ok(value)
}
