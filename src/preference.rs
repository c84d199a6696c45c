use ordered_float::{NotNan, OrderedFloat};

use crate::{criteria::Criteria, error::Error, num::percentile, SelectorConfig};

/// What the caller wants to optimize for. Each variant maps to one selection rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preference {
    /// Fastest candidate among those within `quality_tie_delta` of the best quality.
    Quality,
    /// Fastest candidate.
    Latency,
    /// Cheapest candidate.
    Cost,
    /// Highest balanced score.
    Balanced,
    /// Fastest candidate at or above the `quality_percentile` of quality.
    QualityLatency,
    /// Highest `quality * cost score`.
    QualityCost,
    /// Highest `speed score * cost score`.
    LatencyCost,
}

impl Preference {
    pub const ALL: [Self; 7] = [
        Self::Quality,
        Self::Latency,
        Self::Cost,
        Self::Balanced,
        Self::QualityLatency,
        Self::QualityCost,
        Self::LatencyCost,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Latency => "latency",
            Self::Cost => "cost",
            Self::Balanced => "balanced",
            Self::QualityLatency => "quality_latency",
            Self::QualityCost => "quality_cost",
            Self::LatencyCost => "latency_cost",
        }
    }

    /// Index of the candidate this preference picks from `criteria`, or `None` if `criteria` is
    /// empty. Exact ties go to the earliest candidate.
    pub fn choose(&self, criteria: &[Criteria], config: &SelectorConfig) -> Option<usize> {
        let all = || 0..criteria.len();
        let speed = |i: usize| OrderedFloat(*criteria[i].speed);
        let cost = |i: usize| OrderedFloat(*criteria[i].cost);
        match self {
            Self::Quality => {
                let max_quality = criteria.iter().map(|c| c.quality).max()?;
                let cutoff = *max_quality - config.quality_tie_delta.as_f64();
                first_max_by_key(all().filter(|&i| *criteria[i].quality >= cutoff), speed)
            }
            Self::Latency => first_max_by_key(all(), speed),
            Self::Cost => first_max_by_key(all(), cost),
            Self::Balanced => first_max_by_key(all(), |i| {
                OrderedFloat(criteria[i].balanced_score(&config.balanced))
            }),
            Self::QualityLatency => {
                let qualities: Vec<NotNan<f64>> = criteria.iter().map(|c| c.quality).collect();
                let cutoff = percentile(&qualities, config.quality_percentile)?;
                first_max_by_key(all().filter(|&i| criteria[i].quality >= cutoff), speed)
            }
            Self::QualityCost => first_max_by_key(all(), |i| {
                OrderedFloat(*criteria[i].quality * *criteria[i].cost)
            }),
            Self::LatencyCost => first_max_by_key(all(), |i| {
                OrderedFloat(*criteria[i].speed * *criteria[i].cost)
            }),
        }
    }
}

/// Unlike `Iterator::max_by_key`, which keeps the last of equal maxima, this keeps the first.
fn first_max_by_key<I, K, F>(indices: I, key: F) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
    K: Ord,
    F: Fn(usize) -> K,
{
    let mut best: Option<(usize, K)> = None;
    for i in indices {
        let k = key(i);
        let better = match &best {
            Some((_, best_key)) => k > *best_key,
            None => true,
        };
        if better {
            best = Some((i, k));
        }
    }
    best.map(|(i, _)| i)
}

impl std::str::FromStr for Preference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.tag() == s)
            .ok_or_else(|| Error::UnsupportedPreference(s.to_string()))
    }
}

impl std::fmt::Display for Preference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
