use thiserror::Error;

/// Metric fields validated before selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Quality,
    ResponseTime,
    Cost,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Quality => "quality",
            Self::ResponseTime => "response_time",
            Self::Cost => "cost",
        })
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// No candidates were given, so nothing can be selected.
    #[error("candidate set is empty")]
    EmptyCandidateSet,
    /// The preference tag is not one of the recognized values.
    #[error("unsupported preference {0:?}, expected one of: quality, latency, cost, balanced, quality_latency, quality_cost, latency_cost")]
    UnsupportedPreference(String),
    /// A candidate metric is NaN or infinite, or a response time or cost is not positive.
    #[error("candidate {name:?} has invalid {metric}: {value}")]
    InvalidMetric {
        name: String,
        metric: Metric,
        value: f64,
    },
}
