use crate::Candidate;

/// How a selected candidate compares with the runner-up, the candidate the same preference would
/// have picked had the selected one been absent.
#[derive(Debug)]
pub struct Comparison<'c, C> {
    pub runner_up: &'c C,
    /// Selected quality minus runner-up quality.
    pub quality_diff: f64,
    /// Percentage by which the selected cost is lower than the runner-up's.
    pub cost_diff_pct: f64,
    /// Percentage by which the selected response time is lower than the runner-up's.
    pub speed_diff_pct: f64,
}

impl<'c, C: Candidate> Comparison<'c, C> {
    pub fn new(selected: &C, runner_up: &'c C) -> Self {
        Self {
            runner_up,
            quality_diff: selected.quality() - runner_up.quality(),
            cost_diff_pct: percent_diff(runner_up.cost(), selected.cost()),
            speed_diff_pct: percent_diff(runner_up.response_time(), selected.response_time()),
        }
    }
}

fn percent_diff(baseline: f64, value: f64) -> f64 {
    ((baseline - value) / baseline) * 100.0
}

impl<C: Candidate> std::fmt::Display for Comparison<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compared with {}: ", self.runner_up.name())?;
        if self.quality_diff >= 0.0 {
            write!(f, "Quality increased by {:.2}", self.quality_diff)?;
        } else {
            write!(f, "Quality decreased by {:.2}", self.quality_diff.abs())?;
        }
        if self.cost_diff_pct >= 0.0 {
            write!(f, "; Cost decreased by {:.2}%", self.cost_diff_pct)?;
        } else {
            write!(f, "; Cost increased by {:.2}%", self.cost_diff_pct.abs())?;
        }
        if self.speed_diff_pct >= 0.0 {
            write!(f, "; Response time improved by {:.2}%", self.speed_diff_pct)
        } else {
            write!(f, "; Response time worsened by {:.2}%", self.speed_diff_pct.abs())
        }
    }
}

#[cfg(test)]
mod test {
    use super::Comparison;
    use crate::{num::assert_within, ModelMetrics};

    #[test]
    fn diffs_against_runner_up() {
        let best = ModelMetrics::new("d", 9.0, 850.0, 1.1);
        let runner_up = ModelMetrics::new("a", 9.6, 900.0, 1.2);
        let comparison = Comparison::new(&best, &runner_up);
        assert_within(comparison.quality_diff, -0.6, 1e-9);
        assert_within(comparison.cost_diff_pct, 8.3333, 1e-4);
        assert_within(comparison.speed_diff_pct, 5.5556, 1e-4);
        assert_eq!(
            comparison.to_string(),
            "compared with a: Quality decreased by 0.60; Cost decreased by 8.33%; \
             Response time improved by 5.56%",
        );
    }

    #[test]
    fn worse_on_every_axis() {
        let best = ModelMetrics::new("x", 5.0, 1000.0, 2.0);
        let runner_up = ModelMetrics::new("y", 6.0, 500.0, 1.0);
        assert_eq!(
            Comparison::new(&best, &runner_up).to_string(),
            "compared with y: Quality decreased by 1.00; Cost increased by 100.00%; \
             Response time worsened by 100.00%",
        );
    }

    #[test]
    fn self_comparison_is_neutral() {
        let only = ModelMetrics::new("x", 5.0, 1000.0, 2.0);
        let comparison = Comparison::new(&only, &only);
        assert_eq!(comparison.quality_diff, 0.0);
        assert_eq!(comparison.cost_diff_pct, 0.0);
        assert_eq!(comparison.speed_diff_pct, 0.0);
    }
}
