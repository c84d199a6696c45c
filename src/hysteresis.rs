//! Anti-flap guard.
//!
//! Repeated selections over slightly fluctuating metrics can bounce between near-equivalent
//! candidates. The guard keeps the caller's previous selection while the balanced score of the
//! new choice stays within `anti_flap_delta` of the previous score. The selector holds no state:
//! callers thread a [`History`] from one call into the next.

use crate::{num::NonNegative, Candidate};

/// The previous selection, as remembered by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History {
    pub last_selected: Option<String>,
    pub last_score: Option<f64>,
}

impl History {
    pub fn new(last_selected: impl Into<String>, last_score: f64) -> Self {
        Self {
            last_selected: Some(last_selected.into()),
            last_score: Some(last_score),
        }
    }
}

/// Why a selection returned the candidate it did.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// The preference's choice was returned without the guard overriding it.
    Chosen,
    /// The guard kept the previous selection over the preference's choice.
    KeptPrevious {
        previous: String,
        candidate: String,
        last_score: f64,
        candidate_score: f64,
    },
    /// The scores were within tolerance, but the previous selection is no longer a candidate.
    PreviousMissing {
        previous: String,
        candidate: String,
    },
}

/// Returns the index of the candidate to use in place of `chosen`, whose balanced score is
/// `chosen_score`.
pub fn guard<C: Candidate>(
    candidates: &[C],
    chosen: usize,
    chosen_score: f64,
    history: &History,
    anti_flap_delta: NonNegative,
) -> (usize, Decision) {
    // An empty name counts as no previous selection.
    let previous = history.last_selected.as_deref().filter(|name| !name.is_empty());
    let (Some(previous), Some(last_score)) = (previous, history.last_score) else {
        return (chosen, Decision::Chosen);
    };
    // False for a NaN difference, from a NaN history or `inf - inf`.
    let within = (chosen_score - last_score).abs() < anti_flap_delta.as_f64();
    if !within {
        return (chosen, Decision::Chosen);
    }
    let candidate = candidates[chosen].name();
    match candidates.iter().position(|c| c.name() == previous) {
        Some(kept) if kept == chosen => (chosen, Decision::Chosen),
        Some(kept) => (
            kept,
            Decision::KeptPrevious {
                previous: previous.to_string(),
                candidate: candidate.to_string(),
                last_score,
                candidate_score: chosen_score,
            },
        ),
        None => (
            chosen,
            Decision::PreviousMissing {
                previous: previous.to_string(),
                candidate: candidate.to_string(),
            },
        ),
    }
}

#[cfg(test)]
mod test {
    use super::{guard, Decision, History};
    use crate::{num::NonNegative, ModelMetrics};

    fn candidates() -> Vec<ModelMetrics> {
        vec![
            ModelMetrics::new("a", 9.0, 800.0, 1.0),
            ModelMetrics::new("b", 8.0, 700.0, 1.0),
            ModelMetrics::new("a", 1.0, 9000.0, 9.0),
        ]
    }

    fn delta() -> NonNegative {
        NonNegative::new(0.5).unwrap()
    }

    #[test]
    fn no_history() {
        let candidates = candidates();
        assert_eq!(
            guard(&candidates, 1, 9.0, &History::default(), delta()),
            (1, Decision::Chosen),
        );
        let name_only = History {
            last_selected: Some("a".into()),
            last_score: None,
        };
        assert_eq!(guard(&candidates, 1, 9.0, &name_only, delta()), (1, Decision::Chosen));
        let score_only = History {
            last_selected: None,
            last_score: Some(9.0),
        };
        assert_eq!(guard(&candidates, 1, 9.0, &score_only, delta()), (1, Decision::Chosen));
    }

    #[test]
    fn keeps_first_match_within_tolerance() {
        let (index, decision) = guard(&candidates(), 1, 9.2, &History::new("a", 9.0), delta());
        assert_eq!(index, 0);
        assert!(matches!(decision, Decision::KeptPrevious { .. }));
    }

    #[test]
    fn tolerance_is_exclusive() {
        let (index, decision) = guard(&candidates(), 1, 9.5, &History::new("a", 9.0), delta());
        assert_eq!((index, decision), (1, Decision::Chosen));
        let (index, _) = guard(&candidates(), 1, 8.6, &History::new("a", 9.0), delta());
        assert_eq!(index, 0);
    }

    #[test]
    fn previous_missing_falls_back() {
        let (index, decision) = guard(&candidates(), 1, 9.1, &History::new("z", 9.0), delta());
        assert_eq!(index, 1);
        assert_eq!(
            decision,
            Decision::PreviousMissing {
                previous: "z".into(),
                candidate: "b".into(),
            },
        );
    }

    #[test]
    fn non_finite_scores_never_keep_previous() {
        let candidates = candidates();
        for last_score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let history = History::new("a", last_score);
            assert_eq!(guard(&candidates, 1, 9.0, &history, delta()), (1, Decision::Chosen));
        }
        // `inf - inf` is NaN.
        let history = History::new("a", f64::INFINITY);
        assert_eq!(
            guard(&candidates, 1, f64::INFINITY, &history, delta()),
            (1, Decision::Chosen),
        );
        let history = History::new("a", 9.0);
        assert_eq!(guard(&candidates, 1, f64::NAN, &history, delta()), (1, Decision::Chosen));
    }

    #[test]
    fn empty_name_is_no_history() {
        let mut candidates = candidates();
        candidates[0].name = String::new();
        let history = History::new("", 9.0);
        assert_eq!(guard(&candidates, 1, 9.1, &history, delta()), (1, Decision::Chosen));
    }

    #[test]
    fn previous_is_chosen() {
        let (index, decision) = guard(&candidates(), 1, 9.1, &History::new("b", 9.0), delta());
        assert_eq!((index, decision), (1, Decision::Chosen));
    }
}
