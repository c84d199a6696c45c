//! Deterministic selection of one candidate (a model, endpoint, or backend) out of a scored set,
//! driven by a caller-declared [`Preference`] and guarded against flapping between
//! near-equivalent candidates across calls.

pub mod compare;
pub mod config;
pub mod criteria;
pub mod error;
pub mod hysteresis;
pub mod num;
pub mod preference;

pub use crate::{
    compare::Comparison,
    config::{BalancedWeights, SelectorConfig},
    criteria::Criteria,
    error::Error,
    hysteresis::{Decision, History},
    preference::Preference,
};

pub trait Candidate {
    /// Unique within one call's candidate set.
    fn name(&self) -> &str;
    /// Higher is better, nominally in [1, 10].
    fn quality(&self) -> f64;
    /// Lower is better, must be positive.
    fn response_time(&self) -> f64;
    /// Lower is better, must be positive.
    fn cost(&self) -> f64;
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelMetrics {
    pub name: String,
    pub quality: f64,
    pub response_time: f64,
    pub cost: f64,
    /// Opaque timestamp for the caller's bookkeeping. Selection never reads it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_updated: u64,
}

impl ModelMetrics {
    pub fn new(name: impl Into<String>, quality: f64, response_time: f64, cost: f64) -> Self {
        Self {
            name: name.into(),
            quality,
            response_time,
            cost,
            last_updated: 0,
        }
    }
}

impl Candidate for ModelMetrics {
    fn name(&self) -> &str {
        &self.name
    }
    fn quality(&self) -> f64 {
        self.quality
    }
    fn response_time(&self) -> f64 {
        self.response_time
    }
    fn cost(&self) -> f64 {
        self.cost
    }
}

/// The outcome of [`Selector::select`].
#[derive(Debug)]
pub struct Selection<'c, C> {
    pub candidate: &'c C,
    /// Position of `candidate` in the candidate set.
    pub index: usize,
    pub preference: Preference,
    pub criteria: Criteria,
    /// Balanced score of `candidate`.
    pub score: f64,
    pub decision: Decision,
    candidates: &'c [C],
}

impl<C: Candidate> Selection<'_, C> {
    /// The history to pass into the next call for the same logical resource.
    pub fn history(&self) -> History {
        History::new(self.candidate.name(), self.score)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Selector {
    config: SelectorConfig,
}

impl Selector {
    /// Returns `None` if `config` fails [`SelectorConfig::is_valid`].
    pub fn new(config: SelectorConfig) -> Option<Self> {
        config.is_valid().then_some(Self { config })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn normalize<C: Candidate + ?Sized>(&self, candidate: &C) -> Result<Criteria, Error> {
        Criteria::new(candidate, &self.config)
    }

    /// Run the preference's rule alone, without the anti-flap guard. Returns the index of the
    /// chosen candidate.
    pub fn strategy<C: Candidate>(
        &self,
        candidates: &[C],
        preference: Preference,
    ) -> Result<usize, Error> {
        let criteria = self.normalize_all(candidates)?;
        preference
            .choose(&criteria, &self.config)
            .ok_or(Error::EmptyCandidateSet)
    }

    /// Select exactly one of `candidates` according to `preference`, keeping the previous
    /// selection from `history` when the new choice's balanced score is within
    /// `anti_flap_delta` of the previous score and the previous selection is still a candidate.
    pub fn select<'c, C: Candidate>(
        &self,
        candidates: &'c [C],
        preference: Preference,
        history: &History,
    ) -> Result<Selection<'c, C>, Error> {
        let criteria = self.normalize_all(candidates)?;
        let chosen = preference
            .choose(&criteria, &self.config)
            .ok_or(Error::EmptyCandidateSet)?;
        let chosen_score = criteria[chosen].balanced_score(&self.config.balanced);
        tracing::trace!(
            %preference,
            chosen = candidates[chosen].name(),
            score = chosen_score,
            "preference choice"
        );

        let (index, decision) = hysteresis::guard(
            candidates,
            chosen,
            chosen_score,
            history,
            self.config.anti_flap_delta,
        );
        let score = if index == chosen {
            chosen_score
        } else {
            criteria[index].balanced_score(&self.config.balanced)
        };
        tracing::debug!(
            %preference,
            selected = candidates[index].name(),
            score,
            ?decision,
            "selected candidate"
        );
        Ok(Selection {
            candidate: &candidates[index],
            index,
            preference,
            criteria: criteria[index],
            score,
            decision,
            candidates,
        })
    }

    /// Compare `selection` with its runner-up: the candidate the same preference picks once the
    /// selected candidate is removed. A lone candidate is its own runner-up.
    pub fn compare<'c, C: Candidate>(
        &self,
        selection: &Selection<'c, C>,
    ) -> Result<Comparison<'c, C>, Error> {
        let rest: Vec<usize> = (0..selection.candidates.len())
            .filter(|&i| i != selection.index)
            .collect();
        let criteria = rest
            .iter()
            .map(|&i| self.normalize(&selection.candidates[i]))
            .collect::<Result<Vec<Criteria>, Error>>()?;
        let runner_up = selection
            .preference
            .choose(&criteria, &self.config)
            .map(|i| rest[i])
            .unwrap_or(selection.index);
        Ok(Comparison::new(
            selection.candidate,
            &selection.candidates[runner_up],
        ))
    }

    fn normalize_all<C: Candidate>(&self, candidates: &[C]) -> Result<Vec<Criteria>, Error> {
        if candidates.is_empty() {
            return Err(Error::EmptyCandidateSet);
        }
        candidates.iter().map(|c| self.normalize(c)).collect()
    }
}

/// [`Selector::select`] with the reference configuration.
pub fn select<'c, C: Candidate>(
    candidates: &'c [C],
    preference: Preference,
    history: &History,
) -> Result<Selection<'c, C>, Error> {
    Selector::default().select(candidates, preference, history)
}
