use crate::num::NonNegative;

/// Score the given `cost`, in the same unit as `cost_ref`. Cheaper candidates score higher, and a
/// cost equal to `cost_ref` scores exactly 1. `cost` must be positive.
pub fn normalize_cost(cost_ref: NonNegative, cost: f64) -> f64 {
    cost_ref.as_f64() / cost
}
