use crate::num::NonNegative;

/// Score the given `response_time`, in the same unit as `rt_ref`. The result is higher for faster
/// responses, and a response time equal to `rt_ref` scores exactly 1. `response_time` must be
/// positive.
pub fn normalize_speed(rt_ref: NonNegative, response_time: f64) -> f64 {
    rt_ref.as_f64() / response_time
}

#[cfg(test)]
mod test {
    use proptest::{prop_assert, proptest};

    use crate::num::{assert_within, NonNegative};

    #[test]
    fn speed_limits() {
        let rt_ref = NonNegative::new(800.0).unwrap();
        assert_eq!(super::normalize_speed(rt_ref, 800.0), 1.0);
        assert_eq!(super::normalize_speed(rt_ref, 400.0), 2.0);
        assert_within(super::normalize_speed(rt_ref, 650.0), 1.2308, 1e-4);
        assert_within(super::normalize_speed(rt_ref, 1100.0), 0.7273, 1e-4);
    }

    proptest! {
        #[test]
        fn speed_decreasing(a in 1e-3_f64..1e6, b in 1e-3_f64..1e6) {
            let rt_ref = NonNegative::new(800.0).unwrap();
            let (sa, sb) = (super::normalize_speed(rt_ref, a), super::normalize_speed(rt_ref, b));
            prop_assert!(sa > 0.0 && sb > 0.0);
            if a < b {
                prop_assert!(sa >= sb);
            }
            if a * (1.0 + 1e-9) < b {
                prop_assert!(sa > sb);
            }
        }
    }
}
