use beam_core::RngHandle;
use beam_errors::{sample_values, ErrorSpec};
use proptest::prelude::*;

proptest! {
    #[test]
    fn truncated_draws_stay_within_the_bound(
        seed in any::<u64>(),
        truncation in 0.2..4.0f64,
        sigma in 1.0e-6..1.0e-2f64,
        systematic in -1.0..1.0f64,
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let spec = ErrorSpec::random(sigma).with_systematic(systematic);
        let values =
            sample_values("ShiftErr", &spec, 32, Some(2), Some(truncation), &mut rng).unwrap();
        let bound = truncation * sigma * (1.0 + 1.0e-12);
        for row in values {
            for value in row {
                prop_assert!((value - systematic).abs() <= bound);
            }
        }
    }

    #[test]
    fn sampling_is_deterministic_per_seed(seed in any::<u64>()) {
        let spec = ErrorSpec::random([1.0e-4, 2.0e-4]);
        let mut rng_a = RngHandle::from_seed(seed);
        let mut rng_b = RngHandle::from_seed(seed);
        let a = sample_values("BPMOffset", &spec, 8, Some(2), Some(2.0), &mut rng_a).unwrap();
        let b = sample_values("BPMOffset", &spec, 8, Some(2), Some(2.0), &mut rng_b).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn invalid_truncation_is_rejected() {
    let mut rng = RngHandle::from_seed(3);
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = sample_values(
            "ShiftErr",
            &ErrorSpec::random(1.0e-4),
            4,
            Some(2),
            Some(bad),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err.info().code, "error-distribution");
    }
}
