use feature_engine::{extract_features, FeatureName, TapPosition, FEATURE_COUNT};
use proptest::prelude::*;

fn interval() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(250.0), 0.0..2_000.0f64]
}

fn position() -> impl Strategy<Value = TapPosition> {
    (0.0..1_000.0f64, 0.0..2_000.0f64).prop_map(|(x, y)| TapPosition::new(x, y))
}

proptest! {
    #[test]
    fn every_feature_is_finite(
        intervals in prop::collection::vec(interval(), 0..64),
        positions in prop::option::of(prop::collection::vec(position(), 0..64)),
    ) {
        let features = extract_features(&intervals, positions.as_deref());
        prop_assert!(!features.is_empty());
        for (name, value) in features.iter() {
            prop_assert!(value.is_finite(), "{} = {}", name, value);
        }
    }

    #[test]
    fn key_set_depends_only_on_length(intervals in prop::collection::vec(interval(), 0..32)) {
        let features = extract_features(&intervals, None);
        let expected = if intervals.len() < 2 { 18 } else { FEATURE_COUNT };
        prop_assert_eq!(features.len(), expected);
    }

    #[test]
    fn repeated_value_has_no_spread(value in 0.0..5_000.0f64, len in 2usize..40) {
        let intervals = vec![value; len];
        let features = extract_features(&intervals, None);
        prop_assert_eq!(features.get(FeatureName::SdTapInter), Some(0.0));
        prop_assert_eq!(features.get(FeatureName::RangeTapInter), Some(0.0));
        prop_assert_eq!(features.get(FeatureName::MadTapInter), Some(0.0));
        prop_assert_eq!(features.get(FeatureName::SkewTapInter), Some(0.0));
        prop_assert_eq!(features.get(FeatureName::KurTapInter), Some(0.0));
    }

    #[test]
    fn correlation_is_bounded(positions in prop::collection::vec(position(), 1..64)) {
        let features = extract_features(&[100.0, 120.0, 110.0], Some(&positions));
        let cor = features.get(FeatureName::CorXy).unwrap();
        prop_assert!((-1.0..=1.0).contains(&cor));
        prop_assert_eq!(features.get(FeatureName::NumberTaps), Some(positions.len() as f64));
    }
}
