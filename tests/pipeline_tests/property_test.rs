use dicestat::{aggregate, evaluate, parse, statistics::PERCENTILE_RANKS, Expression};
use proptest::prelude::*;

proptest! {
    #[test]
    fn dice_outcomes_respect_count_and_sides(count in 1u32..200, sides in 1u32..1_000) {
        let expression = parse(&format!("{}d{}", count, sides)).unwrap();
        let outcome = evaluate(&expression).unwrap();

        prop_assert_eq!(outcome.breakdown.len(), count as usize);
        prop_assert!(outcome.breakdown.iter().all(|face| (1..=i64::from(sides)).contains(face)));
        prop_assert_eq!(outcome.breakdown.iter().sum::<i64>(), outcome.value);
    }

    #[test]
    fn percent_die_matches_hundred_sides(count in 1u32..50) {
        let outcome = evaluate(&parse(&format!("{}d%", count)).unwrap()).unwrap();
        prop_assert_eq!(outcome.breakdown.len(), count as usize);
        prop_assert!(outcome.breakdown.iter().all(|face| (1..=100).contains(face)));
    }

    #[test]
    fn literals_evaluate_to_themselves(value in 0i64..i64::MAX) {
        let expression = parse(&value.to_string()).unwrap();
        prop_assert_eq!(expression, Expression::number(value));
        let outcome = evaluate(&expression).unwrap();
        prop_assert_eq!(outcome.value, value);
        prop_assert_eq!(outcome.breakdown, vec![value]);
    }

    #[test]
    fn canonical_form_reparses(count in proptest::option::of(1u32..10_000), sides in 1u32..10_000) {
        let text = match count {
            Some(count) => format!("{}d{}", count, sides),
            None => format!("d{}", sides),
        };
        let expression = parse(&text).unwrap();
        prop_assert_eq!(expression.to_string(), text);
    }

    #[test]
    fn percentiles_are_bounded_and_monotonic(samples in prop::collection::vec(-1_000i64..1_000, 1..500)) {
        let stats = aggregate(&samples).unwrap();
        let curve: Vec<f64> = PERCENTILE_RANKS
            .iter()
            .map(|rank| stats.percentile(*rank).unwrap())
            .collect();

        prop_assert!(curve.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(curve.iter().all(|p| *p >= stats.min as f64 && *p <= stats.max as f64));
        prop_assert_eq!(stats.percentile(0), Some(stats.min as f64));
        prop_assert_eq!(stats.percentile(100), Some(stats.max as f64));
        prop_assert!(stats.variance >= 0.0);
        prop_assert!(stats.skewness.is_finite() && stats.kurtosis.is_finite());
    }
}
