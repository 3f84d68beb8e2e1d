use std::time::Duration;

use dicestat::{
    config::SimulationConfig,
    statistics::{MonteCarloEngine, SimulationError},
    Evaluator, Expression, Sides,
};
use futures::future::join_all;

fn engine(workers: usize, timeout: Duration) -> MonteCarloEngine {
    MonteCarloEngine::new(&SimulationConfig {
        workers: Some(workers),
        timeout,
        ..SimulationConfig::default()
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn it_returns_partial_results_under_concurrent_deadlines() {
    let engine = engine(2, Duration::from_millis(150));
    let runs = (0..4).map(|_| {
        engine.simulate_report(
            || {
                std::thread::sleep(Duration::from_micros(200));
                Evaluator::new()
                    .roll_total(&Expression::dice(Some(2), Sides::Integer(6)), &mut rand::thread_rng())
                    .unwrap_or_default()
            },
            1_000_000,
        )
    });

    for result in join_all(runs).await {
        match result {
            Ok(report) => {
                assert!(report.collected > 0);
                assert!(report.collected < report.requested);
                let stats = report.statistics;
                assert!(stats.min >= 2 && stats.max <= 12);
                assert!(stats.percentiles.values().all(|p| *p >= 2.0 && *p <= 12.0));
            }
            Err(err) => assert!(matches!(err, SimulationError::Timeout { .. })),
        }
    }
}

#[tokio::test]
async fn it_is_bounded_by_the_timeout() {
    let timeout = Duration::from_millis(200);
    let started = std::time::Instant::now();
    let result = engine(1, timeout)
        .simulate(
            || {
                std::thread::sleep(Duration::from_millis(5));
                1
            },
            usize::MAX,
        )
        .await;

    assert!(result.is_ok());
    assert!(started.elapsed() < timeout + Duration::from_millis(500));
}

#[tokio::test]
async fn it_matches_closed_form_moments_for_d6() {
    let expression = Expression::dice(None, Sides::Integer(6));
    let stats = engine(4, Duration::from_secs(10))
        .simulate(
            move || {
                Evaluator::new()
                    .roll_total(&expression, &mut rand::thread_rng())
                    .unwrap_or_default()
            },
            300_000,
        )
        .await
        .unwrap();

    assert_eq!(stats.min, 1);
    assert_eq!(stats.max, 6);
    assert!((stats.mean - 3.5).abs() < 0.03);
    assert!((stats.variance - 35.0 / 12.0).abs() < 0.05);
    // discrete uniform excess kurtosis is -1.27 for six faces
    assert!((stats.kurtosis + 1.27).abs() < 0.05);
    assert_eq!(stats.percentile(0), Some(1.0));
    assert_eq!(stats.percentile(100), Some(6.0));
}
