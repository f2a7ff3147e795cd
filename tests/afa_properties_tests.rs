// Copyright 2025 Cowboy AI, LLC.

use std::sync::Arc;

use cep_core::afa::patterns::{updown_descriptor, CounterRegister, StockTick};
use cep_core::{
    AfaDescriptor, AfaOperator, IntervalEvent, PatternError, PointEvent, StateId, Ticks, Window,
    WindowSpec,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

const WINDOW_END: Ticks = Ticks(1_000);

fn window() -> Window {
    Window::new(Ticks(0), WINDOW_END).unwrap()
}

fn ticks(changes: &[f64]) -> Vec<PointEvent<StockTick>> {
    changes
        .iter()
        .enumerate()
        .map(|(i, change)| PointEvent::at(Ticks(i as i64), StockTick::new(*change)))
        .collect()
}

fn updown() -> AfaOperator<StockTick, CounterRegister> {
    AfaOperator::new(Arc::new(updown_descriptor()))
}

#[test]
fn updown_single_window_emits_both_balanced_suffixes() {
    let matches = updown()
        .evaluate(&window(), ticks(&[-1.0, -1.0, 1.0, 1.0]))
        .unwrap();

    // one instance completes at t2 (seeded at t1), the other at t3 (seeded at t0)
    assert_eq!(
        matches,
        vec![
            IntervalEvent {
                start: Ticks(2),
                end: WINDOW_END,
                payload: CounterRegister { counter: 0 },
            },
            IntervalEvent {
                start: Ticks(3),
                end: WINDOW_END,
                payload: CounterRegister { counter: 0 },
            },
        ]
    );
}

#[test]
fn updown_run_lifecycle_is_traced_per_generation() {
    let report = updown()
        .evaluate_with_report(&window(), ticks(&[-1.0, -1.0, 1.0, 1.0]))
        .unwrap();

    let carried: Vec<usize> = report.generations.iter().map(|g| g.carried_runs).collect();
    let surviving: Vec<usize> = report.generations.iter().map(|g| g.surviving_runs).collect();
    let matched: Vec<usize> = report.generations.iter().map(|g| g.matches).collect();

    assert_eq!(carried, vec![0, 2, 4, 2]);
    assert_eq!(surviving, vec![2, 4, 2, 1]);
    assert_eq!(matched, vec![0, 0, 1, 1]);
}

#[test]
fn dangling_arc_never_fires() {
    let mut afa: AfaDescriptor<StockTick, CounterRegister> =
        AfaDescriptor::new(StateId(0), CounterRegister::default());
    afa.add_arc(StateId(0), StateId(1), |_: &[StockTick], _: &CounterRegister| None)
        .add_arc(StateId(7), StateId(8), |_: &[StockTick], r: &CounterRegister| Some(*r))
        .add_final_state(StateId(1));
    let operator = AfaOperator::new(Arc::new(afa));

    let report = operator
        .evaluate_with_report(&window(), ticks(&[-1.0, 1.0, 0.0, 2.0]))
        .unwrap();

    assert!(report.matches.is_empty());
    assert!(report.generations.iter().all(|g| g.surviving_runs == 0));
}

/// Every arc accepts, so each carried run survives through the self-loop
fn always_accepting() -> AfaOperator<StockTick, CounterRegister> {
    let mut afa: AfaDescriptor<StockTick, CounterRegister> =
        AfaDescriptor::new(StateId(0), CounterRegister::default());
    afa.add_arc(StateId(0), StateId(1), |_: &[StockTick], r: &CounterRegister| {
        Some(CounterRegister::new(r.counter + 1))
    })
    .add_arc(StateId(1), StateId(1), |_: &[StockTick], r: &CounterRegister| {
        Some(CounterRegister::new(r.counter + 1))
    });
    AfaOperator::new(Arc::new(afa))
}

#[test_case(&[-1.0] ; "single event set")]
#[test_case(&[-1.0, -1.0] ; "two event sets")]
#[test_case(&[1.0, 0.0, -1.0, 1.0, 1.0, -2.0] ; "six event sets")]
fn one_run_is_seeded_per_event_set(changes: &[f64]) {
    let report = always_accepting()
        .evaluate_with_report(&window(), ticks(changes))
        .unwrap();

    assert_eq!(report.generations.len(), changes.len());
    for (i, generation) in report.generations.iter().enumerate() {
        assert_eq!(generation.carried_runs, i);
        assert_eq!(generation.surviving_runs, generation.carried_runs + 1);
    }
}

#[test]
fn simultaneous_events_seed_a_single_run() {
    let events = vec![
        PointEvent::at(Ticks(3), StockTick::new(-1.0)),
        PointEvent::at(Ticks(3), StockTick::new(1.0)),
        PointEvent::at(Ticks(3), StockTick::new(2.0)),
    ];
    let report = always_accepting()
        .evaluate_with_report(&window(), events)
        .unwrap();

    assert_eq!(report.generations.len(), 1);
    assert_eq!(report.generations[0].batch_len, 3);
    assert_eq!(report.generations[0].surviving_runs, 1);
}

#[test]
fn non_point_event_is_rejected_without_output() {
    let mut events = ticks(&[-1.0, 1.0]);
    events.push(PointEvent::spanning(Ticks(5), Ticks(9), StockTick::new(1.0)));

    let err = updown().evaluate(&window(), events).unwrap_err();
    assert_eq!(
        err,
        PatternError::NonPointEvent {
            start: Ticks(5),
            end: Ticks(9)
        }
    );
}

#[test]
fn unbounded_span_is_rejected_not_overflowed() {
    let window = Window::new(Ticks(-10), Ticks(10)).unwrap();
    let events = vec![PointEvent::spanning(
        Ticks(-5),
        Ticks(i64::MAX),
        StockTick::new(-1.0),
    )];

    assert_eq!(
        updown().evaluate(&window, events),
        Err(PatternError::NonPointEvent {
            start: Ticks(-5),
            end: Ticks(i64::MAX)
        })
    );

    let reversed = vec![PointEvent::spanning(
        Ticks(5),
        Ticks(i64::MIN),
        StockTick::new(-1.0),
    )];
    assert!(matches!(
        updown().evaluate(&window, reversed),
        Err(PatternError::NonPointEvent { .. })
    ));
}

#[test]
fn stream_at_the_end_of_the_timeline_is_rejected() {
    let spec = WindowSpec::Tumbling { size: Ticks(10) };
    let events = vec![PointEvent::at(Ticks(i64::MAX - 1), StockTick::new(-1.0))];

    assert!(matches!(
        updown().evaluate_stream(&spec, &events),
        Err(PatternError::InvalidWindow { .. })
    ));
}

#[test]
fn event_before_window_is_rejected() {
    let window = Window::new(Ticks(10), Ticks(20)).unwrap();
    let err = updown().evaluate(&window, ticks(&[-1.0])).unwrap_err();
    assert!(matches!(err, PatternError::EventOutsideWindow { .. }));
}

#[test]
fn duplicate_arc_registration_keeps_the_last() {
    let mut afa: AfaDescriptor<StockTick, CounterRegister> =
        AfaDescriptor::new(StateId(0), CounterRegister::default());
    afa.add_arc(StateId(0), StateId(1), |_: &[StockTick], _: &CounterRegister| None)
        .add_arc(StateId(0), StateId(1), |_: &[StockTick], _: &CounterRegister| {
            Some(CounterRegister::new(42))
        })
        .add_final_state(StateId(1));

    assert_eq!(afa.arc_count(), 1);
    assert_eq!(afa.overwritten_arcs(), 1);

    let matches = AfaOperator::new(Arc::new(afa))
        .evaluate(&window(), ticks(&[0.0]))
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].payload, CounterRegister::new(42));
}

#[test]
fn tumbling_windows_do_not_share_runs() {
    // the downtick falls in [0, 2), the uptick in [2, 4)
    let spec = WindowSpec::Tumbling { size: Ticks(2) };
    let events = vec![
        PointEvent::at(Ticks(1), StockTick::new(-1.0)),
        PointEvent::at(Ticks(2), StockTick::new(1.0)),
    ];

    assert!(updown().evaluate_stream(&spec, &events).unwrap().is_empty());

    let single = WindowSpec::Tumbling { size: Ticks(4) };
    let matches = updown().evaluate_stream(&single, &events).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].end, Ticks(4));
}

#[tokio::test]
async fn windows_evaluate_in_parallel_against_a_shared_descriptor() {
    let descriptor = Arc::new(updown_descriptor());
    let mut handles = Vec::new();

    for w in 0..8i64 {
        let operator = AfaOperator::new(Arc::clone(&descriptor));
        handles.push(tokio::spawn(async move {
            let start = w * 10;
            let window = Window::new(Ticks(start), Ticks(start + 10)).unwrap();
            let events: Vec<_> = [-1.0, -1.0, 1.0, 1.0]
                .iter()
                .enumerate()
                .map(|(i, c)| PointEvent::at(Ticks(start + i as i64), StockTick::new(*c)))
                .collect();
            operator.evaluate(&window, events)
        }));
    }

    for (w, handle) in handles.into_iter().enumerate() {
        let matches = handle.await.unwrap().unwrap();
        let starts: Vec<Ticks> = matches.iter().map(|m| m.start).collect();
        let base = w as i64 * 10;
        assert_eq!(starts, vec![Ticks(base + 2), Ticks(base + 3)]);
    }
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(changes in proptest::collection::vec(-3i8..=3, 0..24)) {
        let changes: Vec<f64> = changes.into_iter().map(f64::from).collect();
        let operator = updown();
        let first = operator.evaluate(&window(), ticks(&changes)).unwrap();
        let second = operator.evaluate(&window(), ticks(&changes)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_match_ends_at_the_window_end(changes in proptest::collection::vec(-3i8..=3, 0..24)) {
        let changes: Vec<f64> = changes.into_iter().map(f64::from).collect();
        let matches = updown().evaluate(&window(), ticks(&changes)).unwrap();
        prop_assert!(matches.iter().all(|m| m.end == WINDOW_END && m.payload.counter == 0));
    }
}
