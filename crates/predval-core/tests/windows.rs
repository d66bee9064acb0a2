use predval_core::{generate_windows, PipelineError, Window, WindowClamp, WindowPlan, WindowSize};
use predval_parser::{Observation, RecordSet};

fn size(n: usize) -> WindowSize {
    WindowSize::new(n).expect("window size must be positive")
}

fn window(start: i64, end: i64) -> Window {
    Window::new(start, end).expect("start must not be after end")
}

#[test]
fn slides_one_tick_at_a_time_across_the_span() {
    let (t_min, t_max) = (3, 12);
    let span = (t_max - t_min + 1) as usize;

    for n in 1..=span {
        let plan = generate_windows(t_min, t_max, size(n));

        assert_eq!(plan.len(), span - n + 1, "window size {n}");
        assert!(plan.clamp().is_none());

        for (i, window) in plan.iter().enumerate() {
            assert_eq!(window.start(), t_min + i as i64);
            assert_eq!(window.end() - window.start() + 1, n as i64);
        }

        assert_eq!(plan.windows().first().map(Window::start), Some(t_min));
        assert_eq!(plan.windows().last().map(Window::end), Some(t_max));
    }
}

#[test]
fn oversized_window_is_clamped_to_the_span() {
    let plan = generate_windows(1, 6, size(10));

    assert_eq!(plan.windows(), &[window(1, 6)]);
    assert_eq!(
        plan.clamp(),
        Some(&WindowClamp {
            requested: 10,
            applied: 6
        })
    );
    assert_eq!(
        plan.clamp().map(ToString::to_string).as_deref(),
        Some("Window size is bigger than observation period. Using window size of 6 instead.")
    );
}

#[test]
fn window_equal_to_span_is_not_clamped() {
    let plan = generate_windows(-2, 2, size(5));

    assert_eq!(plan.windows(), &[window(-2, 2)]);
    assert!(plan.clamp().is_none());
}

#[test]
fn single_tick_span() {
    let plan = generate_windows(7, 7, size(3));

    assert_eq!(plan.windows(), &[window(7, 7)]);
    assert_eq!(plan.clamp().map(|c| c.applied), Some(1));
}

#[test]
fn inverted_span_yields_no_windows() {
    let plan = generate_windows(5, 4, size(2));

    assert!(plan.is_empty());
    assert!(plan.clamp().is_none());
}

#[test]
fn plan_is_reiterable() {
    let plan = generate_windows(1, 5, size(2));

    let first: Vec<Window> = plan.iter().copied().collect();
    let second: Vec<Window> = (&plan).into_iter().copied().collect();
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            window(1, 2),
            window(2, 3),
            window(3, 4),
            window(4, 5)
        ]
    );
}

#[test]
fn plan_follows_actual_time_bounds() {
    let actual = RecordSet::from_observations(vec![
        Observation::new(4, "A", 1.0),
        Observation::new(2, "A", 1.0),
        Observation::new(6, "B", 1.0),
    ]);

    let plan = WindowPlan::for_records(&actual, size(3));
    assert_eq!(
        plan.windows(),
        &[window(2, 4), window(3, 5), window(4, 6)]
    );

    let empty = WindowPlan::for_records(&RecordSet::default(), size(3));
    assert!(empty.is_empty());
}

#[test]
fn window_membership() {
    let frame = window(10, 12);

    assert!(frame.contains(10));
    assert!(frame.contains(12));
    assert!(!frame.contains(13));
    assert_eq!(frame.to_string(), "[10, 12]");
}

#[test]
fn inverted_window_is_rejected() {
    assert!(matches!(
        Window::new(5, 4),
        Err(PipelineError::InvertedWindow { start: 5, end: 4 })
    ));
    assert_eq!(window(4, 4).start(), 4);
}

#[test]
fn wide_sparse_span_plans_per_window_not_per_tick() {
    let far = 1_i64 << 40;

    let plan = generate_windows(0, far, size(far as usize + 1));
    assert_eq!(plan.windows(), &[window(0, far)]);
    assert!(plan.clamp().is_none());

    let clamped = generate_windows(0, far, size(far as usize + 2));
    assert_eq!(clamped.windows(), &[window(0, far)]);
    assert_eq!(clamped.clamp().map(|c| c.applied), Some(far as usize + 1));

    let two = generate_windows(0, far, size(far as usize));
    assert_eq!(two.windows(), &[window(0, far - 1), window(1, far)]);
}

#[test]
fn full_i64_span_does_not_overflow() {
    // 2^64 ticks: a usize::MAX window fits exactly twice.
    let plan = generate_windows(i64::MIN, i64::MAX, size(usize::MAX));
    assert_eq!(
        plan.windows(),
        &[window(i64::MIN, i64::MAX - 1), window(i64::MIN + 1, i64::MAX)]
    );
    assert!(plan.clamp().is_none());
}
