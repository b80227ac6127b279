// Integration tests for the step generator: end-to-end ordering properties
// over generated micro-step sequences

use looplens::engine::errors::GenerateError;
use looplens::engine::generator::StepGenerator;
use looplens::engine::step::MicroStep;
use looplens::presets;

fn generate(source: &str) -> Vec<MicroStep> {
    let mut generator = StepGenerator::new();
    generator
        .generate(source)
        .expect("step generation should succeed")
}

/// Console messages in emission order
fn console_of(steps: &[MicroStep]) -> Vec<String> {
    steps
        .iter()
        .filter_map(|step| match step {
            MicroStep::ConsoleOutput { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

fn first_index(steps: &[MicroStep], pred: impl Fn(&MicroStep) -> bool) -> Option<usize> {
    steps.iter().position(pred)
}

#[test]
fn test_sync_only_program_touches_no_queues() {
    let steps = generate(
        r#"
        console.log('one');
        console.log('two');
        console.log('three');
        "#,
    );

    assert_eq!(console_of(&steps), vec!["one", "two", "three"]);
    assert!(steps.iter().all(|step| !matches!(
        step,
        MicroStep::TaskAdd { .. }
            | MicroStep::MicrotaskAdd { .. }
            | MicroStep::WebApiAdd { .. }
            | MicroStep::RafAdd { .. }
    )));
}

#[test]
fn test_microtask_steps_precede_task_steps() {
    let steps = generate(
        r#"
        setTimeout(() => { console.log('task'); }, 0);
        Promise.resolve().then(() => { console.log('micro'); });
        "#,
    );

    assert_eq!(console_of(&steps), vec!["micro", "task"]);

    let last_micro = steps
        .iter()
        .rposition(|s| matches!(s, MicroStep::MicrotaskAdd { .. }))
        .expect("expected a microtask step");
    let first_task = first_index(&steps, |s| matches!(s, MicroStep::TaskAdd { .. }))
        .expect("expected a task step");
    assert!(
        last_micro < first_task,
        "every microtask step must come before the first task step"
    );
}

#[test]
fn test_timers_run_by_delay_not_declaration_order() {
    let steps = generate(
        r#"
        setTimeout(() => console.log('1000ms'), 1000);
        setTimeout(() => console.log('500ms'), 500);
        setTimeout(() => console.log('10ms'), 10);
        setTimeout(() => console.log('0ms'), 0);
        "#,
    );

    assert_eq!(console_of(&steps), vec!["0ms", "10ms", "500ms", "1000ms"]);
}

#[test]
fn test_equal_delays_keep_declaration_order() {
    let steps = generate(
        r#"
        setTimeout(() => console.log('first'), 0);
        setTimeout(() => console.log('second'), 0);
        "#,
    );
    assert_eq!(console_of(&steps), vec!["first", "second"]);
}

#[test]
fn test_nested_then_chain_resolves_before_zero_delay_timeout() {
    let steps = generate(
        r#"
        Promise.resolve().then(() => {
          console.log('Promise 1');
          Promise.resolve().then(() => {
            console.log('Promise 2');
            Promise.resolve().then(() => {
              console.log('Promise 3');
            });
          });
        });

        setTimeout(() => {
          console.log('Timeout');
        }, 0);
        "#,
    );

    assert_eq!(
        console_of(&steps),
        vec!["Promise 1", "Promise 2", "Promise 3", "Timeout"]
    );
}

#[test]
fn test_reject_skips_then_and_runs_catch() {
    let steps = generate(
        r#"
        Promise.reject()
          .then(() => console.log('skipped'))
          .catch(() => console.log('caught'));
        "#,
    );
    assert_eq!(console_of(&steps), vec!["caught"]);
}

#[test]
fn test_catch_on_fulfilled_chain_is_a_full_noop() {
    let steps = generate("Promise.resolve().catch(() => console.log('skipped'));");
    assert!(console_of(&steps).is_empty());
    assert!(
        steps
            .iter()
            .all(|s| !matches!(s, MicroStep::MicrotaskAdd { .. })),
        "a skipped branch must not enqueue a microtask"
    );
}

#[test]
fn test_catch_recovers_chain_for_downstream_then() {
    let steps = generate(
        r#"
        Promise.reject()
          .catch(() => console.log('recovered'))
          .then(() => console.log('after recovery'));
        "#,
    );
    assert_eq!(console_of(&steps), vec!["recovered", "after recovery"]);
}

#[test]
fn test_async_function_continues_as_microtask() {
    let steps = generate(
        r#"
        console.log('Start');

        async function fetchData() {
          console.log('Fetching...');
          const data = await Promise.resolve('Data');
          console.log(data);
        }

        fetchData();

        console.log('End');
        "#,
    );

    assert_eq!(
        console_of(&steps),
        vec!["Start", "Fetching...", "End", "Data"]
    );
}

#[test]
fn test_sequential_awaits_resume_in_order() {
    let preset = presets::find("async-sequential").expect("preset exists");
    let steps = generate(preset.code);
    assert_eq!(
        console_of(&steps),
        vec![
            "Start",
            "After function call",
            "After first await",
            "After second await",
            "After third await",
            "Done",
        ]
    );
}

#[test]
fn test_animation_frame_runs_between_microtasks_and_tasks() {
    let steps = generate(
        r#"
        requestAnimationFrame(() => console.log('frame'));
        setTimeout(() => console.log('task'), 0);
        Promise.resolve().then(() => console.log('micro'));
        "#,
    );
    assert_eq!(console_of(&steps), vec!["micro", "frame", "task"]);

    let raf = first_index(&steps, |s| matches!(s, MicroStep::RafAdd { .. })).unwrap();
    let task = first_index(&steps, |s| matches!(s, MicroStep::TaskAdd { .. })).unwrap();
    assert!(raf < task);
}

#[test]
fn test_task_microtask_checkpoint_runs_before_next_task() {
    let steps = generate(
        r#"
        setTimeout(() => {
          console.log('task 1');
          Promise.resolve().then(() => console.log('micro after task 1'));
        }, 0);
        setTimeout(() => console.log('task 2'), 10);
        "#,
    );
    assert_eq!(
        console_of(&steps),
        vec!["task 1", "micro after task 1", "task 2"]
    );
}

#[test]
fn test_set_interval_registers_but_never_runs() {
    let steps = generate(
        r#"
        setInterval(() => console.log('tick'), 100);
        console.log('after');
        "#,
    );

    assert_eq!(console_of(&steps), vec!["after"]);

    let interval_id = steps
        .iter()
        .find_map(|s| match s {
            MicroStep::WebApiAdd { id, name, .. } if name.starts_with("setInterval") => Some(*id),
            _ => None,
        })
        .expect("interval must appear in the Web APIs");
    assert!(
        steps
            .iter()
            .all(|s| !matches!(s, MicroStep::WebApiRemove { id } if *id == interval_id)),
        "the interval registration must persist for the whole run"
    );
    assert!(steps.iter().all(|s| !matches!(s, MicroStep::TaskAdd { .. })));
}

#[test]
fn test_closure_counters_are_independent() {
    let preset = presets::find("closures-and-scope").expect("preset exists");
    let steps = generate(preset.code);

    // Assignment writes into the activation scope, so each invocation sees
    // the captured initial value; the two counters never bleed into each
    // other
    assert_eq!(console_of(&steps), vec!["A: 1", "A: 1", "B: 1"]);
}

#[test]
fn test_return_values_flow_through_nested_calls() {
    let preset = presets::find("return-values").expect("preset exists");
    let steps = generate(preset.code);
    assert_eq!(console_of(&steps), vec!["Result: 49"]);
}

#[test]
fn test_unknown_call_degrades_to_highlight_only() {
    let steps = generate("document.write('x');");
    assert_eq!(steps.len(), 1);
    assert!(matches!(steps[0], MicroStep::HighlightLine { line: 1 }));
}

#[test]
fn test_runs_are_independent_after_reset() {
    let mut generator = StepGenerator::new();
    let first = generator.generate("console.log('a');").unwrap();
    let _other = generator
        .generate("setTimeout(() => console.log('x'), 5);")
        .unwrap();
    let again = generator.generate("console.log('a');").unwrap();
    assert_eq!(first, again, "a rerun must not observe leftover state");
}

#[test]
fn test_source_over_length_limit_is_rejected() {
    let mut generator = StepGenerator::new();
    let source = format!("console.log('x');{}", " ".repeat(60_000));
    let err = generator.generate(&source).unwrap_err();
    assert!(matches!(err, GenerateError::CodeTooLong { .. }));
}

#[test]
fn test_syntax_error_is_generic() {
    let mut generator = StepGenerator::new();
    let err = generator.generate("let = ;").unwrap_err();
    assert!(matches!(err, GenerateError::Syntax));
    assert_eq!(err.to_string(), "Syntax error in code");
}

#[test]
fn test_runaway_program_hits_a_complexity_ceiling() {
    let mut generator = StepGenerator::new();
    // Self-rescheduling microtask chain; the generator must refuse rather
    // than diverge
    let err = generator
        .generate(
            r#"
            function again() {
              Promise.resolve().then(again);
            }
            again();
            "#,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        GenerateError::StepLimitExceeded { .. } | GenerateError::MicrotaskLimitExceeded { .. }
    ));
}

#[test]
fn test_loop_past_iteration_cap_warns_and_continues() {
    let steps = generate(
        r#"
        for (let i = 0; i >= 0; i += 1) { let x = i; }
        console.log('after loop');
        "#,
    );
    let console = console_of(&steps);
    assert_eq!(console.len(), 2);
    assert!(console[0].contains("1000"));
    assert_eq!(console[1], "after loop");
}

#[test]
fn test_for_loop_counts_correctly() {
    let steps = generate(
        r#"
        let total = 0;
        for (let i = 1; i <= 4; i++) {
          total += i;
        }
        console.log('total', total);
        "#,
    );
    assert_eq!(console_of(&steps), vec!["total 10"]);
}

#[test]
fn test_template_literals_interpolate_scope_values() {
    let steps = generate(
        r#"
        let count = 3;
        console.log(`Count: ${count}`);
        "#,
    );
    assert_eq!(console_of(&steps), vec!["Count: 3"]);
}

#[test]
fn test_every_step_has_a_nominal_duration() {
    let preset = presets::find("async-mixed-priority").expect("preset exists");
    for step in generate(preset.code) {
        assert!(step.duration_ms() > 0);
    }
}

#[test]
fn test_mixed_priority_preset_full_ordering() {
    let preset = presets::find("async-mixed-priority").expect("preset exists");
    let steps = generate(preset.code);
    assert_eq!(
        console_of(&steps),
        vec![
            "1. Script Start",
            "2. Script End",
            "3. Promise 1",
            "4. Promise 2",
            "6. RAF",
            "8. Timeout 0ms",
            "9. Timeout 2 (Nested)",
            "10. Microtask in properties",
        ]
    );
}
