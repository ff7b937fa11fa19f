// Integration tests for exercise mode

mod common;

use algovis::exercise::{ExamResult, Exercise, ExerciseProvider};
use algovis::rte::{RteError, StartOption};
use algovis::state::StateValue;
use common::{wait, Counter, Harness, ProviderLog, Question, SetValueQuestion};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Harness in exercise mode with a recording provider
fn exam(counter: Counter) -> (Harness, Arc<ProviderLog>) {
    let h = Harness::new(counter);
    let provider = Arc::new(ProviderLog::default());
    h.rte
        .set_exercise_provider(Some(provider.clone() as Arc<dyn ExerciseProvider>));
    assert_eq!(h.rte.set_exercise_mode_enabled(true).unwrap(), true);
    (h, provider)
}

fn counter_with_exercise(steps: i32, at: i32, exercise: &Arc<Exercise>) -> Counter {
    let mut counter = Counter::new(steps);
    counter.exercises = true;
    counter.exercise = Some((at, Arc::clone(exercise)));
    counter
}

#[test]
fn test_wrong_then_right_answer() {
    let q = Question::new("Value after step 0?");
    let (h, provider) = exam(counter_with_exercise(2, 0, &q.exercise));

    h.rte.start(StartOption::Normal).unwrap();
    assert!(q.wait_for_request(1));
    assert!(q.exercise.solve(vec![StateValue::Int(5)]));

    // The wrong answer is examined, rolled back and asked again
    assert!(q.wait_for_request(2));
    assert_eq!(h.journal.rollbacks(), vec![(0, 1)]);
    assert_eq!(h.journal.last_restored(), Some(0));
    assert!(q.exercise.solve(vec![StateValue::Int(1)]));

    assert!(h.wait_stopped());
    assert_eq!(h.journal.executed(), vec![0, 0, 1]);
    assert_eq!(
        provider.solved(),
        vec![(false, "5".to_string()), (true, "1".to_string())]
    );
    assert_eq!(provider.results(), vec![ExamResult::Succeeded]);
    assert_eq!(
        provider.calls(),
        vec!["begin_exam", "before_processing(Some(0))", "end_exam(false)"]
    );
    assert_eq!(*q.after_requests.lock(), vec![false, false]);
    assert!(!q.exercise.is_processing());
}

#[test]
fn test_give_up_fails_without_retry() {
    let q = Question::new("Value after step 1?");
    let (h, provider) = exam(counter_with_exercise(3, 1, &q.exercise));

    h.rte.start(StartOption::Normal).unwrap();
    assert!(q.wait_for_request(1));
    assert!(q.exercise.give_up());

    assert!(h.wait_stopped());
    assert_eq!(h.journal.executed(), vec![0, 1, 2]);
    assert!(h.journal.rollbacks().is_empty());
    assert_eq!(provider.results(), vec![ExamResult::Failed]);
    assert!(provider.solved().is_empty());
    assert_eq!(*q.after_requests.lock(), vec![true]);
}

#[test]
fn test_control_is_locked_during_exam() {
    let q = Question::new("Value after step 0?");
    let (h, _provider) = exam(counter_with_exercise(2, 0, &q.exercise));

    h.rte.start(StartOption::Normal).unwrap();
    assert!(q.wait_for_request(1));

    assert!(matches!(
        h.rte.set_exercise_mode_enabled(false),
        Err(RteError::AlreadyStarted)
    ));
    assert!(!h.rte.pause());
    assert!(!h.rte.next_step());
    assert!(!h.rte.prev_step());
    assert_eq!(h.rte.start(StartOption::Normal).unwrap(), false);

    assert!(q.exercise.give_up());
    assert!(h.wait_stopped());
    assert!(h.rte.is_exercise_mode_enabled());
}

#[test]
fn test_stop_while_waiting_for_answer() {
    let q = Question::new("Value after step 0?");
    let (h, provider) = exam(counter_with_exercise(2, 0, &q.exercise));

    h.rte.start(StartOption::Normal).unwrap();
    assert!(q.wait_for_request(1));
    assert!(h.rte.stop());

    assert!(h.wait_stopped());
    assert!(h.journal.executed().is_empty());
    assert_eq!(*q.after_requests.lock(), vec![true]);
    assert_eq!(provider.results(), vec![ExamResult::Failed]);
    assert_eq!(provider.calls().last().map(String::as_str), Some("end_exam(true)"));
    assert!(!q.exercise.is_processing());
}

#[test]
fn test_final_exercise_after_natural_end() {
    let q = Question::new("Final value?");
    let mut counter = Counter::new(3);
    counter.exercises = true;
    counter.final_exercise = Some(Arc::clone(&q.exercise));
    let (h, provider) = exam(counter);

    h.rte.start(StartOption::Normal).unwrap();
    assert!(q.wait_for_request(1));
    assert_eq!(h.journal.executed(), vec![0, 1, 2]);
    assert!(q.exercise.solve(vec![StateValue::Int(3)]));

    assert!(h.wait_stopped());
    assert_eq!(provider.results(), vec![ExamResult::Succeeded]);
    assert_eq!(
        provider.calls(),
        vec!["begin_exam", "before_processing(None)", "end_exam(false)"]
    );
}

#[test]
fn test_final_exercise_skipped_after_stop() {
    let q = Question::new("Final value?");
    let mut counter = Counter::new(1);
    counter.exercises = true;
    counter.sleep_ms = 10_000;
    counter.final_exercise = Some(Arc::clone(&q.exercise));
    let (h, provider) = exam(counter);

    h.rte.start(StartOption::Normal).unwrap();
    assert!(wait(|| !h.journal.executed().is_empty()));
    assert!(h.rte.stop());

    assert!(h.wait_stopped());
    assert!(provider.results().is_empty());
    assert_eq!(provider.calls(), vec!["begin_exam", "end_exam(true)"]);
}

#[test]
fn test_solution_applied_before_execution() {
    let exercise = Arc::new(Exercise::new("Continue from?", 1, SetValueQuestion::default()));
    let (h, provider) = exam(counter_with_exercise(3, 1, &exercise));

    h.rte.start(StartOption::Normal).unwrap();
    assert!(wait(|| exercise.is_processing() && h.rte.executing_step().get() == 1));
    // Wait until the runtime is blocked on the answer
    assert!(wait(|| provider.calls().len() == 2));
    assert!(exercise.solve(vec![StateValue::Int(10)]));

    assert!(h.wait_stopped());
    assert_eq!(*h.journal.adopted.lock(), vec![10]);
    assert_eq!(provider.results(), vec![ExamResult::Succeeded]);
    assert_eq!(h.journal.executed(), vec![0, 1, 2]);
}

/// A "continue from" exercise on step 1 of a 3-step counter, with its request count
fn continue_from_exercise() -> (Arc<Exercise>, Arc<AtomicUsize>) {
    let logic = SetValueQuestion::default();
    let requests = Arc::clone(&logic.requests);
    (Arc::new(Exercise::new("Continue from?", 1, logic)), requests)
}

#[test]
fn test_rejected_solution_is_rolled_back_before_retry() {
    let (exercise, requests) = continue_from_exercise();
    let (h, provider) = exam(counter_with_exercise(3, 1, &exercise));

    h.rte.start(StartOption::Normal).unwrap();
    assert!(wait(|| requests.load(Ordering::SeqCst) >= 1));
    assert!(exercise.solve(vec![StateValue::Int(-1)]));

    // The step ran without the rejected value and was undone
    assert!(wait(|| requests.load(Ordering::SeqCst) >= 2));
    assert_eq!(h.journal.executed(), vec![0, 1]);
    assert_eq!(h.journal.rollbacks(), vec![(1, 2)]);
    assert_eq!(h.journal.last_restored(), Some(1));
    assert!(h.journal.adopted.lock().is_empty());

    assert!(exercise.solve(vec![StateValue::Int(10)]));
    assert!(h.wait_stopped());
    assert_eq!(*h.journal.adopted.lock(), vec![10]);
    assert_eq!(h.journal.executed(), vec![0, 1, 1, 2]);
    assert_eq!(provider.results(), vec![ExamResult::Succeeded]);
    let verdicts: Vec<bool> = provider.solved().iter().map(|(ok, _)| *ok).collect();
    assert_eq!(verdicts, vec![false, true]);
}

#[test]
fn test_given_up_solution_is_not_adopted() {
    let (exercise, requests) = continue_from_exercise();
    let (h, provider) = exam(counter_with_exercise(3, 1, &exercise));

    h.rte.start(StartOption::Normal).unwrap();
    assert!(wait(|| requests.load(Ordering::SeqCst) >= 1));
    assert!(exercise.give_up());

    assert!(h.wait_stopped());
    assert_eq!(h.journal.executed(), vec![0, 1, 2]);
    assert!(h.journal.rollbacks().is_empty());
    assert!(h.journal.adopted.lock().is_empty());
    assert_eq!(provider.results(), vec![ExamResult::Failed]);
    assert!(provider.solved().is_empty());
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[test]
fn test_exercise_mode_binds_provider_and_host() {
    let q = Question::new("unused");
    let (h, provider) = exam(counter_with_exercise(1, 0, &q.exercise));
    assert!(h.rte.is_exercise_mode_enabled());
    assert_eq!(provider.owner.lock().as_deref(), Some(common::PLUGIN));
    assert!(provider.is_visible());
    assert_eq!(
        h.host.last_exercise_mode(),
        Some((common::PLUGIN.to_string(), true))
    );

    // Unchanged mode is a no-op
    assert_eq!(h.rte.set_exercise_mode_enabled(true).unwrap(), false);

    assert_eq!(h.rte.set_exercise_mode_enabled(false).unwrap(), true);
    assert_eq!(*provider.owner.lock(), None);
    assert!(!provider.is_visible());
    assert_eq!(
        h.host.last_exercise_mode(),
        Some((common::PLUGIN.to_string(), false))
    );
}

#[test]
fn test_exercise_mode_needs_support() {
    let h = Harness::new(Counter::new(1));
    assert_eq!(h.rte.set_exercise_mode_enabled(true).unwrap(), false);
    assert!(!h.rte.is_exercise_mode_enabled());
}
