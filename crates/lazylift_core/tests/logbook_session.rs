use lazylift_core::{record_workout, LogbookWorkout, NameMode, Prompter, SessionError};
use std::io::Cursor;

fn run(script: &str, mode: NameMode) -> (Result<LogbookWorkout, SessionError>, String) {
    let mut prompter = Prompter::new(Cursor::new(script.to_string()), Vec::new());
    let result = record_workout(&mut prompter, mode);
    let (_, output) = prompter.into_parts();
    (result, String::from_utf8(output).expect("utf-8 transcript"))
}

#[test]
fn strict_mode_records_until_blank_line() {
    let (result, output) = run(
        "squat\n100\n5\nDeadlift\n142.5\n3\n\nbench press\n80\n8\n",
        NameMode::Strict,
    );
    let workout = result.expect("strict session should succeed");

    assert_eq!(workout.exercises.len(), 2);
    assert_eq!(workout.exercises[1].name, "deadlift");
    assert_eq!(workout.exercises[1].weight, 142.5);
    assert!(workout
        .to_string()
        .ends_with("exercises=[squat 100 × 5, deadlift 142.5 × 3])"));
    assert_eq!(output.matches("exercise name? ").count(), 3);
    assert_eq!(output.matches("weight? ").count(), 2);
}

#[test]
fn quit_and_end_of_input_both_stop_the_loop() {
    let (result, _) = run("bench press\n60\n10\nquit\n", NameMode::Strict);
    let workout = result.expect("quit should end the session cleanly");
    assert_eq!(workout.exercises.len(), 1);

    let (result, _) = run("", NameMode::Strict);
    assert!(result.expect("empty session").is_empty());
}

#[test]
fn only_lowercase_quit_is_a_stop_word() {
    let (result, _) = run("bench press\n60\n10\nQUIT\n", NameMode::Strict);
    match result {
        Err(SessionError::UnknownExercise(name)) => assert_eq!(name, "QUIT"),
        other => panic!("unexpected result: {other:?}"),
    }

    let (result, output) = run("Quit\nquit\n", NameMode::Abbreviated);
    assert!(result.expect("abbreviated session").is_empty());
    assert!(output.contains("no match for `Quit`"));
}

#[test]
fn strict_mode_aborts_on_unknown_name() {
    let (result, output) = run("squat\n100\n5\nsq\n", NameMode::Strict);
    match result {
        Err(SessionError::UnknownExercise(name)) => assert_eq!(name, "sq"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(output.matches("exercise name? ").count(), 2);
}

#[test]
fn abbreviated_mode_reasks_until_unique() {
    let (result, output) = run("x\n\n", NameMode::Abbreviated);
    assert!(result.expect("blank line should stop").is_empty());
    assert!(output.contains("no match for `x`; expected one of: squat, bench press, deadlift"));

    let (result, output) = run("zz\nb\n60\n12\nd\n180\n1\nquit\n", NameMode::Abbreviated);
    let workout = result.expect("abbreviated session should succeed");
    let names = workout
        .exercises
        .iter()
        .map(|exercise| exercise.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["bench press", "deadlift"]);
    assert_eq!(output.matches("no match for `zz`").count(), 1);
}

#[test]
fn bad_numbers_end_the_session() {
    let (result, _) = run("squat\nheavy\n", NameMode::Strict);
    assert!(matches!(
        result.expect_err("session should fail"),
        SessionError::InvalidNumber {
            field: "weight",
            ..
        }
    ));

    let (result, _) = run("squat\n100\n-5\n", NameMode::Strict);
    assert!(matches!(
        result.expect_err("session should fail"),
        SessionError::InvalidNumber { field: "reps", .. }
    ));

    let (result, _) = run("squat\n-100\n", NameMode::Strict);
    assert!(matches!(
        result.expect_err("session should fail"),
        SessionError::InvalidNumber {
            field: "weight",
            ..
        }
    ));

    let (result, _) = run("squat\n100\n", NameMode::Strict);
    assert!(matches!(
        result.expect_err("session should fail"),
        SessionError::UnexpectedEof { field: "reps" }
    ));
}
