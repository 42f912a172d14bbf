//! Build numbering specs
//!
//! Six-digit, strictly increasing per job name, durable across sessions.

use crate::prelude::*;

#[test]
fn build_numbers_start_at_one_and_increase_across_sessions() {
    let temp = Project::empty();
    temp.job("root", r#"echo "build=$STINT_BUILD""#);

    temp.startjob("root").passes().stdout_has("build=000001");
    temp.startjob("root").passes().stdout_has("build=000002");
    temp.startjob("root").passes().stdout_has("build=000003");
}

#[test]
fn build_numbers_are_always_exactly_six_digits() {
    let temp = Project::empty();
    temp.job("root", r#"printf '%s' "$STINT_BUILD" | wc -c"#);

    let out = temp.startjob("root").passes();
    assert_eq!(out.stdout().trim(), "6");
}

#[test]
fn jobs_count_independently() {
    let temp = Project::empty();
    temp.job("a", r#"echo "a=$STINT_BUILD""#);
    temp.job("b", r#"echo "b=$STINT_BUILD""#);

    temp.startjob("a").passes().stdout_has("a=000001");
    temp.startjob("a").passes().stdout_has("a=000002");
    temp.startjob("b").passes().stdout_has("b=000001");
}

#[test]
fn nested_builds_allocate_from_the_same_ledger() {
    let temp = Project::empty();
    temp.job("root", r#""$STINT_STARTJOB" root2"#);
    temp.job("root2", r#"echo "inner build=$STINT_BUILD""#);

    temp.startjob("root")
        .passes()
        .stdout_has("inner build=000001");

    assert_eq!(temp.ledger("root").unwrap().trim(), "1");
    assert_eq!(temp.ledger("root2").unwrap().trim(), "1");
}

#[test]
fn each_build_gets_its_own_directory_with_an_exit_code() {
    let temp = Project::empty();
    temp.job("root", "exit 0");

    temp.startjob("root").passes();

    let exitcode = temp
        .base()
        .join("jobs/root/000001/exitcode.txt");
    assert_eq!(std::fs::read_to_string(exitcode).unwrap().trim(), "0");
}

#[test]
fn the_job_runs_inside_its_build_directory() {
    let temp = Project::empty();
    temp.job("root", "basename \"$(pwd)\"");

    temp.startjob("root").passes().stdout_has("000001");
}

#[test]
fn a_broken_ledger_is_fatal_to_the_launch() {
    let temp = Project::empty();
    temp.job("root", "true");
    temp.file("jobs/root/.next_build", "garbage");

    temp.startjob("root")
        .fails_with(6)
        .stderr_has("corrupt");
}

#[test]
fn an_exhausted_ledger_is_fatal_not_wrapped() {
    let temp = Project::empty();
    temp.job("root", "true");
    temp.file("jobs/root/.next_build", "999999");

    temp.startjob("root")
        .fails_with(6)
        .stderr_has("six-digit");
}

#[test]
fn child_exit_codes_pass_through_verbatim() {
    let temp = Project::empty();
    temp.job("root", "exit 7");

    temp.startjob("root").fails_with(7);

    let exitcode = temp.base().join("jobs/root/000001/exitcode.txt");
    assert_eq!(std::fs::read_to_string(exitcode).unwrap().trim(), "7");
}
