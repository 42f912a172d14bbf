//! Process launcher specs
//!
//! Resolution, spawn failures, argument forwarding, output streaming.

use crate::prelude::*;

#[test]
fn unknown_job_fails_without_touching_the_session_machinery() {
    let temp = Project::empty();

    temp.startjob("ghost")
        .fails_with(127)
        .stderr_has("no such job");

    // No coordinator, no build number, no session artifacts.
    assert!(temp.sockets().is_empty());
    assert!(temp.session_files("json").is_empty());
    assert!(temp.ledger("ghost").is_none());
}

#[test]
fn a_job_without_its_script_is_a_resolution_failure() {
    let temp = Project::empty();
    temp.file("jobs/broken/job.toml", "script = \"missing.sh\"\n");

    temp.startjob("broken")
        .fails_with(127)
        .stderr_has("missing.sh");

    assert!(temp.ledger("broken").is_none());
}

#[test]
fn an_invalid_job_spec_is_a_resolution_failure() {
    let temp = Project::empty();
    temp.file("jobs/broken/job.toml", "no_script_field = true\n");

    temp.startjob("broken").fails_with(127);
}

#[test]
fn a_non_executable_script_is_a_spawn_failure() {
    let temp = Project::empty();
    temp.job("root", "true");
    // Strip the execute bit the fixture set.
    let script = temp.base().join("jobs/root/script.sh");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o644);
        std::fs::set_permissions(&script, perms).unwrap();
    }

    temp.startjob("root")
        .fails_with(126)
        .stderr_has("failed to spawn");
}

#[test]
fn caller_arguments_are_forwarded_to_the_script() {
    let temp = Project::empty();
    temp.job("root", r#"echo "got: $1 $2""#);

    temp.startjob("root")
        .args(&["alpha", "beta"])
        .passes()
        .stdout_has("got: alpha beta");
}

#[test]
fn job_stdout_is_streamed_line_by_line() {
    let temp = Project::empty();
    temp.job("root", "echo one\necho two\necho three");

    let out = temp.startjob("root").passes();
    let stdout = out.stdout();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["one", "two", "three"]);
}

#[test]
fn nested_job_output_reaches_the_root_invocation() {
    let temp = Project::empty();
    temp.job("root", r#"echo before; "$STINT_STARTJOB" inner; echo after"#);
    temp.job("inner", "echo from the inside");

    let out = temp.startjob("root").passes();
    let stdout = out.stdout();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["before", "from the inside", "after"]);
}

#[test]
fn startjob_without_arguments_is_a_usage_error() {
    let temp = Project::empty();

    temp.startjob("").fails_with(127);
    temp.tool("startjob").fails_with(2);
}

#[test]
fn startjob_needs_a_base_dir() {
    let temp = Project::empty();
    temp.job("root", "true");

    temp.startjob("root")
        .env_remove("STINT_BASE_DIR")
        .fails_with(2)
        .stderr_has("STINT_BASE_DIR");
}
