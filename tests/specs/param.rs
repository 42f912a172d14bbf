//! Param handoff specs
//!
//! Parameters travel exactly one hop: from the invocation that staged
//! them to the next child it launches, with job.toml defaults filling
//! whatever the parent left unset.

use crate::prelude::*;

const CHILD_SPEC: &str = r#"script = "script.sh"

[params]
prm1 = "\"why?\""
prm2 = "default two"
prm3 = "default three"
"#;

#[test]
fn unset_param_resolves_to_its_configured_default() {
    let temp = Project::empty();
    temp.job("root", r#""$STINT_STARTJOB" child"#);
    temp.job_with_spec("child", CHILD_SPEC, r#""$STINT_GETPARAM" prm1"#);

    temp.startjob("root").passes().stdout_has("\"why?\"");
}

#[test]
fn param_set_before_startjob_reaches_the_child() {
    let temp = Project::empty();
    temp.job(
        "root",
        r#""$STINT_SETPARAM" prm2 "set by root"
"$STINT_STARTJOB" child"#,
    );
    temp.job_with_spec("child", CHILD_SPEC, r#""$STINT_GETPARAM" prm2"#);

    temp.startjob("root")
        .passes()
        .stdout_has("set by root")
        .stdout_lacks("default two");
}

#[test]
fn undeclared_params_still_reach_the_child() {
    let temp = Project::empty();
    temp.job(
        "root",
        r#""$STINT_SETPARAM" extra "not in job.toml"
"$STINT_STARTJOB" child"#,
    );
    temp.job("child", r#""$STINT_GETPARAM" extra"#);

    temp.startjob("root")
        .passes()
        .stdout_has("not in job.toml");
}

#[test]
fn params_do_not_leak_across_two_hops() {
    let temp = Project::empty();
    temp.job(
        "root",
        r#""$STINT_SETPARAM" secret "grandparent only"
"$STINT_STARTJOB" middle"#,
    );
    // middle does not re-stage `secret`
    temp.job("middle", r#""$STINT_STARTJOB" leaf"#);
    temp.job(
        "leaf",
        r#""$STINT_GETPARAM" secret || echo "secret not visible""#,
    );

    temp.startjob("root")
        .passes()
        .stdout_has("secret not visible")
        .stdout_lacks("grandparent only");
}

#[test]
fn a_param_is_scoped_to_one_launch_even_for_the_same_parent() {
    let temp = Project::empty();
    temp.job(
        "root",
        r#""$STINT_SETPARAM" once "first launch only"
"$STINT_STARTJOB" child
"$STINT_STARTJOB" child"#,
    );
    temp.job(
        "child",
        r#""$STINT_GETPARAM" once || echo "nothing staged""#,
    );

    temp.startjob("root")
        .passes()
        .stdout_has("first launch only")
        .stdout_has("nothing staged");
}

#[test]
fn setparam_does_not_affect_the_callers_own_params() {
    let temp = Project::empty();
    temp.job("root", r#""$STINT_STARTJOB" child"#);
    temp.job_with_spec(
        "child",
        CHILD_SPEC,
        r#""$STINT_SETPARAM" prm1 "for my child, not me"
"$STINT_GETPARAM" prm1"#,
    );

    temp.startjob("root")
        .passes()
        .stdout_has("\"why?\"")
        .stdout_lacks("for my child");
}

#[test]
fn missing_param_is_a_distinct_status() {
    let temp = Project::empty();
    temp.job(
        "root",
        r#""$STINT_GETPARAM" undefined
echo "code=$?""#,
    );

    temp.startjob("root").passes().stdout_has("code=5");
}

#[test]
fn getparam_outside_a_session_is_a_usage_error() {
    let temp = Project::empty();

    temp.tool("getparam")
        .args(&["prm1"])
        .fails_with(2)
        .stderr_has("STINT_ENDPOINT");
}

#[test]
fn full_param_value_round_trip() {
    // The end-to-end scenario: root stages prm2/prm3, the child reads
    // prm1 (default), prm2, prm3 and publishes them as values, and the
    // root reads the values back after the child exited.
    let temp = Project::empty();
    temp.job(
        "root",
        r#""$STINT_SETPARAM" prm2 "two from root"
"$STINT_SETPARAM" prm3 "three from root"
"$STINT_STARTJOB" child
echo "prm1=$("$STINT_GETVALUE" prm1)"
echo "prm2=$("$STINT_GETVALUE" prm2)"
echo "prm3=$("$STINT_GETVALUE" prm3)""#,
    );
    temp.job_with_spec(
        "child",
        CHILD_SPEC,
        r#""$STINT_SETVALUE" prm1 "$("$STINT_GETPARAM" prm1)"
"$STINT_SETVALUE" prm2 "$("$STINT_GETPARAM" prm2)"
"$STINT_SETVALUE" prm3 "$("$STINT_GETPARAM" prm3)""#,
    );

    temp.startjob("root")
        .passes()
        .stdout_has("prm1=\"why?\"")
        .stdout_has("prm2=two from root")
        .stdout_has("prm3=three from root");
}
