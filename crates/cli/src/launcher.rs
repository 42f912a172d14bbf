// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process launcher behind `startjob`.
//!
//! The launcher is the only entry point that creates sessions and
//! builds. A root invocation (no inherited endpoint) creates the session
//! and hosts the coordinator in-process until its job exits; a nested
//! invocation joins the inherited session. Either way the job identifier
//! must resolve before any session machinery is touched, so an
//! unresolvable job never contacts the coordinator or burns a build
//! number.

use std::collections::BTreeMap;
use std::path::PathBuf;

use stint_core::{
    base_dir_from_lookup, BuildId, IdGen, InheritedSession, Job, JobError, Layout, Role, RunSpec,
    Runner, RunnerError, SessionContext, SessionId, ToolPaths,
};
use stint_coordinator::{Config, Coordinator, CoordinatorHandle};
use stint_storage::Ledger;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::CoordinatorClient;
use crate::exit::{ExitError, EXIT_COORDINATOR, EXIT_LEDGER, EXIT_NO_SUCH_JOB, EXIT_SPAWN};
use crate::logging;

pub struct Launcher<R: Runner, I: IdGen> {
    runner: R,
    ids: I,
}

/// The session a launch runs under, after inherit-or-create.
struct SessionEnv {
    endpoint: PathBuf,
    session_id: SessionId,
    role: Role,
    /// Build whose script invoked us; `None` for the root invocation
    parent_build: Option<BuildId>,
    tools: ToolPaths,
}

impl<R: Runner, I: IdGen> Launcher<R, I> {
    pub fn new(runner: R, ids: I) -> Self {
        Self { runner, ids }
    }

    /// Launch a job and return its exit code.
    pub async fn run(&self, job_name: &str, args: &[String]) -> Result<i32, ExitError> {
        self.run_from(job_name, args, |var| std::env::var(var).ok())
            .await
    }

    /// [`Launcher::run`] with an explicit environment source.
    pub async fn run_from(
        &self,
        job_name: &str,
        args: &[String],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<i32, ExitError> {
        let inherited = InheritedSession::from_lookup(&lookup)?;

        let base_dir = match &inherited {
            Some(session) => session.base_dir.clone(),
            None => base_dir_from_lookup(&lookup)?,
        };
        let layout = Layout::new(base_dir);

        // Resolve before anything session-shaped happens.
        let job = Job::resolve(&layout, job_name).map_err(resolution_error)?;

        let (env, coordinator, _log_guard) = match inherited {
            Some(session) => {
                logging::init_stderr();
                let env = SessionEnv {
                    endpoint: session.endpoint,
                    session_id: session.session_id,
                    role: Role::Participant,
                    parent_build: Some(session.parent_build),
                    tools: session.tools,
                };
                (env, None, None)
            }
            None => {
                let session_id = self.ids.session_id();
                let guard = logging::init_session_log(&layout.session_log_path(&session_id))
                    .map_err(|e| internal_error(format!("cannot open session log: {e}")))?;

                let config = Config::for_session(session_id.clone(), &layout);
                let handle = Coordinator::start(config)
                    .await
                    .map_err(|e| ExitError::new(EXIT_COORDINATOR, e.to_string()))?;

                let env = SessionEnv {
                    endpoint: handle.endpoint().to_path_buf(),
                    session_id,
                    role: Role::Owner,
                    parent_build: None,
                    tools: ToolPaths::resolve()?,
                };
                (env, Some(handle), Some(guard))
            }
        };

        info!(
            session = %env.session_id,
            job = %job.name,
            role = env.role.as_env_str(),
            "starting job"
        );

        let outcome = self.launch(&layout, &job, args, &env).await;

        // The owner tears the session down once its job tree is done.
        if let Some(handle) = coordinator {
            close_session(handle).await;
        }

        outcome
    }

    async fn launch(
        &self,
        layout: &Layout,
        job: &Job,
        args: &[String],
        env: &SessionEnv,
    ) -> Result<i32, ExitError> {
        // A build cannot proceed without a number; ledger failures are fatal.
        let number = Ledger::new(layout.clone())
            .next(&job.name)
            .map_err(|e| ExitError::new(EXIT_LEDGER, e.to_string()))?;
        let build = BuildId::new(job.name.clone(), number);

        let client = CoordinatorClient::new(&env.endpoint);

        // Joining an existing session: handshake before doing real work.
        if !env.role.is_owner() {
            let version = client.hello().await?;
            if version != env!("CARGO_PKG_VERSION") {
                warn!(
                    coordinator = %version,
                    client = env!("CARGO_PKG_VERSION"),
                    "version mismatch with session coordinator"
                );
            }
        }

        // Parameter table fixed at launch: configured defaults, overlaid
        // by whatever the parent staged since its own launch.
        let mut params = job.spec.params.clone();
        if let Some(parent) = &env.parent_build {
            let staged: BTreeMap<String, String> = client.take_params(parent).await?;
            params.extend(staged);
        }
        client.open_build(&build, params).await?;

        // The script runs on its own copy inside the build directory.
        let build_dir = layout.build_dir(&build);
        std::fs::create_dir_all(&build_dir).map_err(internal_error)?;
        let script = build_dir.join(&job.spec.script);
        std::fs::copy(job.script_path(), &script).map_err(internal_error)?;

        let ctx = SessionContext {
            endpoint: env.endpoint.clone(),
            session_id: env.session_id.clone(),
            role: env.role,
            base_dir: layout.base().to_path_buf(),
            build: build.clone(),
            tools: env.tools.clone(),
        };

        let spec = RunSpec {
            program: script,
            args: args.to_vec(),
            cwd: build_dir.clone(),
            env: ctx.env_vars(),
        };

        // Stream the job's stdout through as it is produced.
        let (tx, mut rx) = mpsc::channel::<String>(64);
        let printer = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                println!("{line}");
            }
        });

        let run = self.runner.run(spec, tx).await;
        let _ = printer.await;

        let exit_code = match run {
            Ok(code) => code,
            Err(e @ RunnerError::Spawn { .. }) => {
                return Err(ExitError::new(EXIT_SPAWN, e.to_string()))
            }
            Err(e) => return Err(internal_error(e)),
        };

        std::fs::write(build_dir.join("exitcode.txt"), format!("{exit_code}\n"))
            .map_err(internal_error)?;
        client.close_build(&build, exit_code).await?;

        info!(build = %build, exit_code, "job finished");
        Ok(exit_code)
    }
}

async fn close_session(handle: CoordinatorHandle) {
    if let Err(e) = handle.close().await {
        warn!("failed to close session cleanly: {e}");
    }
}

fn resolution_error(e: JobError) -> ExitError {
    ExitError::new(EXIT_NO_SUCH_JOB, e.to_string())
}

fn internal_error(e: impl std::fmt::Display) -> ExitError {
    ExitError::new(1, e.to_string())
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
