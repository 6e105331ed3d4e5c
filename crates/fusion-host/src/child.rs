//! Launching the child interpreter.

use fusion_env::{EnvPlan, Layout, Profile};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum ChildError {
    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to wait for child: {0}")]
    Wait(std::io::Error),
}

/// Everything needed to start the child process.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Applied on top of the inherited environment, in order.
    pub env: EnvPlan,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// `<python_exe> <entry_script> <profile args...>`, run from the install root.
    pub fn for_layout(layout: &Layout, profile: &Profile, env: EnvPlan) -> Self {
        let mut args = vec![layout.entry_script.clone().into_os_string()];
        args.extend(profile.app.args.iter().map(OsString::from));
        Self {
            program: layout.python_exe.clone(),
            args,
            env,
            current_dir: Some(layout.root.clone()),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (name, value) in self.env.iter() {
            cmd.env(name, value);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Start the child with inherited stdio and wait for it to exit.
///
/// The environment plan reaches the child only. An interrupt while the
/// child runs is logged and otherwise ignored: the console delivers it to
/// the child as well, and the launcher keeps waiting for it to exit.
pub async fn run(spec: &CommandSpec) -> Result<ExitStatus, ChildError> {
    let mut child = spec.command().spawn().map_err(|source| ChildError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    tracing::info!(
        pid = ?child.id(),
        program = %spec.program.display(),
        args = ?spec.args,
        "child started"
    );

    loop {
        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(ChildError::Wait)?;
                tracing::info!(%status, "child exited");
                return Ok(status);
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    tracing::warn!(error = %err, "cannot listen for interrupts");
                    let status = child.wait().await.map_err(ChildError::Wait)?;
                    tracing::info!(%status, "child exited");
                    return Ok(status);
                }
                tracing::info!("interrupt received; waiting for child to exit");
            }
        }
    }
}
