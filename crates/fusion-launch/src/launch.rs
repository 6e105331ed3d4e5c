use crate::config::Config;
use anyhow::{Context, Result};
use fusion_env::{EnvPlan, Layout, Profile};
use fusion_host::{child, console, CommandSpec, Pause};
use std::process::ExitStatus;

/// Exit code when the child could not be started or reported no code.
const FAILURE_EXIT_CODE: i32 = 1;

/// A fully prepared launch: nothing has touched the console or spawned yet.
pub struct Launch {
    profile: Profile,
    layout: Layout,
    spec: CommandSpec,
}

impl Launch {
    /// Resolve the profile, layout and environment plan for `config`.
    pub fn prepare(config: &Config) -> Result<Self> {
        let profile = match &config.profile_path {
            Some(path) => Profile::load(path)
                .with_context(|| format!("loading profile {}", path.display()))?,
            None => Profile::embedded().context("loading embedded profile")?,
        };

        let layout = Layout::resolve(&config.root, &profile);
        let env = EnvPlan::build(&layout, config.system_root.as_deref())
            .context("building child environment")?;

        for (name, value) in env.iter() {
            tracing::debug!(name, value = %value.to_string_lossy(), "env");
        }

        let spec = CommandSpec::for_layout(&layout, &profile, env);
        Ok(Self {
            profile,
            layout,
            spec,
        })
    }

    /// Set up the console, run the child to completion, then pause.
    ///
    /// Always reaches the pause. Returns the exit code the launcher should
    /// exit with: the child's own, or 1 if it could not be started.
    pub async fn execute(&self, pause: Box<dyn Pause + Send>) -> i32 {
        console::set_utf8_code_page();

        for missing in self.layout.missing() {
            if missing.required {
                tracing::warn!(path = %missing.path.display(), "{} not found", missing.name);
            } else {
                tracing::info!(path = %missing.path.display(), "{} not found", missing.name);
            }
        }

        for line in &self.profile.console.status {
            println!("{line}");
        }

        let code = match child::run(&self.spec).await {
            Ok(status) => exit_code(status),
            Err(err) => {
                tracing::error!(error = %err, "launch failed");
                eprintln!("{err}");
                FAILURE_EXIT_CODE
            }
        };

        console::pause_until(pause, tokio::signal::ctrl_c()).await;
        code
    }

    /// JSON description of what would be launched.
    pub fn describe(&self) -> Result<serde_json::Value> {
        let env: Vec<_> = self
            .spec
            .env
            .iter()
            .map(|(name, value)| {
                serde_json::json!({ "name": name, "value": value.to_string_lossy() })
            })
            .collect();
        let args: Vec<_> = self.spec.args.iter().map(|a| a.to_string_lossy()).collect();

        Ok(serde_json::json!({
            "app": self.profile.display_name(),
            "program": self.spec.program.to_string_lossy(),
            "args": args,
            "current_dir": self.spec.current_dir.as_ref().map(|d| d.to_string_lossy()),
            "env": env,
            "layout": serde_json::to_value(&self.layout).context("serializing layout")?,
            "profile": serde_json::to_value(&self.profile).context("serializing profile")?,
        }))
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(FAILURE_EXIT_CODE)
}
