//! Shell command execution.
//!
//! [`Executor`] is the seam to the host: it runs one already-rendered command
//! line through `sh -c` and reports the exit status. [`CommandRunner`] layers
//! template rendering and first-failure-aborts sequencing on top of it.
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{CommandError, GeneError, PlatformError};
use crate::logging::Log;
use crate::platform::Platform;
use crate::template::{self, Policy, Variables};

/// Shell used to interpret commands.
pub const SHELL: &str = "sh";

/// Runs a single rendered command line on the host.
pub trait Executor {
    /// Run `command`, wait for it to exit, and return its exit status.
    ///
    /// Standard streams are inherited so output is visible in real time.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    fn run_shell(&self, command: &str) -> std::io::Result<i32>;
}

/// Production [`Executor`] that spawns `sh -c <command>`.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    shell: PathBuf,
}

impl SystemExecutor {
    /// Locate [`SHELL`] on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::ShellNotFound`] if no shell is available.
    pub fn locate() -> Result<Self, PlatformError> {
        which::which(SHELL)
            .map(|shell| Self { shell })
            .map_err(|_| PlatformError::ShellNotFound(SHELL.to_string()))
    }

    /// Locate [`SHELL`] for `platform`, rejecting non-POSIX hosts first.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] when the host is not POSIX,
    /// whether or not a shell happens to be on `PATH`, and
    /// [`PlatformError::ShellNotFound`] otherwise if no shell is available.
    pub fn for_host(platform: &Platform) -> Result<Self, PlatformError> {
        ensure_posix(platform)?;
        Self::locate()
    }
}

/// Fail with [`PlatformError::Unsupported`] unless `platform` is POSIX.
fn ensure_posix(platform: &Platform) -> Result<(), PlatformError> {
    if platform.is_posix() {
        Ok(())
    } else {
        Err(PlatformError::Unsupported {
            platform: platform.os.to_string(),
        })
    }
}

impl Executor for SystemExecutor {
    fn run_shell(&self, command: &str) -> std::io::Result<i32> {
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// Renders command templates and runs them through an [`Executor`].
pub struct CommandRunner<'a> {
    executor: &'a dyn Executor,
    policy: Policy,
    log: &'a dyn Log,
}

impl std::fmt::Debug for CommandRunner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner")
            .field("executor", &"<dyn Executor>")
            .field("policy", &self.policy)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl<'a> CommandRunner<'a> {
    /// Create a runner for `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] when the host is not POSIX.
    pub fn new(
        platform: &Platform,
        executor: &'a dyn Executor,
        policy: Policy,
        log: &'a dyn Log,
    ) -> Result<Self, PlatformError> {
        ensure_posix(platform)?;
        Ok(Self {
            executor,
            policy,
            log,
        })
    }

    /// Render `template` against `vars` without running it.
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder cannot be resolved.
    pub fn render(&self, template: &str, vars: &Variables) -> Result<String, GeneError> {
        Ok(template::render(template, vars, self.policy)?)
    }

    /// Render and run one command, returning its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the shell cannot be spawned.
    /// A nonzero exit status is not an error here.
    pub fn execute_command(&self, template: &str, vars: &Variables) -> Result<i32, GeneError> {
        let command = self.render(template, vars)?;
        self.log.debug(&format!("$ {command}"));
        let code = self
            .executor
            .run_shell(&command)
            .map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;
        self.log.debug(&format!("exit {code}: {command}"));
        Ok(code)
    }

    /// Run `templates` in order, stopping at the first nonzero exit status.
    ///
    /// Commands after the failing one are never run. An empty sequence is a
    /// successful no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Failed`] naming the failing command and its
    /// status, or any rendering/spawn error.
    pub fn execute_commands(&self, templates: &[String], vars: &Variables) -> Result<(), GeneError> {
        for template in templates {
            let code = self.execute_command(template, vars)?;
            if code != 0 {
                return Err(CommandError::Failed {
                    command: template.clone(),
                    code,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    mockall::mock! {
        pub Shell {}

        impl super::Executor for Shell {
            fn run_shell(&self, command: &str) -> std::io::Result<i32>;
        }
    }
}
