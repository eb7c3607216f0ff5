//! Launch module
//!
//! Runs the installed game as a child process and classifies how it ended.
//! A run moves through `Idle → Starting → Running → Exited`, or stops at
//! `StartFailed` when the process never came up.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

/// How the launcher waits on the game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaitMode {
    /// Pipe stdout/stderr and collect them when the game exits
    #[default]
    Capture,
    /// Let the game share the launcher's terminal
    Inherit,
}

/// Observable progress of a single launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    Starting,
    Running { pid: u32 },
    Exited(i32),
    StartFailed,
}

/// Reasons the game could not be started or waited on
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to start process: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to wait for process: {0}")]
    Wait(#[source] io::Error),
}

/// Result of a launch attempt
#[derive(Debug)]
pub enum LaunchOutcome {
    /// Game ran and exited with code 0
    Launched,
    /// Game exited with a non-zero code
    Crashed { exit_code: i32 },
    /// Game never ran to completion
    LaunchFailed { cause: LaunchError },
}

/// Output collected in [`WaitMode::Capture`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Outcome plus whatever output was collected
#[derive(Debug)]
pub struct LaunchReport {
    pub outcome: LaunchOutcome,
    pub output: Option<CapturedOutput>,
}

impl LaunchReport {
    /// Last `lines` lines of captured stderr, if any was collected
    pub fn stderr_tail(&self, lines: usize) -> Option<String> {
        self.output
            .as_ref()
            .and_then(|o| stderr_tail(&o.stderr, lines))
    }
}

/// Process creation seam
pub trait ProcessSpawner {
    fn spawn(&self, command: &mut Command) -> io::Result<Child>;
}

/// Spawns real OS processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, command: &mut Command) -> io::Result<Child> {
        command.spawn()
    }
}

/// Game launcher
pub struct Launcher<S = SystemSpawner> {
    spawner: S,
    mode: WaitMode,
}

impl Launcher {
    pub fn new(mode: WaitMode) -> Self {
        Self::with_spawner(SystemSpawner, mode)
    }
}

impl<S: ProcessSpawner> Launcher<S> {
    pub fn with_spawner(spawner: S, mode: WaitMode) -> Self {
        Self { spawner, mode }
    }

    /// Run the game to completion and classify the result
    pub fn launch(&self, executable: &Path) -> LaunchOutcome {
        self.run(executable, |_| {}).outcome
    }

    /// Run the game to completion, reporting each state transition.
    ///
    /// Blocks for as long as the game runs.
    pub fn run<F>(&self, executable: &Path, mut on_state: F) -> LaunchReport
    where
        F: FnMut(&LaunchState),
    {
        let mut transition = |state: LaunchState| {
            tracing::debug!("Launch state: {:?}", state);
            on_state(&state);
        };
        transition(LaunchState::Idle);

        if !executable.is_file() {
            tracing::error!("Game executable not found: {:?}", executable);
            return LaunchReport {
                outcome: LaunchOutcome::LaunchFailed {
                    cause: LaunchError::NotFound(executable.to_path_buf()),
                },
                output: None,
            };
        }

        transition(LaunchState::Starting);

        // A bare file name would otherwise be looked up on PATH
        let program = match std::path::absolute(executable) {
            Ok(program) => program,
            Err(e) => {
                transition(LaunchState::StartFailed);
                return LaunchReport {
                    outcome: LaunchOutcome::LaunchFailed {
                        cause: LaunchError::Spawn(e),
                    },
                    output: None,
                };
            }
        };

        let mut cmd = Command::new(&program);
        match self.mode {
            WaitMode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
            WaitMode::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
        }

        tracing::info!("Launching game: {:?}", cmd);

        let child = match self.spawner.spawn(&mut cmd) {
            Ok(child) => child,
            Err(e) => {
                tracing::error!("Failed to start {:?}: {}", executable, e);
                transition(LaunchState::StartFailed);
                return LaunchReport {
                    outcome: LaunchOutcome::LaunchFailed {
                        cause: LaunchError::Spawn(e),
                    },
                    output: None,
                };
            }
        };

        transition(LaunchState::Running { pid: child.id() });

        let waited = match self.mode {
            WaitMode::Capture => child.wait_with_output().map(|output| {
                let captured = CapturedOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                (output.status, Some(captured))
            }),
            WaitMode::Inherit => {
                let mut child = child;
                child.wait().map(|status| (status, None))
            }
        };

        let (status, output) = match waited {
            Ok(waited) => waited,
            Err(e) => {
                tracing::error!("Lost track of game process: {}", e);
                return LaunchReport {
                    outcome: LaunchOutcome::LaunchFailed {
                        cause: LaunchError::Wait(e),
                    },
                    output: None,
                };
            }
        };

        let exit_code = exit_code(status);
        transition(LaunchState::Exited(exit_code));

        let outcome = if exit_code == 0 {
            tracing::info!("Game exited cleanly");
            LaunchOutcome::Launched
        } else {
            tracing::error!("Game crashed with exit code {}", exit_code);
            LaunchOutcome::Crashed { exit_code }
        };

        let report = LaunchReport { outcome, output };
        if matches!(report.outcome, LaunchOutcome::Crashed { .. }) {
            if let Some(tail) = report.stderr_tail(20) {
                tracing::warn!("Game stderr (tail):\n{}", tail);
            }
        }
        report
    }
}

/// Exit code, mapping death-by-signal to the shell's `128 + signal`
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

fn stderr_tail(stderr: &str, lines: usize) -> Option<String> {
    let all: Vec<&str> = stderr.lines().collect();
    if all.is_empty() {
        return None;
    }
    let start = all.len().saturating_sub(lines);
    Some(all[start..].join("\n"))
}
