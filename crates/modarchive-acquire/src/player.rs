use anyhow::{Context, Result};
use std::future::Future;
use std::path::Path;
use std::process::Stdio;

/// Module player used when none is configured.
pub const DEFAULT_PLAYER: &str = "openmpt123";

/// Plays a local audio file, returning once playback has finished.
pub trait Player {
    fn play(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Plays files by running an external program with the file as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Split a command line such as `mpv --no-video` into program and arguments.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace();
        let program = words
            .next()
            .with_context(|| format!("Player command '{command}' is empty"))?;
        Ok(Self {
            program: program.to_string(),
            args: words.map(str::to_string).collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER)
    }
}

impl Player for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<()> {
        tracing::debug!(program = %self.program, args = ?self.args, path = %path.display(), "Starting player");

        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("Failed to run player '{}'", self.program))?;

        anyhow::ensure!(
            status.success(),
            "Player '{}' exited with {status} while playing {}",
            self.program,
            path.display()
        );
        Ok(())
    }
}
