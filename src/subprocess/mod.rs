pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;


pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::{MockCommandConfig, MockProcessRunner};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

use std::sync::Arc;

#[derive(Clone)]
pub struct SubprocessManager {
    runner: Arc<dyn ProcessRunner>,
}

impl SubprocessManager {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    pub fn production() -> Self {
        Self::new(Arc::new(runner::TokioProcessRunner))
    }

    #[cfg(test)]
    pub fn mock() -> (Self, MockProcessRunner) {
        let mock = MockProcessRunner::new();
        let runner = Arc::new(mock.clone()) as Arc<dyn ProcessRunner>;
        (Self::new(runner), mock)
    }

    /// Run a command that must succeed and return its trimmed stdout.
    ///
    /// A non-zero exit is reported with the full command line and the
    /// captured stdout.
    pub async fn run_checked(&self, command: ProcessCommand) -> Result<String, ProcessError> {
        let command_line = command.display();
        let output = self.runner.run(command).await?;

        if !output.status.success() {
            tracing::debug!("Command failed ({}): {}", output.status, command_line);
            return Err(ProcessError::CommandFailed {
                command: command_line,
                status: output.status,
                stdout: output.stdout,
            });
        }

        Ok(output.stdout.trim().to_string())
    }
}
