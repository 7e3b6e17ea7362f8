use super::runner::ExitStatus;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error running command: {command} ({status})\nStdout:\n{stdout}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stdout: String,
    },

    #[error("Output of '{command}' is not valid UTF-8: {source}")]
    Utf8 {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Mock expectation not met: {0}")]
    MockExpectationNotMet(String),
}
