//! Runs the validator's own build/interpreter invocation inside the
//! scratch directory, under a wall-clock cap. The only process this crate
//! ever spawns.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::error::SandboxError;

/// An allow-listed command the validator wants run, e.g. `python3
/// -c "compile(open(...).read(), ...)"` or `go build ./...`.
#[derive(Debug, Clone)]
pub struct ValidatorCommand {
    pub program: String,
    pub args: Vec<String>,
}

pub async fn run_validator(command: &ValidatorCommand, scratch_dir: &Path, wall_clock_cap: Duration) -> Result<Output, SandboxError> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(scratch_dir)
        .kill_on_drop(true)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()?;

    match timeout(wall_clock_cap, child.wait_with_output()).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(SandboxError::ValidatorTimeout(wall_clock_cap)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn a_fast_command_completes_within_its_cap() {
        let command = ValidatorCommand {
            program: "true".to_string(),
            args: vec![],
        };
        let dir = tempfile::tempdir().unwrap();
        let result = run_validator(&command, dir.path(), Duration::from_secs(5)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn a_slow_command_is_killed_at_the_cap() {
        let command = ValidatorCommand {
            program: "sleep".to_string(),
            args: vec!["5".to_string()],
        };
        let dir = tempfile::tempdir().unwrap();
        let result = run_validator(&command, dir.path(), Duration::from_millis(50)).await;
        assert!(matches!(result, Err(SandboxError::ValidatorTimeout(_))));
    }
}
