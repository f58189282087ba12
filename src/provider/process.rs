//! Child-process plumbing shared by the CLI-driven runners

use crate::error::ProviderError;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;

/// A bare name is looked up in PATH; anything with a separator is a path
pub(crate) fn command_for(binary: &Path) -> Command {
    let binary_str = binary.to_string_lossy();
    if binary_str.contains('/') || binary_str.contains('\\') {
        Command::new(binary)
    } else {
        Command::new(binary_str.as_ref())
    }
}

/// Spawn `cmd`, feed it `stdin`, and collect its output within `limit`.
///
/// The child is killed when the deadline passes, so a hung CLI cannot keep
/// running behind the execution loop.
pub(crate) async fn run_command(
    mut cmd: Command,
    stdin: Option<&[u8]>,
    limit: Duration,
) -> Result<Output, ProviderError> {
    cmd.kill_on_drop(true)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(ProviderError::Io)?;
    let input = child.stdin.take();

    let output = tokio_timeout(limit, async move {
        if let (Some(mut pipe), Some(bytes)) = (input, stdin) {
            pipe.write_all(bytes).await?;
            pipe.shutdown().await?;
        }
        child.wait_with_output().await
    })
    .await
    .map_err(|_| ProviderError::Timeout(limit))?
    .map_err(ProviderError::Io)?;

    if !output.status.success() {
        return Err(ProviderError::NonZeroExit {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(output)
}
