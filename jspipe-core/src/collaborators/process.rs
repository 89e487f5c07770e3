//! Running a collaborator as a child process: source on stdin, result on stdout.

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::CollaboratorError;

/// One child-process invocation of a tool.
#[derive(Debug)]
pub(crate) struct ToolInvocation<'a> {
    pub tool: &'static str,
    pub program: &'a Path,
    pub args: Vec<String>,
    /// Working directory of the child; inherits ours when `None`.
    pub current_dir: Option<&'a Path>,
}

impl ToolInvocation<'_> {
    /// Feed `input` on stdin and return stdout once the tool exits successfully.
    pub(crate) async fn run(&self, input: &str) -> Result<String, CollaboratorError> {
        let tool = self.tool;
        debug!(
            "Running {} {} ({} bytes on stdin)",
            self.program.display(),
            self.args.join(" "),
            input.len()
        );

        let mut command = Command::new(self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = self.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| CollaboratorError::Spawn {
            tool,
            program: self.program.to_path_buf(),
            source,
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CollaboratorError::Io {
                tool,
                source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin unavailable"),
            })?;

        // Write and drain concurrently so neither pipe can fill up and stall the child.
        let feed = async move {
            stdin.write_all(input.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|source| CollaboratorError::Io { tool, source })?;

        if !output.status.success() {
            return Err(CollaboratorError::Failed {
                tool,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // A tool that exits successfully without reading all of stdin is still an error.
        fed.map_err(|source| CollaboratorError::Io { tool, source })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", tool, stderr.trim());
        }

        String::from_utf8(output.stdout).map_err(|_| CollaboratorError::InvalidOutput { tool })
    }
}
