//! External tool execution with streamed output
//!
//! Output of the child is read line by line on helper tasks (one per stream)
//! and forwarded over a channel, so long-running `sfdk` invocations show up
//! in the log as they happen instead of only once the process exits.

use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{ExportError, Result};

/// Exit code reported when the process ended without one (killed by a signal)
pub const UNKNOWN_EXIT_CODE: i32 = 255;

/// Result of an external tool execution
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub exit_code: i32,
    /// stdout and stderr lines in arrival order
    pub lines: Vec<String>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Run `program` to completion, collecting its output as it is produced.
///
/// A non-zero exit is not an error here; callers decide from `exit_code`.
pub async fn run_tool(program: &Path, args: &[String], cwd: Option<&Path>) -> Result<ToolOutput> {
    let tool = program.display().to_string();
    debug!("Running: {} {}", tool, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|e| ExportError::ToolLaunch {
        tool: tool.clone(),
        reason: e.to_string(),
    })?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_lines(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_lines(stderr, tx.clone()));
    }
    drop(tx);

    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        debug!("[{}] {}", tool, line);
        lines.push(line);
    }

    let status = child.wait().await?;
    let exit_code = status.code().unwrap_or(UNKNOWN_EXIT_CODE);
    debug!("{} exit status: {}", tool, exit_code);

    Ok(ToolOutput { exit_code, lines })
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    // raw lines; non-UTF-8 output is decoded lossily
    let mut lines = BufReader::new(reader).split(b'\n');
    while let Ok(Some(mut raw)) = lines.next_segment().await {
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        if tx.send(String::from_utf8_lossy(&raw).into_owned()).is_err() {
            break;
        }
    }
}
