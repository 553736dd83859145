use std::process::{Command, Stdio};

use anyhow::Context;
use nxpipe_common::debug;
use nxpipe_core::{ToolOutput, ToolRunner};

/// Runs the tool as a child process, arguments passed as-is (no shell).
pub struct SubprocessRunner;

impl ToolRunner for SubprocessRunner {
    fn run(&self, argv: &[String]) -> anyhow::Result<ToolOutput> {
        let (program, args) = argv.split_first().context("empty argument vector")?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to start {program}"))?;

        if !output.stderr.is_empty() {
            debug!("{program} stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
        }

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
