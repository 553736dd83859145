//! # Pipeline
//!
//! Wires the stages together around an injected [`ToolRunner`]:
//!
//! 1. [`prepare`]: decode the contract, resolve targets, build the command.
//! 2. the runner executes the argument vector.
//! 3. [`collect_output`]: stdout plus whatever the output file holds.
//! 4. [`interpret`]: classify and dispatch to the extractors.
//!
//! [`execute`] runs all of it. Nothing is executed when preparation fails.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use nxpipe_common::config::Config;
use nxpipe_common::credential::Credential;
use nxpipe_common::{PipelineResult, debug, info, success, warn};
use nxpipe_protocols::ContractIdentity;

use crate::classifier;
use crate::command::{CommandBuilder, CommandRequest, CommandSpec};
use crate::extract;
use crate::finding::{AddressBook, ParseResult};
use crate::targets::{self, AssetPager, TargetSource};

/// What the external tool produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

/// Runs an argument vector. Timeouts are the implementor's business.
pub trait ToolRunner {
    fn run(&self, argv: &[String]) -> anyhow::Result<ToolOutput>;
}

impl<F> ToolRunner for F
where
    F: Fn(&[String]) -> anyhow::Result<ToolOutput>,
{
    fn run(&self, argv: &[String]) -> anyhow::Result<ToolOutput> {
        self(argv)
    }
}

/// One requested invocation, as it arrives from the front-end.
#[derive(Debug, Clone, Copy)]
pub struct InvocationRequest<'a> {
    pub contract_id: &'a str,
    pub source: TargetSource<'a>,
    pub credential: &'a Credential,
    pub fields: &'a BTreeMap<String, String>,
}

/// Everything needed to run the tool and make sense of its output.
#[derive(Debug, Clone)]
pub struct PreparedInvocation {
    pub contract: ContractIdentity,
    pub targets: Vec<String>,
    pub command: CommandSpec,
    pub address_book: AddressBook,
}

pub fn prepare(
    config: &Config,
    request: InvocationRequest<'_>,
    pager: Option<&mut dyn AssetPager>,
) -> PipelineResult<PreparedInvocation> {
    let contract = ContractIdentity::decode(request.contract_id)?;
    let extraction = targets::resolve(&request.source, pager, config.empty_local_ip)?;

    let command = CommandBuilder::new(config).build(CommandRequest {
        contract: &contract,
        targets: &extraction.targets,
        credential: request.credential,
        fields: request.fields,
    })?;
    debug!("command: {}", command.redacted().join(" "));

    Ok(PreparedInvocation {
        contract,
        targets: extraction.targets,
        command,
        address_book: AddressBook::new(extraction.asset_ids),
    })
}

/// Stdout followed by the lines of the output file, when there is one. The
/// file is deleted afterwards.
pub fn collect_output(stdout: &str, output_file: Option<&Path>) -> String {
    let Some(path) = output_file else {
        return stdout.to_string();
    };
    if !path.exists() {
        debug!("output file {} was not created", path.display());
        return stdout.to_string();
    }

    let text = match fs::read_to_string(path) {
        Ok(contents) => {
            let mut text = stdout.to_string();
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&contents);
            text
        }
        Err(e) => {
            warn!("could not read output file {}: {e}", path.display());
            stdout.to_string()
        }
    };

    if let Err(e) = fs::remove_file(path) {
        warn!("could not remove output file {}: {e}", path.display());
    }
    text
}

/// Classifies `text` and runs the extractors bound to `contract`.
pub fn interpret(contract: Option<&ContractIdentity>, text: &str, book: &AddressBook) -> ParseResult {
    let lines = classifier::classify(text);
    debug!("{} candidate lines", lines.len());
    extract::dispatch(contract, &lines, book)
}

/// Prepare, run, collect and interpret.
pub fn execute(
    config: &Config,
    request: InvocationRequest<'_>,
    pager: Option<&mut dyn AssetPager>,
    runner: &dyn ToolRunner,
) -> PipelineResult<ParseResult> {
    let prepared = prepare(config, request, pager)?;
    Ok(run_prepared(&prepared, runner))
}

/// Runs an already prepared invocation. Runner failures and non-zero exit
/// codes are logged; whatever text exists is still interpreted.
pub fn run_prepared(prepared: &PreparedInvocation, runner: &dyn ToolRunner) -> ParseResult {
    info!(
        "Running {} against {} target(s)",
        prepared.contract,
        prepared.targets.len()
    );

    let stdout = match runner.run(&prepared.command.argv) {
        Ok(output) => {
            match output.exit_code {
                Some(0) => {}
                Some(code) => warn!("{} exited with status {code}", prepared.command.argv[0]),
                None => warn!("{} was terminated by a signal", prepared.command.argv[0]),
            }
            output.stdout
        }
        Err(e) => {
            warn!("tool run failed: {e:#}");
            String::new()
        }
    };

    let text = collect_output(&stdout, prepared.command.output_file.as_deref());
    let result = interpret(Some(&prepared.contract), &text, &prepared.address_book);

    if result.is_empty() {
        info!("{}", result.message);
    } else {
        success!("{}", result.message);
    }
    result
}
