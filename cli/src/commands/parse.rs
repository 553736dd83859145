use std::path::Path;
use std::time::Duration;

use colored::*;
use nxpipe_common::config::Config;
use nxpipe_common::inventory::AddressPolicy;
use nxpipe_core::{AddressBook, ParseResult, TargetSource, pipeline, targets};
use nxpipe_protocols::ContractIdentity;

use crate::commands::read_text;
use crate::inventory::InventoryFile;
use crate::mprint;
use crate::terminal::{colors, format, print};

pub fn parse(
    contract: &str,
    output: &Path,
    inventory: Option<&Path>,
    policy: AddressPolicy,
    json: bool,
    cfg: &Config,
) -> anyhow::Result<()> {
    let contract = ContractIdentity::decode(contract)?;
    let text = read_text(output)?;

    let book = match inventory {
        Some(path) => {
            let file = InventoryFile::load(path)?;
            let assets = file.select(None);
            let extraction = targets::resolve(
                &TargetSource::assets(&assets, policy),
                None,
                cfg.empty_local_ip,
            )?;
            AddressBook::new(extraction.asset_ids)
        }
        None => AddressBook::default(),
    };

    let result = pipeline::interpret(Some(&contract), &text, &book);
    report(&result, json, None, cfg)
}

/// Prints a parse result, as JSON or as one tree per finding.
pub fn report(
    result: &ParseResult,
    json: bool,
    elapsed: Option<Duration>,
    cfg: &Config,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if result.is_empty() {
        print::header("findings", cfg.quiet);
        print::no_results();
        return Ok(());
    }

    for (field, findings) in &result.outputs {
        print::header(field, cfg.quiet);
        for (idx, finding) in findings.iter().enumerate() {
            let details = format::finding_to_details(finding);
            match cfg.quiet {
                2.. => {
                    let line: Vec<String> = details.iter().map(|(_, v)| v.to_string()).collect();
                    print::print(&line.join(" "));
                }
                _ => {
                    print::tree_head(idx, field);
                    print::as_tree_one_level(&details);
                    if idx + 1 != findings.len() {
                        mprint!();
                    }
                }
            }
        }
    }

    if cfg.quiet == 0 {
        let summary = match elapsed {
            Some(elapsed) => format!(
                "{} in {}",
                result.message,
                format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow()
            ),
            None => result.message.clone(),
        };
        print::fat_separator();
        print::centerln(&format!("{}", summary.color(colors::TEXT_DEFAULT)));
    }
    Ok(())
}
