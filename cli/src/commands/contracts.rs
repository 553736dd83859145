use colored::*;
use nxpipe_common::config::Config;
use nxpipe_protocols::catalog;
use nxpipe_protocols::protocol;

use crate::terminal::{colors, print};

pub fn contracts(protocol_filter: Option<&str>, cfg: &Config) -> anyhow::Result<()> {
    if let Some(name) = protocol_filter {
        protocol::lookup(name)?;
    }

    let entries: Vec<catalog::ContractEntry> = catalog::contracts()
        .into_iter()
        .filter(|entry| protocol_filter.is_none_or(|name| entry.contract.protocol == name))
        .collect();

    print::header("contracts", cfg.quiet);

    for entry in &entries {
        let id = entry.contract.encode();
        let outputs: Vec<&str> = entry.outputs.iter().map(|o| o.field_name()).collect();
        match cfg.quiet {
            2.. => print::print(&id),
            _ => print::print(&format!(
                "{} {} {}",
                format!("{id:<40}").color(colors::PRIMARY),
                outputs.join(",").color(colors::ACCENT),
                entry.description.color(colors::SEPARATOR)
            )),
        }
    }

    if cfg.quiet == 0 {
        print::fat_separator();
        print::centerln(&format!("{} contracts", entries.len().to_string().bold().green()));
    }
    Ok(())
}
