pub mod build;
pub mod contracts;
pub mod parse;
pub mod run;
pub mod targets;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use nxpipe_common::config::EmptyLocalIp;
use nxpipe_common::credential::Credential;
use nxpipe_common::inventory::{AddressPolicy, Selector, parse_commas};
use nxpipe_core::TargetSource;

use crate::inventory::InventoryFile;

#[derive(Parser)]
#[command(name = "nxpipe")]
#[command(about = "Resolve targets, run NetExec and extract structured findings.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Hide the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Reduce output (-q: no decoration, -qq: results only)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Enumeration tool binary
    #[arg(long, global = true, default_value = "nxc")]
    pub tool: String,

    /// Directory for files written by file-producing options
    #[arg(long, global = true, default_value = "/tmp")]
    pub temp_dir: PathBuf,

    /// What to do with assets without IPs under the local-ip policy (abort, skip)
    #[arg(long, global = true, default_value = "abort")]
    pub empty_local_ip: EmptyLocalIp,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every contract and the output fields it can produce
    #[command(alias = "c")]
    Contracts {
        /// Only show contracts of this protocol
        #[arg(short, long)]
        protocol: Option<String>,
    },
    /// Resolve targets and show their inventory ids
    #[command(alias = "t")]
    Targets {
        #[command(flatten)]
        targets: TargetArgs,
    },
    /// Build the command line of a contract without running it
    #[command(alias = "b")]
    Build {
        contract: String,
        #[command(flatten)]
        targets: TargetArgs,
        #[command(flatten)]
        credential: CredentialArgs,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Extract findings from captured tool output
    #[command(alias = "p")]
    Parse {
        contract: String,
        /// File holding the captured output
        output: PathBuf,
        /// Inventory used to correlate findings with asset ids
        #[arg(short, long)]
        inventory: Option<PathBuf>,
        #[arg(long, default_value = "automatic")]
        policy: AddressPolicy,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve, run the tool and extract findings
    #[command(alias = "r")]
    Run {
        contract: String,
        #[command(flatten)]
        targets: TargetArgs,
        #[command(flatten)]
        credential: CredentialArgs,
        #[command(flatten)]
        fields: FieldArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Clone)]
pub struct TargetArgs {
    /// How targets are chosen (manual, assets, asset-groups)
    #[arg(short, long, default_value = "manual")]
    pub selector: Selector,

    /// Address policy for inventory assets (automatic, hostname, seen-ip, local-ip)
    #[arg(long, default_value = "automatic")]
    pub policy: AddressPolicy,

    /// Comma separated targets for the manual selector
    #[arg(short, long)]
    pub targets: Option<String>,

    /// Inventory JSON file for the assets and asset-groups selectors
    #[arg(short, long)]
    pub inventory: Option<PathBuf>,

    /// Comma separated asset ids (assets selector, default: all)
    #[arg(long)]
    pub assets: Option<String>,

    /// Comma separated asset group ids (asset-groups selector)
    #[arg(short, long)]
    pub groups: Option<String>,
}

/// Owned inputs a [`TargetSource`] borrows from.
pub struct LoadedTargets {
    pub args: TargetArgs,
    pub inventory: Option<InventoryFile>,
    assets: Vec<nxpipe_common::inventory::Asset>,
    group_ids: Vec<String>,
}

impl TargetArgs {
    pub fn load(self) -> anyhow::Result<LoadedTargets> {
        let inventory = self
            .inventory
            .as_deref()
            .map(InventoryFile::load)
            .transpose()?;

        let assets = match (&inventory, self.selector) {
            (Some(file), Selector::Assets) => {
                let wanted = self.assets.as_deref().map(parse_commas);
                file.select(wanted.as_deref())
            }
            _ => Vec::new(),
        };
        let group_ids = self.groups.as_deref().map(parse_commas).unwrap_or_default();

        Ok(LoadedTargets {
            args: self,
            inventory,
            assets,
            group_ids,
        })
    }
}

impl LoadedTargets {
    /// The source handed to the resolver. Data the selector needs but the
    /// user did not give stays `None`, so the resolver reports it.
    pub fn source(&self) -> TargetSource<'_> {
        TargetSource {
            selector: self.args.selector,
            policy: self.args.policy,
            assets: self.inventory.as_ref().map(|_| self.assets.as_slice()),
            group_ids: self.args.groups.as_ref().map(|_| self.group_ids.as_slice()),
            manual: self.args.targets.as_deref(),
        }
    }
}

#[derive(Args, Clone, Default)]
pub struct CredentialArgs {
    #[arg(short, long)]
    pub username: Option<String>,
    #[arg(short, long)]
    pub password: Option<String>,
    /// NT or LM:NT hash
    #[arg(short = 'H', long)]
    pub hash: Option<String>,
    #[arg(short, long)]
    pub domain: Option<String>,
    /// SSH private key
    #[arg(long)]
    pub key_file: Option<String>,
}

impl From<CredentialArgs> for Credential {
    fn from(args: CredentialArgs) -> Self {
        Credential {
            username: args.username,
            password: args.password,
            hash: args.hash,
            domain: args.domain,
            key_file: args.key_file,
        }
    }
}

#[derive(Args, Clone, Default)]
pub struct FieldArgs {
    /// Form field as KEY=VALUE (e.g. port=8445, command=whoami, mo_laps_COMPUTER=WS01)
    #[arg(short, long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

impl FieldArgs {
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.fields.into_iter().collect()
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

pub fn read_text(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
