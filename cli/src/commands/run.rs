use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use nxpipe_common::config::Config;
use nxpipe_common::credential::Credential;
use nxpipe_core::AssetPager;
use nxpipe_core::pipeline::{self, InvocationRequest};

use crate::commands::LoadedTargets;
use crate::commands::parse::report;
use crate::runner::SubprocessRunner;
use crate::terminal::spinner;

pub async fn run(
    contract: &str,
    loaded: &LoadedTargets,
    credential: &Credential,
    fields: &BTreeMap<String, String>,
    json: bool,
    cfg: &Config,
) -> anyhow::Result<()> {
    let mut pager = loaded.inventory.as_ref().map(|file| file.pager());

    let prepared = pipeline::prepare(
        cfg,
        InvocationRequest {
            contract_id: contract,
            source: loaded.source(),
            credential,
            fields,
        },
        pager.as_mut().map(|p| p as &mut dyn AssetPager),
    )?;

    let start_time = Instant::now();
    let spinner_handle = spinner::start(format!(
        "Running {} against {} target(s)...",
        prepared.contract.to_string().green().bold(),
        prepared.targets.len()
    ));

    let result = tokio::task::spawn_blocking(move || {
        pipeline::run_prepared(&prepared, &SubprocessRunner)
    })
    .await
    .context("tool run panicked")?;

    spinner_handle.finish_and_clear();

    report(&result, json, Some(start_time.elapsed()), cfg)
}
