use std::collections::BTreeMap;

use nxpipe_common::config::Config;
use nxpipe_common::credential::Credential;
use nxpipe_core::pipeline::{self, InvocationRequest};
use nxpipe_core::AssetPager;

use crate::commands::LoadedTargets;
use crate::terminal::print;

pub fn build(
    contract: &str,
    loaded: &LoadedTargets,
    credential: &Credential,
    fields: &BTreeMap<String, String>,
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

    print::header("command", cfg.quiet);
    print::print(&prepared.command.redacted().join(" "));

    if let Some(path) = &prepared.command.output_file
        && cfg.quiet == 0
    {
        print::print_status(format!("results will also be written to {}", path.display()));
    }
    Ok(())
}
