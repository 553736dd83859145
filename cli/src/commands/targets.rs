use colored::*;
use nxpipe_common::config::Config;
use nxpipe_core::{AssetPager, targets};

use crate::commands::TargetArgs;
use crate::terminal::{colors, print};

pub fn targets(args: TargetArgs, cfg: &Config) -> anyhow::Result<()> {
    let loaded = args.load()?;
    let mut pager = loaded.inventory.as_ref().map(|file| file.pager());

    let extraction = targets::resolve(
        &loaded.source(),
        pager.as_mut().map(|p| p as &mut dyn AssetPager),
        cfg.empty_local_ip,
    )?;

    if extraction.is_empty() {
        print::header("no targets", cfg.quiet);
        return Ok(());
    }

    print::header("targets", cfg.quiet);
    for (idx, target) in extraction.targets.iter().enumerate() {
        let id = extraction.asset_ids.get(target);
        match (cfg.quiet, id) {
            (2.., _) => print::print(target),
            (_, Some(id)) => print::tree_head(idx, &format!("{target} {}", id.color(colors::SEPARATOR))),
            (_, None) => print::tree_head(idx, target),
        }
    }

    if cfg.quiet == 0 {
        print::fat_separator();
        print::centerln(&format!(
            "{} targets, {} mapped to assets",
            extraction.len().to_string().bold().green(),
            extraction.asset_ids.len().to_string().bold().yellow()
        ));
    }
    Ok(())
}
