mod commands;
mod inventory;
mod runner;
mod terminal;

use commands::{CommandLine, Commands, build, contracts, parse, run, targets};
use nxpipe_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.quiet);

    let cfg = Config {
        no_banner: commands.no_banner,
        quiet: commands.quiet,
        tool: commands.tool,
        temp_dir: commands.temp_dir,
        empty_local_ip: commands.empty_local_ip,
    };

    print::banner(cfg.no_banner, cfg.quiet);

    match commands.command {
        Commands::Contracts { protocol } => contracts::contracts(protocol.as_deref(), &cfg),
        Commands::Targets { targets: args } => targets::targets(args, &cfg),
        Commands::Build {
            contract,
            targets,
            credential,
            fields,
        } => {
            let loaded = targets.load()?;
            build::build(
                &contract,
                &loaded,
                &credential.into(),
                &fields.into_map(),
                &cfg,
            )
        }
        Commands::Parse {
            contract,
            output,
            inventory,
            policy,
            json,
        } => parse::parse(&contract, &output, inventory.as_deref(), policy, json, &cfg),
        Commands::Run {
            contract,
            targets,
            credential,
            fields,
            json,
        } => {
            let loaded = targets.load()?;
            run::run(
                &contract,
                &loaded,
                &credential.into(),
                &fields.into_map(),
                json,
                &cfg,
            )
            .await
        }
    }
}
