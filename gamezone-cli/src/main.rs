//! gamezone CLI
//!
//! Browse the zone catalogue from the terminal and mirror it for offline use.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamezone_lib::Settings;

use cli_types::{Cli, Commands, ConfigAction};
use commands::mirror::MirrorArgs;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to initialise logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{} {}", "\u{2718}".if_supports_color(Stdout, |t| t.red()), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let quiet = cli.quiet;
    let config = cli.config.as_deref();

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Show => commands::config::run_config_show(config),
            ConfigAction::Path => {
                commands::config::run_config_path(config);
                Ok(())
            }
        };
    }

    let settings = Settings::load(config)?;
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        match cli.command {
            Commands::List {
                sort,
                search,
                tag,
                page,
            } => commands::list::run_list(&settings, sort, search, tag, page, quiet).await,
            Commands::Tags => commands::tags::run_tags(&settings, quiet).await,
            Commands::Show {
                id,
                download,
                pop_out,
            } => {
                commands::show::run_show(&settings, id, download.as_deref(), pop_out, quiet).await
            }
            Commands::Stats { id, top } => {
                commands::stats::run_stats(&settings, id, top, quiet).await
            }
            Commands::Mirror {
                output,
                jobs,
                no_assets,
                no_log,
            } => {
                let args = MirrorArgs {
                    output,
                    jobs,
                    no_assets,
                    no_log,
                };
                commands::mirror::run_mirror_command(&settings, args, quiet).await
            }
            Commands::Config { .. } => Ok(()),
        }
    })
}
