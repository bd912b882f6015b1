//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use gamezone_core::SortMode;

#[derive(Parser)]
#[command(name = "gamezone")]
#[command(about = "Browse the zone catalogue and mirror it for offline use", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Settings file (default: ~/.config/gamezone/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which page of the gallery to print.
#[derive(Args, Clone, Debug)]
pub(crate) struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Cards per page (0 prints everything)
    #[arg(long, default_value_t = 50)]
    pub per_page: usize,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List zones as a gallery
    List {
        /// Sort order (name, id, popular, trendingMonth, trendingWeek, trendingDay)
        #[arg(short, long, default_value = "name")]
        sort: SortMode,

        /// Only zones whose name contains this text
        #[arg(long, conflicts_with = "tag")]
        search: Option<String>,

        /// Only zones carrying this tag ("none" shows everything)
        #[arg(long)]
        tag: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// List every tag used in the catalogue
    Tags,

    /// Show one zone and optionally save its document
    Show {
        /// Zone id
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Save the raw document as <name>.html in this directory
        #[arg(long)]
        download: Option<PathBuf>,

        /// Write the document to a standalone file in the temp directory
        #[arg(long)]
        pop_out: bool,
    },

    /// All-time hit and bandwidth statistics
    Stats {
        /// Only this zone
        #[arg(allow_negative_numbers = true)]
        id: Option<i64>,

        /// Number of top zones to print
        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// Mirror every zone, its assets and cover into a local folder
    Mirror {
        /// Output directory (default from settings, or GAMEZONE_OUTPUT)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Concurrent downloads
        #[arg(short, long, env = "JOBS")]
        jobs: Option<usize>,

        /// Skip the asset repository; mirror documents and covers only
        #[arg(long)]
        no_assets: bool,

        /// Disable mirror log file
        #[arg(long)]
        no_log: bool,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the effective settings as TOML
    Show,

    /// Print the settings file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_defaults() {
        let cli = Cli::try_parse_from(["gamezone", "list"]).unwrap();
        match cli.command {
            Commands::List {
                sort, search, tag, page,
            } => {
                assert_eq!(sort, SortMode::Name);
                assert!(search.is_none() && tag.is_none());
                assert_eq!((page.page, page.per_page), (1, 50));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn sort_modes_parse() {
        let cli = Cli::try_parse_from(["gamezone", "list", "--sort", "trendingWeek"]).unwrap();
        assert!(matches!(cli.command, Commands::List { sort: SortMode::TrendingWeek, .. }));
        assert!(Cli::try_parse_from(["gamezone", "list", "--sort", "loudest"]).is_err());
    }

    #[test]
    fn search_and_tag_conflict() {
        let parsed = Cli::try_parse_from(["gamezone", "list", "--search", "a", "--tag", "b"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn show_accepts_pinned_id() {
        let cli = Cli::try_parse_from(["gamezone", "show", "-1", "--pop-out"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { id: -1, pop_out: true, .. }));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gamezone", "mirror", "--no-assets", "--quiet", "-j", "4"])
            .unwrap();
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Mirror { jobs: Some(4), no_assets: true, .. }
        ));
    }
}
