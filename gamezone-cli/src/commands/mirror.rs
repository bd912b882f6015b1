use std::path::PathBuf;
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::sync::mpsc;

use gamezone_fetch::HttpSource;
use gamezone_lib::Settings;
use gamezone_lib::async_util::run_with_events;
use gamezone_mirror::{EntryStatus, MirrorEvent, MirrorOptions, run_mirror};

use crate::CliError;
use crate::spinner::SpinnerPool;

/// Spinner key for the catalogue and asset phases.
const PHASE_KEY: i64 = i64::MIN;

/// Overrides from the command line, applied on top of settings.
pub(crate) struct MirrorArgs {
    pub output: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub no_assets: bool,
    pub no_log: bool,
}

pub(crate) fn mirror_options(settings: &Settings, args: MirrorArgs) -> MirrorOptions {
    let mut options = MirrorOptions::from_settings(settings);
    if let Some(output) = args.output {
        options.output_dir = output;
    }
    if let Some(jobs) = args.jobs {
        options.jobs = jobs;
    }
    options.jobs = options.jobs.max(1);
    if args.no_assets {
        options.assets = None;
    }
    options.no_log = args.no_log;
    options
}

/// Mirror the catalogue into the output directory.
pub(crate) async fn run_mirror_command(
    settings: &Settings,
    args: MirrorArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let options = mirror_options(settings, args);
    let source = Arc::new(HttpSource::new()?);

    log::info!(
        "Mirroring into {}",
        options.output_dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "{}",
        format!("{} workers", options.jobs).if_supports_color(Stdout, |t| t.dimmed()),
    );
    if options.assets.is_none() {
        log::info!(
            "{}",
            "Assets disabled: documents and covers only".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let (tx, rx) = mpsc::unbounded_channel();
    let mut pool = SpinnerPool::new(options.jobs, quiet);
    let task = run_mirror(source, &settings.endpoints, &options, tx);

    let report = run_with_events(task, rx, |event| match event {
        MirrorEvent::LoadingCatalogue => {
            pool.claim(PHASE_KEY, "Loading catalogue...".into());
        }
        MirrorEvent::CatalogueLoaded { total, revision } => {
            pool.release(PHASE_KEY);
            pool.set_total(total);
            log::info!(
                "{} Catalogue: {} zones {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                total,
                format!("(revision {})", revision.as_deref().unwrap_or("unknown"))
                    .if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        MirrorEvent::CatalogueFailed { message } => {
            pool.release(PHASE_KEY);
            log::warn!(
                "{} Catalogue unavailable: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                message,
            );
        }
        MirrorEvent::SyncingAssets => {
            pool.claim(PHASE_KEY, "Syncing asset repository...".into());
        }
        MirrorEvent::AssetsReady { zones } => {
            pool.release(PHASE_KEY);
            log::info!(
                "{} Assets: {} zone folders",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                zones,
            );
        }
        MirrorEvent::AssetsUnavailable { message } => {
            pool.release(PHASE_KEY);
            log::warn!(
                "{} Assets unavailable, continuing without: {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                message,
            );
        }
        MirrorEvent::EntryStarted { id, name } => {
            pool.claim(id, name);
        }
        MirrorEvent::EntryFinished(outcome) => {
            pool.finish(outcome.id);
            match outcome.status {
                EntryStatus::New | EntryStatus::Updated => log::info!(
                    "  {} {} {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    outcome.name,
                    format!("({})", outcome.status).if_supports_color(Stdout, |t| t.dimmed()),
                ),
                EntryStatus::Skipped => log::debug!("  = {} (unchanged)", outcome.name),
                EntryStatus::Failed => log::warn!(
                    "  {} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    outcome.name,
                    outcome.error.as_deref().unwrap_or("failed"),
                ),
            }
            for warning in &outcome.warnings {
                log::warn!(
                    "    {} {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    warning,
                );
            }
        }
        MirrorEvent::ManifestWritten { path, records } => {
            log::debug!("wrote {} records to {}", records, path.display());
        }
        MirrorEvent::Done => pool.clear_all(),
    })
    .await?;
    pool.clear_all();

    let summary = report.summary();
    log::info!("");
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} new, {} updated",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.new,
        summary.updated,
    );
    log::info!("  = {} unchanged", summary.skipped);
    if summary.failed > 0 {
        log::info!(
            "  {} {} failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failed,
        );
    }
    if summary.warnings > 0 {
        log::info!(
            "  {} {} warnings",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.warnings,
        );
    }
    log::info!("");
    log::info!("  Manifest: {}", report.manifest_path.display());
    if let Some(path) = &report.log_path {
        log::info!("  Log:      {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MirrorArgs {
        MirrorArgs {
            output: None,
            jobs: None,
            no_assets: false,
            no_log: false,
        }
    }

    #[test]
    fn settings_apply_without_overrides() {
        let settings = Settings::default();
        let options = mirror_options(&settings, args());
        assert_eq!(options.output_dir, settings.mirror.output_dir);
        assert_eq!(options.jobs, settings.mirror.jobs);
        assert!(options.assets.is_some());
        assert!(!options.no_log);
    }

    #[test]
    fn flags_override_settings() {
        let options = mirror_options(
            &Settings::default(),
            MirrorArgs {
                output: Some(PathBuf::from("/tmp/out")),
                jobs: Some(0),
                no_assets: true,
                no_log: true,
            },
        );
        assert_eq!(options.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(options.jobs, 1);
        assert!(options.assets.is_none());
        assert!(options.no_log);
    }
}
