use std::path::Path;
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamezone_core::Period;
use gamezone_fetch::{HttpSource, Viewer, ZoneTarget, pop_out, save_html};
use gamezone_lib::Settings;
use gamezone_lib::util::{format_bytes, format_count};

use crate::CliError;
use crate::commands::load_catalogue;

/// Print a zone's details and resolve what selecting it leads to.
pub(crate) async fn run_show(
    settings: &Settings,
    id: i64,
    download: Option<&Path>,
    pop_out_doc: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let source = Arc::new(HttpSource::new()?);
    let catalogue = load_catalogue(source.clone(), settings, quiet).await?;
    let zone = catalogue
        .zone(id)
        .ok_or_else(|| CliError::not_found(id.to_string()))?;

    let viewer = Viewer::new(
        source,
        settings.endpoints.placeholders(),
        settings.endpoints.page_url.clone(),
    );
    let details = viewer.details(zone)?;

    log::info!(
        "{} {}",
        details.name.if_supports_color(Stdout, |t| t.bold()),
        format!("#{}", details.id).if_supports_color(Stdout, |t| t.dimmed()),
    );
    if let Some(author) = &details.author {
        match &details.author_link {
            Some(link) => log::info!(
                "  by {} {}",
                author,
                link.if_supports_color(Stdout, |t| t.dimmed())
            ),
            None => log::info!("  by {}", author),
        }
    }
    if !zone.special.is_empty() {
        log::info!(
            "  Tags:  {}",
            zone.special.join(", ").if_supports_color(Stdout, |t| t.cyan())
        );
    }
    if !catalogue.popularity().is_empty() {
        let counts: Vec<String> = Period::all()
            .iter()
            .map(|&p| {
                format!(
                    "{} {}",
                    format_count(catalogue.popularity().hits(p, id)),
                    p.as_str()
                )
            })
            .collect();
        log::info!("  Hits:  {}", counts.join(", "));
    }
    log::info!(
        "  Share: {}",
        details.share_link.if_supports_color(Stdout, |t| t.cyan())
    );
    log::info!("");

    let Some(target) = viewer.open(zone).await? else {
        return Ok(());
    };
    match target {
        ZoneTarget::External(url) => {
            log::info!(
                "{} External zone, opens in a new tab: {}",
                "\u{2192}".if_supports_color(Stdout, |t| t.yellow()),
                url.if_supports_color(Stdout, |t| t.cyan()),
            );
            if download.is_some() || pop_out_doc {
                log::warn!("External zones have no document to save");
            }
        }
        ZoneTarget::Inline { url, html } => {
            log::info!(
                "{} {} ({})",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                url,
                format_bytes(html.len() as u64),
            );
            if pop_out_doc {
                let path = pop_out(zone, &html)?;
                log::info!("  Popped out to {}", path.display());
            }
            if let Some(dir) = download {
                let path = save_html(dir, zone, &html).await?;
                log::info!("  Saved {}", path.display());
            }
        }
    }
    Ok(())
}
