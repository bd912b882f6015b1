use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamezone_core::{Card, Catalogue, Filter, PageRequest, SortMode, build_gallery};
use gamezone_fetch::HttpSource;
use gamezone_lib::Settings;
use gamezone_lib::util::format_count;

use crate::CliError;
use crate::cli_types::PageArgs;
use crate::commands::load_catalogue;

/// Print one page of the sorted, filtered gallery.
pub(crate) async fn run_list(
    settings: &Settings,
    sort: SortMode,
    search: Option<String>,
    tag: Option<String>,
    page: PageArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let source = Arc::new(HttpSource::new()?);
    let mut catalogue = load_catalogue(source, settings, quiet).await?;
    catalogue.sort(sort);

    let filter = match (search, tag) {
        (Some(query), _) => Filter::search(&query),
        (None, Some(tag)) => Filter::tag(&tag),
        (None, None) => Filter::None,
    };
    let request = if page.per_page == 0 {
        PageRequest::all()
    } else {
        PageRequest::new(page.page, page.per_page)
    };
    let view = catalogue.view(&filter);
    let gallery = build_gallery(&view, &settings.endpoints.placeholders(), request);

    if !gallery.featured.is_empty() && gallery.page == 1 {
        log::info!("{}", "Featured".if_supports_color(Stdout, |t| t.bold()));
        for card in &gallery.featured {
            print_card(card, &catalogue, sort);
        }
        log::info!("");
    }

    log::info!(
        "{} {}",
        "Zones".if_supports_color(Stdout, |t| t.bold()),
        format!("(sorted by {})", sort).if_supports_color(Stdout, |t| t.dimmed()),
    );
    if gallery.cards.is_empty() {
        log::info!("  No zones match");
    }
    for card in &gallery.cards {
        print_card(card, &catalogue, sort);
    }
    log::info!("");
    log::info!(
        "{}",
        format!(
            "Page {}/{} ({} zones)",
            gallery.page,
            gallery.pages,
            format_count(gallery.total as u64)
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}

fn print_card(card: &Card, catalogue: &Catalogue, sort: SortMode) {
    let hits = sort
        .period()
        .map(|p| format!("  {} hits", format_count(catalogue.popularity().hits(p, card.id))))
        .unwrap_or_default();
    let external = if card.external {
        format!(" {}", "(external)".if_supports_color(Stdout, |t| t.yellow()))
    } else {
        String::new()
    };
    log::info!(
        "  {:>5}  {}{}{}",
        card.id.if_supports_color(Stdout, |t| t.dimmed()),
        card.name.if_supports_color(Stdout, |t| t.cyan()),
        external,
        hits.if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::debug!("         cover: {}", card.cover_url);
}
