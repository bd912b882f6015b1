use gamezone_core::SortMode;

use super::*;
use crate::memory::MemorySource;

const ZONES: &str = r#"[
    {"id": -1, "name": "Pinned Pick", "url": "{HTML_URL}/-1.html", "cover": "{COVER_URL}/-1.png"},
    {"id": 1, "name": "Math Blaster", "url": "{HTML_URL}/1.html", "special": ["edu"]},
    {"id": 2, "name": "Snake", "url": "{HTML_URL}/2.html", "special": ["retro", "edu"]},
    {"id": 3, "name": "Portal Link", "url": "https://elsewhere.example/game"}
]"#;

fn endpoints() -> Endpoints {
    Endpoints {
        catalogue_cdn: "https://cdn/gh/org/assets".into(),
        catalogue_aliases: vec!["latest".into(), "main".into()],
        revision_api: "https://api/repos/org/assets".into(),
        revision_raw: "https://raw/org/assets/main".into(),
        stats_base: "https://stats/org/html".into(),
        ..Endpoints::default()
    }
}

fn stats(entries: &[(i64, u64)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(id, hits)| format!(r#"{{"name":"/{id}.html","hits":{{"total":{hits}}}}}"#))
        .collect();
    format!("[{}]", items.join(","))
}

fn full_source() -> MemorySource {
    let source = MemorySource::new();
    source.insert("https://api/repos/org/assets/commits", r#"[{"sha":"abc123"}]"#);
    source.insert("https://cdn/gh/org/assets@abc123/zones.json", ZONES);
    source.insert("https://stats/org/html/files?period=day", stats(&[(2, 5)]));
    source.insert("https://stats/org/html/files?period=week", stats(&[(1, 9), (2, 40)]));
    source.insert("https://stats/org/html/files?period=month", stats(&[(1, 100)]));
    source.insert("https://stats/org/html/files?period=year", stats(&[(1, 300), (3, 800)]));
    source
}

#[tokio::test]
async fn loads_catalogue_at_discovered_revision() {
    let loader = CatalogueLoader::new(Arc::new(full_source()), endpoints());
    let cat = loader.load().await.unwrap();

    assert_eq!(cat.len(), 4);
    assert_eq!(cat.revision(), Some("abc123"));
    assert_eq!(cat.source_url(), "https://cdn/gh/org/assets@abc123/zones.json");
    assert!(cat.zones()[0].featured);
    assert_eq!(cat.tags(), ["edu", "retro"]);
    assert_eq!(cat.popularity().hits(Period::Week, 2), 40);
    assert_eq!(cat.popularity().hits(Period::Year, 3), 800);
}

#[tokio::test]
async fn popular_sort_uses_year_window() {
    let loader = CatalogueLoader::new(Arc::new(full_source()), endpoints());
    let mut cat = loader.load().await.unwrap();
    cat.sort(SortMode::Popular);
    let ids: Vec<i64> = cat.zones().iter().map(|z| z.id).collect();
    assert_eq!(ids, vec![-1, 3, 1, 2]);
}

#[tokio::test]
async fn falls_back_through_aliases() {
    let source = MemorySource::new();
    source.insert_status("https://cdn/gh/org/assets@latest/zones.json", 500);
    source.insert("https://cdn/gh/org/assets@main/zones.json", ZONES);
    let loader = CatalogueLoader::new(Arc::new(source), endpoints());

    let cat = loader.load().await.unwrap();
    assert_eq!(cat.revision(), None);
    assert_eq!(cat.source_url(), "https://cdn/gh/org/assets@main/zones.json");
}

#[tokio::test]
async fn invalid_catalogue_body_tries_next_candidate() {
    let source = MemorySource::new();
    source.insert("https://cdn/gh/org/assets@latest/zones.json", "<html>not json</html>");
    source.insert("https://cdn/gh/org/assets@main/zones.json", ZONES);
    let loader = CatalogueLoader::new(Arc::new(source), endpoints());
    assert_eq!(loader.load().await.unwrap().len(), 4);
}

#[tokio::test]
async fn missing_catalogue_is_fatal() {
    let loader = CatalogueLoader::new(Arc::new(MemorySource::new()), endpoints());
    let err = loader.load().await.unwrap_err();
    match err {
        FetchError::Catalogue { tried } => assert_eq!(tried.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn failed_popularity_window_reads_as_zero() {
    let source = full_source();
    source.insert_status("https://stats/org/html/files?period=week", 503);
    source.insert("https://stats/org/html/files?period=day", "not json");
    let loader = CatalogueLoader::new(Arc::new(source), endpoints());

    let cat = loader.load().await.unwrap();
    assert_eq!(cat.popularity().hits(Period::Week, 2), 0);
    assert_eq!(cat.popularity().hits(Period::Day, 2), 0);
    assert_eq!(cat.popularity().hits(Period::Month, 1), 100);
}

#[tokio::test(start_paused = true)]
async fn popularity_windows_are_fetched_concurrently() {
    let source = full_source().with_delay(tokio::time::Duration::from_millis(50));
    let source = Arc::new(source);
    let loader = CatalogueLoader::new(source.clone(), endpoints());
    loader.fetch_popularity().await;
    assert_eq!(source.peak_in_flight(), 4);
}
