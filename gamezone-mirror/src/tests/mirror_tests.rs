use std::io::Read;

use flate2::read::GzDecoder;
use gamezone_fetch::MemorySource;
use gamezone_lib::Backoff;
use tokio::time::Duration;

use super::*;
use crate::manifest::read_manifest;

const ZONES: &str = r#"[
    {"id": -1, "name": "Pinned", "url": "{HTML_URL}/-1.html", "cover": "{COVER_URL}/-1.png"},
    {"id": 1, "name": "Alpha", "url": "{HTML_URL}/1.html", "cover": "{COVER_URL}/1.png"},
    {"id": 2, "name": "Beta Game", "url": "{HTML_URL}/2.html", "cover": "{COVER_URL}/2.png"},
    {"id": 3, "name": "Gamma", "url": "{HTML_URL}/3.html"}
]"#;

fn endpoints() -> Endpoints {
    Endpoints {
        catalogue_cdn: "https://cdn/assets".into(),
        catalogue_aliases: vec!["latest".into()],
        revision_api: "https://api/assets".into(),
        revision_raw: "https://raw/assets".into(),
        html_base: "https://html".into(),
        cover_base: "https://covers".into(),
        ..Endpoints::default()
    }
}

fn source() -> MemorySource {
    let source = MemorySource::new();
    source.insert("https://cdn/assets@latest/zones.json", ZONES);
    source.insert(
        "https://html/1.html",
        r#"<html><head><base href="https://cdn.example/1/"></head>alpha</html>"#,
    );
    source.insert("https://html/2.html", "<html>beta</html>");
    source.insert("https://covers/1.png", vec![0x89, b'P', b'N', b'G', 1]);
    source.insert("https://covers/2.png", vec![0x89, b'P', b'N', b'G', 2]);
    source
}

struct Fixture {
    _tmp: tempfile::TempDir,
    output: PathBuf,
    checkout: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("games");
        let checkout = tmp.path().join("assets");
        let zone = checkout.join("1");
        std::fs::create_dir_all(zone.join("levels")).unwrap();
        std::fs::write(zone.join("index.html"), "placeholder").unwrap();
        std::fs::write(zone.join("cover.png"), "placeholder").unwrap();
        std::fs::write(zone.join("game.js"), "console.log(1)").unwrap();
        std::fs::write(zone.join("sprite.png"), [1u8, 2, 3]).unwrap();
        std::fs::write(zone.join("levels/one.html"), "<base href='/x/'>level").unwrap();
        Self {
            _tmp: tmp,
            output,
            checkout,
        }
    }

    fn options(&self) -> MirrorOptions {
        MirrorOptions {
            output_dir: self.output.clone(),
            jobs: 4,
            retry: RetryPolicy::none(),
            assets: Some(AssetRepo::new("unused", "main", self.checkout.clone())),
            sync_assets: false,
            no_log: false,
        }
    }
}

async fn run(source: &Arc<MemorySource>, options: &MirrorOptions) -> MirrorReport {
    let (tx, _rx) = mpsc::unbounded_channel();
    run_mirror(source.clone(), &endpoints(), options, tx).await.unwrap()
}

fn gunzip(path: &Path) -> String {
    let data = std::fs::read(path).unwrap();
    let mut out = String::new();
    GzDecoder::new(&data[..]).read_to_string(&mut out).unwrap();
    out
}

#[tokio::test]
async fn first_run_mirrors_every_entry() {
    let fx = Fixture::new();
    let source = Arc::new(source());
    let report = run(&source, &fx.options()).await;

    assert_eq!(report.status_of(-1), None);
    assert_eq!(report.status_of(1), Some(EntryStatus::New));
    assert_eq!(report.status_of(2), Some(EntryStatus::New));
    assert_eq!(report.status_of(3), Some(EntryStatus::Failed));

    let alpha = fx.output.join("Alpha");
    assert_eq!(
        gunzip(&alpha.join(INDEX_FILE)),
        r#"<html><head><base href="./"></head>alpha</html>"#
    );
    assert_eq!(gunzip(&alpha.join("game.js.gz")), "console.log(1)");
    assert!(!alpha.join("game.js").exists());
    assert_eq!(gunzip(&alpha.join("levels/one.html.gz")), r#"<base href="./">level"#);
    assert_eq!(std::fs::read(alpha.join("sprite.png")).unwrap(), [1, 2, 3]);
    assert!(!alpha.join("index.html").exists());
    assert_eq!(std::fs::read(alpha.join(COVER_FILE)).unwrap(), [0x89, b'P', b'N', b'G', 1]);
    assert!(alpha.join(HASH_MARKER).exists());
    assert!(!fx.output.join("Gamma").exists());

    let manifest = read_manifest(&fx.output).unwrap();
    let folders: Vec<(i64, &str)> = manifest.iter().map(|r| (r.id, r.folder.as_str())).collect();
    assert_eq!(folders, vec![(1, "Alpha"), (2, "Beta_Game")]);

    let log_path = report.log_path.unwrap();
    let log_name = log_path.file_name().unwrap().to_str().unwrap();
    assert!(log_name.starts_with("mirror-log-") && log_name.ends_with(".txt"));
}

#[tokio::test]
async fn unchanged_second_run_skips_everything() {
    let fx = Fixture::new();
    let source = Arc::new(source());
    run(&source, &fx.options()).await;
    source.clear_requests();

    let report = run(&source, &fx.options()).await;
    assert_eq!(report.status_of(1), Some(EntryStatus::Skipped));
    assert_eq!(report.status_of(2), Some(EntryStatus::Skipped));
    let summary = report.summary();
    assert_eq!((summary.new, summary.updated, summary.skipped), (0, 0, 2));
    assert_eq!(source.request_count("https://covers/"), 0);
    assert_eq!(read_manifest(&fx.output).unwrap().len(), 2);
}

#[tokio::test]
async fn changed_document_updates_only_that_entry() {
    let fx = Fixture::new();
    let source = Arc::new(source());
    run(&source, &fx.options()).await;

    source.insert("https://html/2.html", "<html>beta v2</html>");
    let report = run(&source, &fx.options()).await;
    assert_eq!(report.status_of(1), Some(EntryStatus::Skipped));
    assert_eq!(report.status_of(2), Some(EntryStatus::Updated));
    assert_eq!(
        gunzip(&fx.output.join("Beta_Game").join(INDEX_FILE)),
        "<html>beta v2</html>"
    );
}

#[tokio::test]
async fn changed_assets_update_the_entry() {
    let fx = Fixture::new();
    let source = Arc::new(source());
    run(&source, &fx.options()).await;

    std::fs::write(fx.checkout.join("1/game.js"), "console.log(2)").unwrap();
    let report = run(&source, &fx.options()).await;
    assert_eq!(report.status_of(1), Some(EntryStatus::Updated));
    assert_eq!(report.status_of(2), Some(EntryStatus::Skipped));
    assert_eq!(gunzip(&fx.output.join("Alpha/game.js.gz")), "console.log(2)");
}

#[tokio::test]
async fn failed_sync_keeps_hashing_existing_checkout() {
    let fx = Fixture::new();
    let source = Arc::new(source());
    run(&source, &fx.options()).await;

    // The repository URL is unreachable, so the sync step fails.
    let options = MirrorOptions {
        sync_assets: true,
        ..fx.options()
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = run_mirror(source.clone(), &endpoints(), &options, tx).await.unwrap();

    assert_eq!(report.status_of(1), Some(EntryStatus::Skipped));
    assert_eq!(report.status_of(2), Some(EntryStatus::Skipped));
    let mut unavailable = false;
    while let Some(event) = rx.recv().await {
        unavailable |= matches!(event, MirrorEvent::AssetsUnavailable { .. });
    }
    assert!(!unavailable);
}

#[tokio::test]
async fn failed_sync_without_checkout_mirrors_documents_only() {
    let tmp = tempfile::tempdir().unwrap();
    let options = MirrorOptions {
        retry: RetryPolicy::none(),
        assets: Some(AssetRepo::new("unused", "main", tmp.path().join("missing"))),
        sync_assets: true,
        ..MirrorOptions::new(tmp.path().join("out"))
    };
    let report = run(&Arc::new(source()), &options).await;

    assert_eq!(report.status_of(1), Some(EntryStatus::New));
    assert!(!tmp.path().join("out/Alpha/game.js.gz").exists());
}

#[tokio::test]
async fn failed_download_leaves_folder_untouched() {
    let fx = Fixture::new();
    let source = Arc::new(source());
    run(&source, &fx.options()).await;
    let alpha = fx.output.join("Alpha");
    let marker = std::fs::read_to_string(alpha.join(HASH_MARKER)).unwrap();
    let index = std::fs::read(alpha.join(INDEX_FILE)).unwrap();

    source.insert_status("https://html/1.html", 503);
    let report = run(&source, &fx.options()).await;

    let outcome = report.outcomes.iter().find(|o| o.id == 1).unwrap();
    assert_eq!(outcome.status, EntryStatus::Failed);
    assert!(outcome.error.as_deref().unwrap().contains("503"));
    assert_eq!(std::fs::read_to_string(alpha.join(HASH_MARKER)).unwrap(), marker);
    assert_eq!(std::fs::read(alpha.join(INDEX_FILE)).unwrap(), index);

    // The folder still exists, so the entry stays in the manifest.
    let ids: Vec<i64> = read_manifest(&fx.output).unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn missing_cover_is_a_warning() {
    let fx = Fixture::new();
    let source = source();
    source.remove("https://covers/2.png");
    let report = run(&Arc::new(source), &fx.options()).await;

    let beta = report.outcomes.iter().find(|o| o.id == 2).unwrap();
    assert_eq!(beta.status, EntryStatus::New);
    assert_eq!(beta.warnings.len(), 1);
    assert!(!fx.output.join("Beta_Game").join(COVER_FILE).exists());
}

#[tokio::test]
async fn download_is_retried_per_policy() {
    let fx = Fixture::new();
    let source = source();
    source.remove("https://html/2.html");
    let source = Arc::new(source);
    let options = MirrorOptions {
        retry: RetryPolicy::new(2, Duration::from_millis(1), Backoff::Fixed),
        ..fx.options()
    };

    let report = run(&source, &options).await;
    assert_eq!(report.status_of(2), Some(EntryStatus::Failed));
    assert_eq!(source.request_count("https://html/2.html"), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn never_more_than_jobs_in_flight() {
    let tmp = tempfile::tempdir().unwrap();
    let source = MemorySource::new().with_delay(Duration::from_millis(20));
    let zones: Vec<String> = (1..=20)
        .map(|id| format!(r#"{{"id":{id},"name":"Game {id}","url":"{{HTML_URL}}/{id}.html"}}"#))
        .collect();
    source.insert("https://cdn/assets@latest/zones.json", format!("[{}]", zones.join(",")));
    for id in 1..=20 {
        source.insert(format!("https://html/{id}.html"), format!("<p>{id}</p>"));
    }
    let source = Arc::new(source);
    let options = MirrorOptions {
        jobs: 3,
        retry: RetryPolicy::none(),
        no_log: true,
        ..MirrorOptions::new(tmp.path().join("out"))
    };

    let report = run(&source, &options).await;
    assert_eq!(report.summary().new, 20);
    assert!(report.log_path.is_none());
    let peak = source.peak_in_flight();
    assert!(peak <= 3, "peak in flight was {peak}");
    assert!(peak > 1, "workers never overlapped");
}

#[tokio::test]
async fn unreachable_catalogue_writes_empty_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let options = MirrorOptions {
        retry: RetryPolicy::none(),
        ..MirrorOptions::new(tmp.path().join("out"))
    };
    let report = run(&Arc::new(MemorySource::new()), &options).await;

    assert!(report.outcomes.is_empty());
    assert!(report.catalogue_error.is_some());
    assert_eq!(std::fs::read_to_string(report.manifest_path).unwrap(), "[]");
}

#[tokio::test]
async fn events_cover_the_whole_run() {
    let fx = Fixture::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    run_mirror(Arc::new(source()), &endpoints(), &fx.options(), tx)
        .await
        .unwrap();

    let mut finished = 0;
    let mut last = None;
    while let Some(event) = rx.recv().await {
        if matches!(event, MirrorEvent::EntryFinished(_)) {
            finished += 1;
        }
        last = Some(event);
    }
    assert_eq!(finished, 3);
    assert!(matches!(last, Some(MirrorEvent::Done)));
}
