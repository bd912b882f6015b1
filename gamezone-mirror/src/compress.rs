//! HTML fix-ups and gzip compression for mirrored files.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use flate2::Compression;
use flate2::write::GzEncoder;
use regex::Regex;

/// Extensions compressed to `<name>.<ext>.gz`.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "html", "htm", "js", "mjs", "css", "json", "txt", "svg", "xml", "map", "csv", "wasm",
];

/// Replacement for every `<base href=...>` tag.
pub const RELATIVE_BASE: &str = r#"<base href="./">"#;

static BASE_HREF: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<base\b[^>]*\bhref\s*=[^>]*>").ok());

/// Point any `<base href=...>` at the mirror folder itself.
pub fn rewrite_base_href(html: &str) -> Cow<'_, str> {
    match BASE_HREF.as_ref() {
        Some(re) => re.replace_all(html, RELATIVE_BASE),
        None => Cow::Borrowed(html),
    }
}

/// Whether a file is text-like and gets compressed.
pub fn is_text_asset(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext)))
}

pub fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

pub fn gzip_bytes(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

/// `file.ext` becomes `file.ext.gz`.
pub fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Replace `path` with its gzip-compressed `.gz` sibling.
pub fn gzip_in_place(path: &Path) -> io::Result<PathBuf> {
    let data = std::fs::read(path)?;
    let target = gz_path(path);
    std::fs::write(&target, gzip_bytes(&data)?)?;
    std::fs::remove_file(path)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn gunzip(data: &[u8]) -> String {
        let mut out = String::new();
        GzDecoder::new(data).read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn rewrites_base_href_variants() {
        let html = r#"<head><base href="https://cdn.example/g/12/"><title>x</title></head>"#;
        assert_eq!(
            rewrite_base_href(html),
            r#"<head><base href="./"><title>x</title></head>"#
        );
        assert_eq!(
            rewrite_base_href("<BASE target=_top HREF='/a/' />"),
            r#"<base href="./">"#
        );
        assert_eq!(
            rewrite_base_href("<base\n  href=\"../\">"),
            r#"<base href="./">"#
        );
    }

    #[test]
    fn leaves_documents_without_base_alone() {
        let html = "<html><basefont size=3><a href=\"x\">x</a></html>";
        assert!(matches!(rewrite_base_href(html), Cow::Borrowed(_)));
    }

    #[test]
    fn text_extensions_are_case_insensitive() {
        assert!(is_text_asset(Path::new("a/b/game.JS")));
        assert!(is_text_asset(Path::new("engine.wasm")));
        assert!(is_text_asset(Path::new("index.html")));
        assert!(!is_text_asset(Path::new("cover.png")));
        assert!(!is_text_asset(Path::new("Makefile")));
    }

    #[test]
    fn gzip_in_place_replaces_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("style.css");
        std::fs::write(&path, "body{margin:0}").unwrap();

        let gz = gzip_in_place(&path).unwrap();
        assert_eq!(gz, tmp.path().join("style.css.gz"));
        assert!(!path.exists());
        assert_eq!(gunzip(&std::fs::read(gz).unwrap()), "body{margin:0}");
    }
}
