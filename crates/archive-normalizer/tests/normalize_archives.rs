use std::io::{Cursor, Write};

use sitehost_archive::{
    normalize, ArchiveLimits, NormalizeErrKind, NormalizedSite, Normalizer, PayloadKind,
};
use zip::write::SimpleFileOptions;

fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(name.to_string(), SimpleFileOptions::default())
                .unwrap();
        } else {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

fn paths(site: &NormalizedSite) -> Vec<&str> {
    site.entries.iter().map(|entry| entry.path.as_str()).collect()
}

#[test]
fn flat_archive_keeps_layout() {
    let bytes = zip_of(&[("index.html", b"<p>home</p>"), ("css/site.css", b"body{}")]);
    let site = normalize("site.zip", &bytes).unwrap();
    assert_eq!(site.kind, PayloadKind::Archive);
    assert_eq!(site.collapsed_levels, 0);
    assert_eq!(paths(&site), vec!["css/site.css", "index.html"]);
}

#[test]
fn wrapper_directories_are_collapsed() {
    for depth in 1..=3usize {
        let prefix: String = (0..depth).map(|i| format!("w{i}/")).collect();
        let index = format!("{prefix}index.html");
        let asset = format!("{prefix}img/logo.png");
        let bytes = zip_of(&[(index.as_str(), b"<p>x</p>"), (asset.as_str(), b"png")]);

        let site = normalize("bundle.zip", &bytes).unwrap();
        assert_eq!(site.collapsed_levels, depth);
        assert_eq!(paths(&site), vec!["img/logo.png", "index.html"]);
    }
}

#[test]
fn site_folder_wrapper_with_directory_markers() {
    let bytes = zip_of(&[
        ("site/", b""),
        ("site/css/", b""),
        ("site/index.html", b"<p>home</p>"),
        ("site/css/a.css", b"a{}"),
    ]);
    let site = normalize("upload.zip", &bytes).unwrap();
    assert_eq!(site.collapsed_levels, 1);
    assert_eq!(paths(&site), vec!["css/a.css", "index.html"]);
    let index = site
        .entries
        .iter()
        .find(|entry| entry.path.as_str() == "index.html")
        .unwrap();
    assert_eq!(index.bytes, b"<p>home</p>");
}

#[test]
fn mixed_top_level_is_not_collapsed() {
    let bytes = zip_of(&[("a/index.html", b"a"), ("b/index.html", b"b")]);
    let site = normalize("two.zip", &bytes).unwrap();
    assert_eq!(site.collapsed_levels, 0);
    assert_eq!(paths(&site), vec!["a/index.html", "b/index.html"]);
}

#[test]
fn escaping_entries_are_discarded() {
    let bytes = zip_of(&[
        ("../../etc/passwd", b"root:x"),
        ("/etc/shadow", b"root:!"),
        ("public/index.html", b"ok"),
    ]);
    let site = normalize("evil.zip", &bytes).unwrap();
    assert_eq!(paths(&site), vec!["index.html"]);
}

#[test]
fn empty_and_directory_only_archives_yield_no_entries() {
    let empty = zip_of(&[]);
    assert!(normalize("empty.zip", &empty).unwrap().is_empty());

    let dirs = zip_of(&[("a/", b""), ("a/b/", b"")]);
    let site = normalize("dirs.zip", &dirs).unwrap();
    assert!(site.is_empty());
    assert_eq!(site.collapsed_levels, 0);
}

#[test]
fn mac_metadata_does_not_block_collapse() {
    let bytes = zip_of(&[
        ("site/index.html", b"<p>x</p>"),
        ("__MACOSX/site/._index.html", b"fork"),
        (".DS_Store", b"junk"),
    ]);
    let site = normalize("mac.zip", &bytes).unwrap();
    assert_eq!(site.collapsed_levels, 1);
    assert_eq!(paths(&site), vec!["index.html"]);

    let keep_all = Normalizer::new(ArchiveLimits {
        skip_os_metadata: false,
        ..ArchiveLimits::default()
    });
    let site = keep_all.normalize("mac.zip", &bytes).unwrap();
    assert_eq!(site.collapsed_levels, 0);
    assert_eq!(site.len(), 3);
}

#[test]
fn markup_becomes_default_document() {
    let site = normalize("About Us.HTM", b"<h1>about</h1>").unwrap();
    assert_eq!(site.kind, PayloadKind::Markup);
    assert_eq!(paths(&site), vec!["index.html"]);
    assert_eq!(site.entries[0].bytes, b"<h1>about</h1>");
}

#[test]
fn opaque_file_keeps_its_base_name() {
    let site = normalize("C:\\fakepath\\report.pdf", b"%PDF").unwrap();
    assert_eq!(site.kind, PayloadKind::Opaque);
    assert_eq!(paths(&site), vec!["report.pdf"]);
    assert_eq!(site.entries[0].bytes.len(), 4);
}

#[test]
fn corrupt_zip_is_reported() {
    let err = normalize("broken.zip", b"definitely not a zip").unwrap_err();
    assert!(matches!(err.kind(), NormalizeErrKind::CorruptArchive(_)));
}

#[test]
fn unsupported_inputs_are_reported() {
    let err = normalize("site.tar.gz", b"\x1f\x8b").unwrap_err();
    assert!(matches!(err.kind(), NormalizeErrKind::UnsupportedFormat(_)));

    let err = normalize("", b"bytes").unwrap_err();
    assert_eq!(err.code(), "unsupported_format");
}

#[test]
fn expansion_limit_rejects_large_archives() {
    let big = vec![b'z'; 4096];
    let bytes = zip_of(&[("a.bin", big.as_slice()), ("b.bin", big.as_slice())]);
    let normalizer = Normalizer::new(ArchiveLimits {
        max_total_bytes: 6000,
        ..ArchiveLimits::default()
    });
    let err = normalizer.normalize("big.zip", &bytes).unwrap_err();
    assert!(matches!(err.kind(), NormalizeErrKind::CorruptArchive(_)));
}
