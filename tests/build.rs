//! End-to-end build of the testdata project into a scratch directory.

use std::path::{Path, PathBuf};

use vita::build::build_site;
use vita::config::Config;

fn scratch_directory() -> PathBuf {
    std::env::temp_dir().join(format!("vita-build-test-{}", std::process::id()))
}

#[test]
fn test_build_site() {
    let out = scratch_directory();
    let _ = std::fs::remove_dir_all(&out);

    let config = Config::from_project_file(
        Path::new("./testdata/site/vita.yaml"),
        &out,
    )
    .expect("config should load");
    build_site(config).expect("build should succeed");

    // the listing page lists every publication in file-name order, each
    // linking to its slugged detail route
    let listing =
        std::fs::read_to_string(out.join("publications/index.html"))
            .expect("listing page should exist");
    assert!(listing.contains("<h1>Publications</h1>"));
    assert!(listing.contains(r#"href="/publications/attention-is-all-you-need""#));
    assert!(listing.contains(r#"href="/publications/gpt-3-language-models""#));
    assert!(listing.contains(r#"href="/publications/missing-thumb""#));
    let attention = listing.find("Attention Is All You Need").unwrap();
    let gpt3 = listing.find("GPT-3: Language Models").unwrap();
    assert!(attention < gpt3);

    // the resolved thumbnail points into the static output tree
    assert!(listing.contains(
        r#"src="https://example.org/static/thumbnails/attention.png""#
    ));

    // one detail page per publication, at the extensionless route
    for slug in &[
        "attention-is-all-you-need",
        "gpt-3-language-models",
        "missing-thumb",
    ] {
        let path = out.join("publications").join(slug).join("index.html");
        assert!(path.is_file(), "missing detail page: {}", path.display());
    }
    let detail = std::fs::read_to_string(
        out.join("publications/attention-is-all-you-need/index.html"),
    )
    .unwrap();
    assert!(detail.contains("<h1>Attention Is All You Need</h1>"));
    assert!(detail.contains("<strong>Transformer</strong>"));

    // static outputs: the user's static files, the stylesheet, and the
    // thumbnail plus its pre-generated 400w variant
    assert!(out.join("static/cv.txt").is_file());
    let stylesheet =
        std::fs::read_to_string(out.join("static/style.css")).unwrap();
    assert!(stylesheet.contains(".publications-container"));
    assert!(out.join("static/thumbnails/attention.png").is_file());
    assert!(out.join("static/thumbnails/attention-400w.png").is_file());

    // the feed carries the dated publications only
    let feed = std::fs::read_to_string(out.join("feed.atom")).unwrap();
    assert!(feed.contains("Attention Is All You Need"));
    assert!(feed.contains("Missing Thumb"));
    assert!(!feed.contains("GPT-3"));

    let _ = std::fs::remove_dir_all(&out);
}
