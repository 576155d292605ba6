//! Integration tests for the mirror
//!
//! These tests use wiremock to create mock HTTP servers and tempfile
//! directories to run the full fetch → write → extract cycle end-to-end.

use doc_mirror::config::{Config, OutputFormat};
use doc_mirror::{mirror, ConfigError, MirrorError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration mirroring `base_url` into `output`
fn create_test_config(base_url: &str, output: &Path, format: OutputFormat) -> Config {
    let mut config = Config::default();
    config.mirror.base_url = base_url.to_string();
    config.mirror.output_dir = output.to_path_buf();
    config.mirror.format = format;
    config.user_agent.crawler_name = "TestMirror".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.fetch.timeout_secs = 5;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_markdown_mirror_end_to_end() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home | Docs</title></head><body><p>Hello <strong>world</strong></p><a href="/guide">Guide</a></body></html>"#,
    )
    .await;

    // Linked from both pages and under two spellings; fetched once
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html(
            r#"<h1>Guide</h1><a href="/">Home</a><a href="/guide?tab=2#install">Again</a><a href="/guide">Self</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&base_url, out.path(), OutputFormat::Markdown);
    let report = mirror(config).await.unwrap();

    assert_eq!(report.pages_saved, 2);
    assert_eq!(report.total_failures(), 0);

    let index = fs::read_to_string(out.path().join("index.md")).unwrap();
    assert!(index.starts_with("---\ntitle: Home\n"));
    assert!(index.contains(&format!("source: {}/\n", base_url)));
    assert!(index.contains("\ndownloaded: "));

    let body = index.splitn(3, "---\n").nth(2).unwrap();
    assert_eq!(
        body,
        format!("Hello **world**\n\n[Guide]({}/guide)\n", base_url)
    );

    let guide = fs::read_to_string(out.path().join("guide/index.md")).unwrap();
    assert!(guide.contains("# Guide"));
}

#[tokio::test]
async fn test_html_format_keeps_bytes() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let page = r#"<html><body><p>Raw   <b>page</b></p><a href="/docs/start.html">Start</a></body></html>"#;

    mount_page(&server, "/", page).await;
    mount_page(&server, "/docs/start.html", "<p>start</p>").await;

    let config = create_test_config(&server.uri(), out.path(), OutputFormat::Html);
    mirror(config).await.unwrap();

    assert_eq!(fs::read_to_string(out.path().join("index.html")).unwrap(), page);
    assert_eq!(
        fs::read_to_string(out.path().join("docs/start.html")).unwrap(),
        "<p>start</p>"
    );
}

#[tokio::test]
async fn test_cross_host_links_never_fetched() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="{}/elsewhere">Other</a><a href="mailto:team@example.com">Mail</a><img src="{}/logo.png">"#,
            other.uri(),
            other.uri()
        ),
    )
    .await;

    Mock::given(method("GET"))
        .respond_with(html("<p>should not be fetched</p>"))
        .expect(0)
        .mount(&other)
        .await;

    let config = create_test_config(&server.uri(), out.path(), OutputFormat::Html);
    let report = mirror(config).await.unwrap();

    assert_eq!(report.pages_saved, 1);
}

#[tokio::test]
async fn test_assets_written_verbatim() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let png = vec![0x89u8, b'P', b'N', b'G', 0, 1, 2, 3];

    mount_page(
        &server,
        "/",
        r#"<p>Logo</p><img src="/img/logo.png" alt="logo"><a href="/data">Data</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png.clone(), "image/png"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), out.path(), OutputFormat::Markdown);
    let report = mirror(config).await.unwrap();

    assert_eq!(report.pages_saved, 3);
    assert_eq!(fs::read(out.path().join("img/logo.png")).unwrap(), png);
    // Non-HTML without an extension still maps to an index file
    assert_eq!(
        fs::read_to_string(out.path().join("data/index.html")).unwrap(),
        "{}"
    );
}

#[tokio::test]
async fn test_markdown_mode_skips_scripts_and_stylesheets() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><head><link rel="stylesheet" href="/style.css"><script src="/app.js"></script></head><body><p>Hi</p></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("body{}", "text/css"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("x()", "text/javascript"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), out.path(), OutputFormat::Markdown);
    let report = mirror(config).await.unwrap();

    assert_eq!(report.pages_saved, 1);
}

#[tokio::test]
async fn test_html_mode_fetches_scripts_and_stylesheets() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><head><link rel="stylesheet" href="/style.css"><script src="/app.js"></script></head><body></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("body{}", "text/css"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("x()", "text/javascript"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), out.path(), OutputFormat::Html);
    mirror(config).await.unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("style.css")).unwrap(),
        "body{}"
    );
    assert_eq!(fs::read_to_string(out.path().join("app.js")).unwrap(), "x()");
}

#[tokio::test]
async fn test_no_follow_fetches_only_seeds_and_assets() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/next">Next</a><img src="/pic.gif">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html("<p>next</p>"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pic.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("GIF89a", "image/gif"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), out.path(), OutputFormat::Html);
    config.mirror.follow_links = false;
    let report = mirror(config).await.unwrap();

    assert_eq!(report.pages_saved, 2);
}

#[tokio::test]
async fn test_fetch_failure_does_not_stop_run() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/missing">Missing</a><a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>fine</p>").await;

    let config = create_test_config(&server.uri(), out.path(), OutputFormat::Html);
    let report = mirror(config).await.unwrap();

    assert_eq!(report.pages_saved, 2);
    assert_eq!(report.fetch_failures, 2);
    assert!(out.path().join("ok/index.html").exists());
    assert!(!out.path().join("missing").exists());
}

#[tokio::test]
async fn test_write_failure_does_not_stop_run() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // `a.png` is saved as a file, so `a.png/b/index.html` cannot be created
    mount_page(
        &server,
        "/",
        r#"<img src="/a.png"><a href="/a.png/b">Nested</a><a href="/ok">Ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("PNG", "image/png"))
        .mount(&server)
        .await;
    mount_page(&server, "/a.png/b", r#"<a href="/never">Never</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/never"))
        .respond_with(html("<p>never</p>"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>fine</p>").await;

    let config = create_test_config(&server.uri(), out.path(), OutputFormat::Html);
    let report = mirror(config).await.unwrap();

    assert_eq!(report.write_failures, 1);
    assert_eq!(report.pages_saved, 3);
    assert_eq!(fs::read_to_string(out.path().join("a.png")).unwrap(), "PNG");
    assert!(out.path().join("ok/index.html").exists());
}

#[tokio::test]
async fn test_referer_sent_for_discovered_links() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let base_url = server.uri();

    mount_page(&server, "/", r#"<a href="/child">Child</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/child"))
        .and(header("referer", format!("{}/", base_url).as_str()))
        .respond_with(html("<p>child</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&base_url, out.path(), OutputFormat::Html);
    let report = mirror(config).await.unwrap();

    assert_eq!(report.fetch_failures, 0);
}

#[tokio::test]
async fn test_paths_file_seeds_the_crawl() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>root</p>"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/api/", "<p>api</p>").await;
    mount_page(&server, "/api/units", "<p>units</p>").await;

    let mut seeds = NamedTempFile::new().unwrap();
    writeln!(seeds, "# api\n/api/\n\n  /api/units  \nhttps://elsewhere.test/").unwrap();

    let mut config = create_test_config(&server.uri(), out.path(), OutputFormat::Markdown);
    config.mirror.paths_file = Some(seeds.path().to_path_buf());
    config.mirror.follow_links = false;
    let report = mirror(config).await.unwrap();

    assert_eq!(report.pages_saved, 2);
    assert!(out.path().join("api/index.md").exists());
    assert!(out.path().join("api/units/index.md").exists());
}

#[tokio::test]
async fn test_unsupported_base_scheme_is_fatal() {
    let out = TempDir::new().unwrap();
    let config = create_test_config("ftp://docs.example.com/", out.path(), OutputFormat::Html);

    let result = mirror(config).await;
    assert!(matches!(
        result,
        Err(MirrorError::Config(ConfigError::UnsupportedScheme(_)))
    ));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}
