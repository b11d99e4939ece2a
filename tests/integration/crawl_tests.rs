//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog and run the full
//! crawl cycle end-to-end: summary, listing pages, detail pages, images,
//! and the export files.

use puzzle_crawler::cache::StorageLayout;
use puzzle_crawler::config::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use puzzle_crawler::crawler::{run_crawl, Coordinator};
use puzzle_crawler::CrawlError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock catalog
fn create_test_config(host_url: &str, base_dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            host_url: format!("{}/", host_url),
            start_page: "proizvoditeli.html".to_string(),
            catalog_name: "Производители".to_string(),
            excluded_marker: "3d".to_string(),
        },
        crawler: CrawlerConfig {
            max_connections: 4,
            retry_backoff_ms: 10, // Very short for testing
            request_timeout_secs: 5,
            accept_invalid_certs: false,
        },
        output: OutputConfig {
            base_directory: base_dir.to_path_buf(),
            table_name: "puzzles".to_string(),
            csv_separator: ";".to_string(),
        },
    }
}

fn listing_page(per_page: u32, total: u32, links: &[&str]) -> String {
    let cards: String = links
        .iter()
        .map(|href| {
            format!(
                r#"<div class="card"><div class="card-body"><a href="{}">card</a></div></div>"#,
                href
            )
        })
        .collect();

    format!(
        r#"<html><body>
        {}
        <div class="navigation">
            Показано <span class="bold">1-{}</span> по <span class="bold">{}</span>
            из <span class="bold">{}</span>
        </div>
        </body></html>"#,
        cards, per_page, per_page, total
    )
}

fn detail_page(image: &str, article: u32, title: &str, properties: &[(&str, &str)]) -> String {
    let rows: String = properties
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="row">
                    <div class="col-12 col-md-5 font-weight-bold">{}</div>
                    <div class="col-12 col-md-7"><div class="spec-value">{}</div></div>
                </div>"#,
                label, value
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <div class="card-body">
            <a href="{}"><img src="thumb.jpg"></a>
            <div class="col-12 col-md-5 font-weight-bold">Артикул: {}</div>
            <h1>{}</h1>
            <div class="description extra_fields text-muted">{}</div>
        </div>
        </body></html>"#,
        image, article, title, rows
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, route: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .expect(hits)
        .mount(server)
        .await;
}

/// Mounts a two-page catalog with five listed items
///
/// Page 1: two good puzzles and one excluded by URL.
/// Page 2: one excluded by title and one with an unreadable size.
async fn mount_catalog(server: &MockServer, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/proizvoditeli.html"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            3,
            5,
            &[
                "/puzzle/more-500-detalej.html",
                "/puzzle/les-1000-detalej.html",
                "/puzzle/3d-bashnya.html",
            ],
        )))
        .expect(hits)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/proizvoditeli.html"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            3,
            5,
            &["/puzzle/kosmos.html", "/puzzle/slomannyj.html"],
        )))
        .expect(hits)
        .mount(server)
        .await;

    mount_html(
        server,
        "/puzzle/more-500-detalej.html",
        detail_page(
            "/images/more.jpg",
            101,
            r#"Пазл "Море" 500 деталей"#,
            &[
                ("Количество деталей:", "500"),
                ("Размер пазла:", "48 x 34 см"),
                ("Производитель:", "Castorland (Польша)"),
            ],
        ),
        hits,
    )
    .await;

    mount_html(
        server,
        "/puzzle/les-1000-detalej.html",
        detail_page(
            "/images/les.jpg",
            102,
            "Пазл Ravensburger Лес 1000",
            &[("Количество деталей:", "1"), ("Размер пазла:", "70 x 50")],
        ),
        hits,
    )
    .await;

    mount_html(
        server,
        "/puzzle/kosmos.html",
        detail_page(
            "/images/kosmos.jpg",
            103,
            "Пазл 3D Космос",
            &[("Размер пазла:", "20 x 20")],
        ),
        hits,
    )
    .await;

    mount_html(
        server,
        "/puzzle/slomannyj.html",
        detail_page(
            "/images/slomannyj.jpg",
            104,
            "Пазл Сломанный 500",
            &[("Размер пазла:", "20 x 30 x 5")],
        ),
        hits,
    )
    .await;

    // Never requested
    mount_html(server, "/puzzle/3d-bashnya.html", String::new(), 0).await;
    mount_image(server, "/images/kosmos.jpg", 0).await;
    mount_image(server, "/images/slomannyj.jpg", 0).await;

    mount_image(server, "/images/more.jpg", hits).await;
    mount_image(server, "/images/les.jpg", hits).await;
}

fn exported_files(dir: &Path, extension: &str) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect()
}

#[tokio::test]
async fn test_full_crawl() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1).await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    let outcome = run_crawl(config).await.expect("Crawl should succeed");
    let report = &outcome.report;

    // Two records, in whatever order the tasks finished
    let mut records = report.records.clone();
    records.sort_by_key(|r| r.article_number);
    assert_eq!(records.len(), 2);

    let sea = &records[0];
    assert_eq!(sea.article_number, 101);
    assert_eq!(sea.title, "Море");
    assert_eq!(sea.elements_count, 500);
    assert_eq!((sea.width, sea.height), (48.0, 34.0));
    assert_eq!(sea.manufacturer, "Castorland");
    assert_eq!(sea.country, "Польша");
    assert_eq!(
        sea.url,
        format!("{}/puzzle/more-500-detalej.html", mock_server.uri())
    );

    // Piece count recovered from the URL, manufacturer from the title
    let forest = &records[1];
    assert_eq!(forest.article_number, 102);
    assert_eq!(forest.elements_count, 1000);
    assert_eq!(forest.manufacturer, "Ravensburger");
    assert_eq!(forest.country, "");

    // Images are stored under images/ and the records point at them
    let layout = StorageLayout::new(temp_dir.path());
    assert_eq!(
        sea.image_path,
        layout.images_dir().join("more.jpg").display().to_string()
    );
    assert!(layout.images_dir().join("more.jpg").exists());
    assert!(layout.images_dir().join("les.jpg").exists());
    assert!(!layout.images_dir().join("kosmos.jpg").exists());

    // Listing pages and detail documents are cached
    assert!(layout.pages_dir().join("proizvoditeli_1.html").exists());
    assert!(layout.pages_dir().join("proizvoditeli_2.html").exists());
    assert!(layout.puzzles_dir().join("more-500-detalej.html").exists());
    assert!(!layout.puzzles_dir().join("3d-bashnya.html").exists());

    // Five listed, two excluded; the malformed item is not discarded
    let counters = report.counters;
    assert_eq!(counters.expected_pages, 2);
    assert_eq!(counters.completed_pages, 2);
    assert_eq!(counters.expected_items, 3);
    assert_eq!(counters.completed_items, 2);
    assert_eq!(report.malformed, 1);
    assert!(counters.is_consistent());

    // Both export files share one timestamp
    assert_eq!(outcome.exports.len(), 2);
    let csv = std::fs::read_to_string(&outcome.exports[0]).unwrap();
    let sql = std::fs::read_to_string(&outcome.exports[1]).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert_eq!(sql.lines().count(), 2);
    assert!(sql.contains("INSERT INTO puzzles VALUES(101,'Море',500,48,34,'Castorland','Польша',"));
    assert_eq!(
        outcome.exports[0].file_stem(),
        outcome.exports[1].file_stem()
    );
}

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    // Every document and image may be fetched once across both runs
    mount_catalog(&mock_server, 1).await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    let first = run_crawl(config.clone()).await.expect("First crawl should succeed");
    let second = run_crawl(config).await.expect("Second crawl should succeed");

    assert_eq!(first.report.records.len(), second.report.records.len());
    assert_eq!(first.report.counters, second.report.counters);

    // The malformed page stays cached and malformed
    assert_eq!(second.report.malformed, 1);

    // Exports from both runs can share a second; at least one pair exists
    assert!(!exported_files(temp_dir.path(), "csv").is_empty());
    assert!(!exported_files(temp_dir.path(), "sql").is_empty());
}

#[tokio::test]
async fn test_missing_summary_aborts_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/proizvoditeli.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Технические работы</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    let result = run_crawl(config).await;

    assert!(matches!(result, Err(CrawlError::Summary(_))));
    assert!(exported_files(temp_dir.path(), "csv").is_empty());
}

#[tokio::test]
async fn test_http_error_status_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/proizvoditeli.html",
        listing_page(10, 2, &["/puzzle/propal.html", "/puzzle/more-500-detalej.html"]),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/puzzle/propal.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/puzzle/more-500-detalej.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(
            "/images/more.jpg",
            101,
            r#"Пазл "Море" 500 деталей"#,
            &[("Размер пазла:", "48 x 34")],
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/more.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8]))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());

    let result = run_crawl(config).await;

    match result {
        Err(CrawlError::Status { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/puzzle/propal.html"));
        }
        other => panic!("expected a status error, got {:?}", other.map(|o| o.report)),
    }
    assert!(exported_files(temp_dir.path(), "sql").is_empty());
}

#[tokio::test]
async fn test_coordinator_sizes_crawl_from_summary() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/proizvoditeli.html",
        listing_page(20, 45, &[]),
        1,
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path());
    let layout = StorageLayout::new(temp_dir.path());
    layout.create_all().unwrap();

    let coordinator = Coordinator::new(&config, &layout).await.unwrap();
    let counters = coordinator.counters();

    assert_eq!(counters.expected_pages, 3);
    assert_eq!(counters.expected_items, 45);
    assert_eq!(counters.completed_pages, 0);
    assert!(layout.pages_dir().join("proizvoditeli_1.html").exists());
}
