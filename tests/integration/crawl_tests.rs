//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_sweep::config::Config;
use link_sweep::crawler::{run_crawl, Coordinator};
use link_sweep::url::LinkBase;
use link_sweep::{SweepError, VisitStatus};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML page containing one anchor per href
fn html_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>Test</title></head><body>{}</body></html>",
        anchors
    )
}

/// Response with the given status and an HTML body linking to `hrefs`
fn page(status: u16, hrefs: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_string(html_page(hrefs))
        .insert_header("content-type", "text/html")
}

/// Mounts a GET mock for `route`
async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts a GET mock for `route` that must be hit exactly `times` times
async fn mount_expecting(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Absolute URL of `route` on the mock server
fn url_of(server: &MockServer, route: &str) -> String {
    format!("{}{}", server.uri(), route)
}

fn config_for(server: &MockServer) -> Config {
    Config::for_seed(url_of(server, "/"))
}

#[tokio::test]
async fn test_alive_and_dead_links() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/a", "/b"])).await;
    mount(&server, "/a", page(200, &[])).await;
    mount(&server, "/b", page(404, &[])).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(report.alive, vec![url_of(&server, "/"), url_of(&server, "/a")]);
    assert_eq!(report.dead, vec![url_of(&server, "/b")]);
}

#[tokio::test]
async fn test_cyclic_links_terminate() {
    let server = MockServer::start().await;

    mount_expecting(&server, "/", page(200, &["/a"]), 1).await;
    mount_expecting(&server, "/a", page(200, &["/"]), 1).await;

    let report = tokio::time::timeout(Duration::from_secs(10), run_crawl(&config_for(&server)))
        .await
        .expect("Crawl did not terminate")
        .expect("Crawl failed");

    assert_eq!(report.total(), 2);
    assert_eq!(report.alive, vec![url_of(&server, "/"), url_of(&server, "/a")]);
}

#[tokio::test]
async fn test_shared_page_is_fetched_once() {
    let server = MockServer::start().await;

    let pages = ["/p1", "/p2", "/p3", "/p4", "/p5", "/p6", "/p7", "/p8"];
    mount_expecting(&server, "/", page(200, &pages), 1).await;
    for route in pages {
        mount_expecting(&server, route, page(200, &["/shared", "/", route]), 1).await;
    }
    mount_expecting(&server, "/shared", page(200, &pages), 1).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(report.total(), pages.len() + 2);
    assert!(report.dead.is_empty());
    // Wiremock verifies the `expect(1)` counts when the server drops
}

#[tokio::test]
async fn test_dead_page_body_is_still_parsed() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/missing"])).await;
    mount(&server, "/missing", page(404, &["/found"])).await;
    mount_expecting(&server, "/found", page(200, &[]), 1).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(
        report.status_of(&url_of(&server, "/missing")),
        Some(VisitStatus::Dead)
    );
    assert_eq!(
        report.status_of(&url_of(&server, "/found")),
        Some(VisitStatus::Alive)
    );
}

#[tokio::test]
async fn test_server_errors_are_dead() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/boom", "/gone", "/empty"])).await;
    mount(&server, "/boom", page(500, &[])).await;
    mount(&server, "/gone", page(410, &[])).await;
    mount(&server, "/empty", ResponseTemplate::new(204)).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(report.alive, vec![url_of(&server, "/")]);
    assert_eq!(
        report.dead,
        vec![
            url_of(&server, "/boom"),
            url_of(&server, "/empty"),
            url_of(&server, "/gone"),
        ]
    );
}

#[tokio::test]
async fn test_out_of_scope_links_are_not_followed() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        page(
            200,
            &[
                "https://other.invalid/x",
                "mailto:someone@example.com",
                "javascript:void(0)",
                "relative",
                "#fragment",
            ],
        ),
    )
    .await;
    mount_expecting(&server, "/relative", page(200, &[]), 0).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(report.alive, vec![url_of(&server, "/")]);
    assert!(report.dead.is_empty());
}

#[tokio::test]
async fn test_absolute_same_host_links_are_followed() {
    let server = MockServer::start().await;

    let absolute = url_of(&server, "/absolute");
    mount(&server, "/", page(200, &[absolute.as_str()])).await;
    mount_expecting(&server, "/absolute", page(200, &[]), 1).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(report.status_of(&absolute), Some(VisitStatus::Alive));
}

#[tokio::test]
async fn test_empty_href_points_at_seed() {
    let server = MockServer::start().await;

    mount_expecting(&server, "/", page(200, &["", "/"]), 1).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(report.alive, vec![url_of(&server, "/")]);
}

#[tokio::test]
async fn test_query_and_fragment_are_distinct_keys() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/a", "/a?x=1", "/a#top"])).await;
    // The path matcher ignores the query and the fragment is never sent
    mount_expecting(&server, "/a", page(200, &[]), 3).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(report.total(), 4);
    for route in ["/a", "/a?x=1", "/a#top"] {
        assert_eq!(
            report.status_of(&url_of(&server, route)),
            Some(VisitStatus::Alive),
            "missing {}",
            route
        );
    }
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/old"])).await;
    mount(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/new"),
    )
    .await;
    mount(&server, "/new", page(200, &[])).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    // The linked URL is classified by the final response
    assert_eq!(
        report.status_of(&url_of(&server, "/old")),
        Some(VisitStatus::Alive)
    );
    assert_eq!(report.status_of(&url_of(&server, "/new")), None);
}

#[tokio::test]
async fn test_links_resolve_against_seed_not_page() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/deep/nested/page"])).await;
    mount(&server, "/deep/nested/page", page(200, &["/top", "sibling"])).await;
    mount_expecting(&server, "/top", page(200, &[]), 1).await;
    mount_expecting(&server, "/deep/nested/sibling", page(200, &[]), 0).await;

    let report = run_crawl(&config_for(&server)).await.expect("Crawl failed");

    assert_eq!(report.total(), 3);
}

#[tokio::test]
async fn test_seed_path_prefixes_links() {
    let server = MockServer::start().await;

    mount(&server, "/docs/", page(200, &["/about", "/"])).await;
    mount_expecting(&server, "/docs/about", page(200, &[]), 1).await;
    mount_expecting(&server, "/about", page(200, &[]), 0).await;

    let config = Config::for_seed(url_of(&server, "/docs/"));
    let report = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(
        report.alive,
        vec![url_of(&server, "/docs/"), url_of(&server, "/docs/about")]
    );
}

#[tokio::test]
async fn test_page_relative_resolution_mode() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/deep/page"])).await;
    mount(&server, "/deep/page", page(200, &["sibling", "../up"])).await;
    mount_expecting(&server, "/deep/sibling", page(200, &[]), 1).await;
    mount_expecting(&server, "/up", page(404, &[]), 1).await;

    let mut config = config_for(&server);
    config.crawler.resolve_against = LinkBase::Page;
    let report = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(
        report.status_of(&url_of(&server, "/deep/sibling")),
        Some(VisitStatus::Alive)
    );
    assert_eq!(
        report.status_of(&url_of(&server, "/up")),
        Some(VisitStatus::Dead)
    );
}

#[tokio::test]
async fn test_bounded_concurrency_visits_everything() {
    let server = MockServer::start().await;

    let pages: Vec<String> = (0..20).map(|i| format!("/page{}", i)).collect();
    let hrefs: Vec<&str> = pages.iter().map(String::as_str).collect();

    mount(&server, "/", page(200, &hrefs)).await;
    for route in &hrefs {
        mount_expecting(
            &server,
            route,
            page(200, &hrefs).set_delay(Duration::from_millis(5)),
            1,
        )
        .await;
    }

    let mut config = config_for(&server);
    config.crawler.max_concurrency = Some(2);
    let report = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.alive.len(), 21);
}

#[tokio::test]
async fn test_transport_failure_aborts_crawl() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/ok", "/slow"])).await;
    mount(&server, "/ok", page(200, &[])).await;
    mount(
        &server,
        "/slow",
        page(200, &[]).set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut config = config_for(&server);
    config.http.request_timeout_ms = Some(200);

    let result = tokio::time::timeout(Duration::from_secs(10), run_crawl(&config))
        .await
        .expect("Crawl did not stop after the fatal error");

    match result {
        Err(SweepError::Http { url, source }) => {
            assert_eq!(url, url_of(&server, "/slow"));
            assert!(source.is_timeout());
        }
        other => panic!("expected a transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancellation_drains_in_flight_visits() {
    let server = MockServer::start().await;

    mount(&server, "/", page(200, &["/hang"])).await;
    mount(
        &server,
        "/hang",
        page(200, &[]).set_delay(Duration::from_secs(60)),
    )
    .await;

    let crawl = Coordinator::new(&config_for(&server))
        .expect("Failed to create coordinator")
        .start();
    let token = crawl.cancellation_token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        token.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(10), crawl.wait())
        .await
        .expect("Cancelled crawl did not drain");

    assert!(matches!(result, Err(SweepError::Cancelled)));
}

#[tokio::test]
async fn test_independent_coordinators() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    mount(&first, "/", page(200, &["/only-first"])).await;
    mount(&first, "/only-first", page(200, &[])).await;
    mount(&second, "/", page(200, &["/only-second"])).await;
    mount(&second, "/only-second", page(404, &[])).await;

    let crawl_first = Coordinator::new(&config_for(&first)).unwrap().start();
    let crawl_second = Coordinator::new(&config_for(&second)).unwrap().start();

    let (report_first, report_second) = tokio::join!(crawl_first.wait(), crawl_second.wait());
    let report_first = report_first.expect("First crawl failed");
    let report_second = report_second.expect("Second crawl failed");

    assert_eq!(report_first.total(), 2);
    assert!(report_first.dead.is_empty());
    assert_eq!(report_second.alive, vec![url_of(&second, "/")]);
    assert_eq!(report_second.dead, vec![url_of(&second, "/only-second")]);
}

#[tokio::test]
async fn test_slash_prefixed_hrefs_never_reach_another_host() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    let other_host = other.address().to_string();

    let backslash = format!("/\\{}/x", other_host);
    let newline = format!("/\n/{}/x", other_host);
    let tab = format!("/\t/{}/x", other_host);
    let network_path = format!("//{}/x", other_host);

    mount(
        &site,
        "/",
        page(
            200,
            &[
                backslash.as_str(),
                newline.as_str(),
                tab.as_str(),
                network_path.as_str(),
            ],
        ),
    )
    .await;
    // A network-path href is rooted at the seed like any other `/` href
    let rooted = format!("/{}/x", other_host);
    mount_expecting(&site, &rooted, page(404, &[]), 1).await;
    mount_expecting(&other, "/x", page(200, &[]), 0).await;

    let report = run_crawl(&config_for(&site)).await.expect("Crawl failed");

    assert_eq!(report.alive, vec![url_of(&site, "/")]);
    assert_eq!(report.dead, vec![url_of(&site, &rooted)]);
    assert!(other
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
}
