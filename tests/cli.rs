// tests/cli.rs
// =============================================================================
// End-to-end tests: run the compiled binary against local mock servers and
// check exit codes, stdout (the sitemap) and stderr (diagnostics).
// =============================================================================

use assert_cmd::Command;
use httpmock::prelude::*;

fn sitemap_crawler() -> Command {
    let mut cmd = Command::cargo_bin("sitemap-crawler").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_missing_website_flag_exits_1() {
    let output = sitemap_crawler().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--website"));
}

#[test]
fn test_unparseable_website_exits_1() {
    let output = sitemap_crawler().args(["--website", "not a url"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid website URL"));
}

#[test]
fn test_help_exits_0() {
    let output = sitemap_crawler().arg("--help").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_strict_robots_unreachable_exits_1() {
    let output = sitemap_crawler()
        .args(["--website", "http://127.0.0.1:1/", "--strict-robots", "--timeout", "2"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("robots.txt"));
}

#[test]
fn test_prints_sitemap_for_site() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/robots.txt");
        then.status(200).body("User-agent: *\nDisallow: /private/\n");
    });
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).header("content-type", "text/html").body(
            r#"<a href="/a">a</a><a href="https://other.test/x">x</a><a href="/a">a</a>
               <a href="/private/secret">secret</a><a href="/missing">missing</a>"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).header("content-type", "text/html").body("<p>leaf</p>");
    });
    let secret = server.mock(|when, then| {
        when.method(GET).path("/private/secret");
        then.status(200).header("content-type", "text/html").body("");
    });
    server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404);
    });

    let output = sitemap_crawler()
        .arg("--website")
        .arg(server.url("/"))
        .args(["--report", "json"])
        .output()
        .unwrap();

    // A 404 on one page does not change the exit code
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(stdout.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
    assert_eq!(stdout.matches("<loc>").count(), 2);
    assert!(stdout.contains(&format!("<loc>{}</loc>", server.url("/"))));
    assert!(stdout.contains(&format!("<loc>{}</loc>", server.url("/a"))));
    assert!(!stdout.contains("other.test"));
    assert!(!stdout.contains("/private/"));
    assert_eq!(secret.hits(), 0);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"pages_emitted\": 2"));
    assert!(stderr.contains("404"));
}

#[test]
fn test_verbose_logs_sitemap_size_on_stderr() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).header("content-type", "text/html").body(r#"<a href="/a">a</a>"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).header("content-type", "text/plain").body("a");
    });

    let output = sitemap_crawler().arg("--website").arg(server.url("/")).arg("-v").output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("writing sitemap with 2 urls"), "stderr: {stderr}");
    // Logs never leak into the XML on stdout
    assert!(!String::from_utf8_lossy(&output.stdout).contains("writing sitemap"));
}
