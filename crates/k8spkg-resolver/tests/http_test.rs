//! HTTP fetcher tests against a throwaway local server

use k8spkg_resolver::{Endpoints, HttpFetcher, ManifestFetcher, VersionResolver};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `/stable.txt` and `/ci.txt`, 404 for anything else
async fn spawn_manifest_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };

            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]);
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

            let (status, body) = match path.as_str() {
                "/stable.txt" => ("200 OK", "v1.20.3\n"),
                "/ci.txt" => ("200 OK", "v1.21.0-alpha.0.123+abcdef\n"),
                _ => ("404 Not Found", "not found"),
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_http_fetch_returns_body() {
    let base = spawn_manifest_server().await;
    let fetcher = HttpFetcher::new().unwrap();

    let body = fetcher.fetch(&format!("{base}/stable.txt")).await.unwrap();
    assert_eq!(body, "v1.20.3\n");
}

#[tokio::test]
async fn test_http_status_error_is_network_error() {
    let base = spawn_manifest_server().await;
    let fetcher = HttpFetcher::new().unwrap();

    let err = fetcher.fetch(&format!("{base}/missing.txt")).await.unwrap_err();
    assert!(err.is_network(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher.fetch(&format!("http://{addr}/stable.txt")).await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_resolver_over_http() {
    let base = spawn_manifest_server().await;
    let endpoints = Endpoints {
        stable: format!("{base}/stable.txt"),
        latest: format!("{base}/latest.txt"),
        ci_latest: format!("{base}/ci.txt"),
        ci_download_base: format!("{base}/ci-cross"),
        release_download_base: base.clone(),
    };
    let mut resolver = VersionResolver::new(HttpFetcher::new().unwrap(), endpoints);

    assert_eq!(resolver.stable_kube_version().await.unwrap(), "1.20.3");
    assert_eq!(resolver.cri_tools_version().await.unwrap(), "1.20.0");
    assert_eq!(resolver.kube_ci_version().await.unwrap(), "1.21.0-alpha.0.123-abcdef");
    assert!(resolver.latest_kube_version().await.unwrap_err().is_network());
}
