use menuboard_core::{Category, SheetSource, SyncError};
use menuboard_net::{SheetClient, DEVICE_PATH, SHEET_PATH};

use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One request as the stub server saw it.
#[derive(Debug)]
struct Captured {
    method: String,
    path: String,
    body: String,
}

/// Answer exactly one HTTP request with `status` and `body`.
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut reader = BufReader::new(read);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).await.unwrap();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut buf = vec![0u8; content_length];
        reader.read_exact(&mut buf).await.unwrap();

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        write.write_all(response.as_bytes()).await.unwrap();
        write.shutdown().await.unwrap();

        Captured {
            method,
            path,
            body: String::from_utf8(buf).unwrap(),
        }
    });

    (base, handle)
}

const SNAPSHOT: &str = r#"{
    "devices": [
        {"name": "Counter", "deviceId": "dev-1", "orientation": "landscape", "invert": true, "categories": ["dosas"]}
    ],
    "menuItems": [
        {"name": "Masala Dosa", "price": "$11.50", "category": "dosas", "diet": "vegetarian"},
        {"name": "Broken", "price": -1, "category": "dosas", "diet": "vegetarian"}
    ]
}"#;

// ============================================================================
// Client Tests
// ============================================================================

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = SheetClient::new("http://localhost:3000/");
    assert_eq!(client.base_url(), "http://localhost:3000");
    assert_eq!(client.url(SHEET_PATH), "http://localhost:3000/api/sheet");
    assert_eq!(client.url(DEVICE_PATH), "http://localhost:3000/api/device");
}

// ============================================================================
// Fetch Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_sheet_success() {
    let (base, server) = serve_once(200, SNAPSHOT).await;
    let client = SheetClient::new(&base);

    let sheet = client.fetch_sheet().await.unwrap();
    assert_eq!(sheet.devices.len(), 1);
    assert!(sheet.devices[0].invert);
    assert_eq!(sheet.menu_items.len(), 1);
    assert_eq!(sheet.menu_items[0].price, 11.5);
    assert_eq!(sheet.menu_items[0].category, Category::Dosas);

    let seen = server.await.unwrap();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, SHEET_PATH);
}

#[tokio::test]
async fn test_fetch_sheet_not_found_uses_message() {
    let (base, server) = serve_once(404, r#"{"message": "No data found"}"#).await;
    let client = SheetClient::new(&base);

    let err = client.fetch_sheet().await.unwrap_err();
    assert_eq!(err, SyncError::NotFound("No data found".into()));
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_sheet_server_error_is_transport() {
    let (base, server) = serve_once(500, r#"{"message": "boom"}"#).await;
    let client = SheetClient::new(&base);

    match client.fetch_sheet().await {
        Err(SyncError::Transport(msg)) => assert!(msg.contains("500")),
        other => panic!("expected transport error, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_sheet_garbage_is_malformed() {
    let (base, server) = serve_once(200, "not json at all").await;
    let client = SheetClient::new(&base);

    assert!(matches!(
        client.fetch_sheet().await,
        Err(SyncError::Malformed(_))
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_fetch_sheet_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = SheetClient::new(&base);
    assert!(matches!(
        client.fetch_sheet().await,
        Err(SyncError::Transport(_))
    ));
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_device_posts_id() {
    let (base, server) = serve_once(200, r#"{"message": "Device registered"}"#).await;
    let client = SheetClient::new(&base);

    client.register_device("abcd-1234").await.unwrap();

    let seen = server.await.unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, DEVICE_PATH);
    let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(body, json!({"deviceId": "abcd-1234"}));
}

#[tokio::test]
async fn test_register_device_failure() {
    let (base, server) = serve_once(503, "unavailable").await;
    let client = SheetClient::new(&base);

    match client.register_device("abcd").await {
        Err(SyncError::Registration(msg)) => {
            assert!(msg.contains("503"));
            assert!(msg.contains("unavailable"));
        }
        other => panic!("expected registration error, got {:?}", other),
    }
    server.await.unwrap();
}

// ============================================================================
// Publish Tests
// ============================================================================

#[tokio::test]
async fn test_publish_sheet_returns_message() {
    let (base, server) = serve_once(200, r#"{"message": "Data saved"}"#).await;
    let client = SheetClient::new(&base);
    let snapshot = json!({"devices": [], "menuItems": []});

    let message = client.publish_sheet(&snapshot).await.unwrap();
    assert_eq!(message, "Data saved");

    let seen = server.await.unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, SHEET_PATH);
    assert_eq!(serde_json::from_str::<serde_json::Value>(&seen.body).unwrap(), snapshot);
}

#[tokio::test]
async fn test_publish_sheet_error_status() {
    let (base, server) = serve_once(400, r#"{"message": "bad"}"#).await;
    let client = SheetClient::new(&base);

    let err = client.publish_sheet(&json!({})).await.unwrap_err();
    assert!(err.to_string().contains("400"));
    server.await.unwrap();
}
