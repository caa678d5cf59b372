use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;

use container_activity::{Docker, API_DEFAULT_VERSION};

#[allow(dead_code)]
pub fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nServer: mock1\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Answer the first connection on `path` with `response` and resolve to the request head that
/// was received.
#[allow(dead_code)]
pub fn serve_once(path: &Path, response: String) -> JoinHandle<String> {
    let listener = UnixListener::bind(path).unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_head(&mut stream).await;

        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        request
    })
}

/// Answer successive connections on `path` with `responses`, one per connection, and resolve
/// to the request heads in the order they arrived.
#[allow(dead_code)]
pub fn serve_sequence(path: &Path, responses: Vec<String>) -> JoinHandle<Vec<String>> {
    let listener = UnixListener::bind(path).unwrap();

    tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_head(&mut stream).await);
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        requests
    })
}

async fn read_head(stream: &mut UnixStream) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }
    String::from_utf8(request).unwrap()
}

/// Accept the first connection on `path` and never answer it.
#[allow(dead_code)]
pub fn serve_silence(path: &Path) -> JoinHandle<()> {
    let listener = UnixListener::bind(path).unwrap();

    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
    })
}

#[allow(dead_code)]
pub fn connect(path: &Path) -> Docker {
    Docker::connect_with_unix(path.to_str().unwrap(), 5, API_DEFAULT_VERSION).unwrap()
}
