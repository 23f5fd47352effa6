//! Helpers shared by unit tests: canned HTTP servers and listing pages.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Render a listing page with one table row per entry.
pub fn listing_html(rows: &[Vec<String>]) -> String {
    let body: String = rows
        .iter()
        .map(|cells| {
            let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
            format!("<tr>{}</tr>\n", tds)
        })
        .collect();

    format!(
        "<html><body><table class=\"table\">\n\
         <thead><tr><th>IP Address</th><th>Port</th><th>Code</th><th>Country</th>\
         <th>Anonymity</th><th>Google</th><th>Https</th><th>Last Checked</th></tr></thead>\n\
         <tbody>\n{}</tbody>\n</table></body></html>",
        body
    )
}

/// Serve the same response to every connection.
///
/// Works for plain requests and for requests sent through it as a forward proxy.
pub async fn spawn_http_server(status_line: &'static str, body: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Accept connections and never answer.
pub async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                drop(socket);
            });
        }
    });

    addr
}
