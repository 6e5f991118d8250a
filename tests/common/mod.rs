//! Loopback stand-in for a browser's DevTools endpoint.
//!
//! Serves `GET /json/list` over plain HTTP and answers `Page.navigate` and
//! `Page.printToPDF` on a separate websocket listener.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% fake document\n%%EOF\n";

/// What the fake tab answers to `Page.printToPDF`.
#[derive(Debug, Clone)]
pub enum PrintReply {
    /// Base64 of the given bytes under `result.data`.
    Pdf(Vec<u8>),
    /// A text frame that is not JSON.
    Garbage,
    /// A protocol error object instead of a result.
    RemoteError(String),
    /// A console event first, then the PDF.
    EventThenPdf(Vec<u8>),
}

/// What `/json/list` returns.
#[derive(Debug, Clone)]
pub enum TargetList {
    /// One page target pointing at the websocket listener.
    Page,
    /// An empty array.
    Empty,
    /// One target without `webSocketDebuggerUrl`.
    NoDebuggerUrl,
}

pub struct FakeDevTools {
    pub endpoint: String,
    pub ws_url: String,
    ws_connections: Arc<AtomicUsize>,
    commands: Arc<Mutex<Vec<Value>>>,
}

impl FakeDevTools {
    pub async fn start(targets: TargetList, reply: PrintReply) -> Self {
        let ws_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ws");
        let ws_url = format!(
            "ws://{}/devtools/page/FAKE",
            ws_listener.local_addr().expect("ws addr")
        );
        let http_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind http");
        let endpoint = format!("http://{}", http_listener.local_addr().expect("http addr"));

        let ws_connections = Arc::new(AtomicUsize::new(0));
        let commands = Arc::new(Mutex::new(Vec::new()));

        let body = match targets {
            TargetList::Page => json!([{
                "description": "",
                "id": "FAKE",
                "title": "about:blank",
                "type": "page",
                "url": "about:blank",
                "webSocketDebuggerUrl": ws_url,
            }]),
            TargetList::Empty => json!([]),
            TargetList::NoDebuggerUrl => json!([{
                "id": "FAKE",
                "type": "page",
                "url": "about:blank",
            }]),
        }
        .to_string();
        tokio::spawn(serve_http(http_listener, body));

        let counter = Arc::clone(&ws_connections);
        let log = Arc::clone(&commands);
        tokio::spawn(async move {
            while let Ok((stream, _)) = ws_listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(serve_tab(stream, reply.clone(), Arc::clone(&log)));
            }
        });

        Self {
            endpoint,
            ws_url,
            ws_connections,
            commands,
        }
    }

    pub fn ws_connections(&self) -> usize {
        self.ws_connections.load(Ordering::SeqCst)
    }

    /// Commands received so far, in arrival order.
    pub fn commands(&self) -> Vec<Value> {
        self.commands.lock().expect("commands lock").clone()
    }
}

async fn serve_http(listener: TcpListener, body: String) {
    while let Ok((mut stream, _)) = listener.accept().await {
        let body = body.clone();
        tokio::spawn(async move {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => {
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                }
            }
            let head = String::from_utf8_lossy(&request);
            let response = if head.starts_with("GET /json/list ") {
                format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                )
            } else {
                "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
            };
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        });
    }
}

async fn serve_tab(stream: TcpStream, reply: PrintReply, log: Arc<Mutex<Vec<Value>>>) {
    let Ok(mut ws) = accept_async(stream).await else {
        return;
    };
    while let Some(Ok(message)) = ws.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let Ok(command) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        log.lock().expect("commands lock").push(command.clone());
        let id = command["id"].clone();

        let frames: Vec<String> = match command["method"].as_str() {
            Some("Page.navigate") => {
                vec![json!({"id": id, "result": {"frameId": "FAKE", "loaderId": "L1"}}).to_string()]
            }
            Some("Page.printToPDF") => match &reply {
                PrintReply::Pdf(bytes) => vec![pdf_frame(&id, bytes)],
                PrintReply::Garbage => vec!["<<garbage>>".to_string()],
                PrintReply::RemoteError(message) => vec![json!({
                    "id": id,
                    "error": {"code": -32000, "message": message}
                })
                .to_string()],
                PrintReply::EventThenPdf(bytes) => vec![
                    json!({"method": "Page.loadEventFired", "params": {"timestamp": 1.0}})
                        .to_string(),
                    pdf_frame(&id, bytes),
                ],
            },
            _ => vec![json!({"id": id, "error": {"code": -32601, "message": "unknown"}}).to_string()],
        };
        for frame in frames {
            if ws.send(Message::Text(frame)).await.is_err() {
                return;
            }
        }
    }
}

fn pdf_frame(id: &Value, bytes: &[u8]) -> String {
    json!({"id": id, "result": {"data": BASE64_STANDARD.encode(bytes)}}).to_string()
}
