//! Message channel to a browser tab.
//!
//! The channel moves opaque text messages; framing and JSON live in
//! [`super::rpc`].

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async_with_config, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use crate::{ResumeError, Result};

/// Default upper bound for a single message in either direction (64 MiB).
///
/// A print response carries the whole document base64-encoded in one frame.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// A persistent, message-framed, full-duplex text channel.
#[allow(async_fn_in_trait)]
pub trait MessageChannel {
    /// Sends one text message.
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Waits for the next text message.
    async fn recv_text(&mut self) -> Result<String>;

    /// Releases the connection. Safe to call on an already closed channel.
    async fn close(&mut self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// Largest accepted message and frame, in bytes.
    pub max_message_size: usize,
    /// Bound on the websocket handshake; `None` waits as long as the OS does.
    pub connect_timeout: Option<Duration>,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            connect_timeout: None,
        }
    }
}

impl ChannelOptions {
    fn websocket_config(&self) -> WebSocketConfig {
        let mut config = WebSocketConfig::default();
        config.max_message_size = Some(self.max_message_size);
        config.max_frame_size = Some(self.max_message_size);
        config
    }
}

/// DevTools websocket connection to one tab.
pub struct WebSocketChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    address: String,
    closed: bool,
}

impl WebSocketChannel {
    /// Dials the tab's websocket address.
    pub async fn connect(address: &str, options: &ChannelOptions) -> Result<Self> {
        debug!(%address, max_message_size = options.max_message_size, "opening devtools websocket");
        let dial = connect_async_with_config(address, Some(options.websocket_config()), false);
        let dialed = match options.connect_timeout {
            Some(limit) => timeout(limit, dial).await.map_err(|_| {
                ResumeError::channel(format!(
                    "Connect to remote browser tab web socket ({address}) timed out after {limit:?}"
                ))
            })?,
            None => dial.await,
        };
        let (stream, _response) = dialed.map_err(|e| {
            ResumeError::channel(format!(
                "Connect to remote browser tab web socket ({address}) failed: {e}"
            ))
        })?;
        Ok(Self {
            stream,
            address: address.to_string(),
            closed: false,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl MessageChannel for WebSocketChannel {
    async fn send_text(&mut self, text: String) -> Result<()> {
        trace!(bytes = text.len(), "sending message");
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| ResumeError::channel(format!("Write message to socket failed: {e}")))
    }

    async fn recv_text(&mut self) -> Result<String> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    return Err(ResumeError::channel(format!(
                        "Read message from socket failed: {e}"
                    )))
                }
                None => {
                    return Err(ResumeError::channel(
                        "Read message from socket failed: connection closed",
                    ))
                }
            };
            match message {
                Message::Text(text) => {
                    trace!(bytes = text.len(), "received message");
                    return Ok(text);
                }
                Message::Binary(bytes) => {
                    return Err(ResumeError::channel(format!(
                        "Read message from socket failed: expected text, got {} binary bytes",
                        bytes.len()
                    )))
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
                Message::Close(frame) => {
                    self.closed = true;
                    let reason = frame
                        .map(|f| format!("{} {}", u16::from(f.code), f.reason))
                        .unwrap_or_else(|| "no reason given".to_string());
                    return Err(ResumeError::channel(format!(
                        "Remote browser closed the web socket: {reason}"
                    )));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(ResumeError::channel(format!("Close web socket failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_fit_a_large_inflated_pdf() {
        let opts = ChannelOptions::default();
        // 32 MiB of PDF grows by a third under base64.
        assert!(opts.max_message_size > 32 * 1024 * 1024 * 4 / 3);
        assert!(opts.connect_timeout.is_none());
    }

    #[test]
    fn websocket_config_applies_size_limit_both_ways() {
        let opts = ChannelOptions {
            max_message_size: 1024,
            connect_timeout: None,
        };
        let config = opts.websocket_config();
        assert_eq!(config.max_message_size, Some(1024));
        assert_eq!(config.max_frame_size, Some(1024));
    }

    #[tokio::test]
    async fn connect_fails_with_channel_error_when_nothing_listens() {
        let result = WebSocketChannel::connect(
            "ws://127.0.0.1:1/devtools/page/none",
            &ChannelOptions {
                connect_timeout: Some(Duration::from_secs(2)),
                ..ChannelOptions::default()
            },
        )
        .await;
        match result {
            Err(ResumeError::Channel(msg)) => assert!(msg.contains("Connect to remote browser tab")),
            Err(other) => panic!("expected channel error, got {other:?}"),
            Ok(_) => panic!("expected dial failure"),
        }
    }
}
