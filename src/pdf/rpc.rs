//! DevTools command/response correlation over a [`MessageChannel`].

use std::collections::HashMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::{sleep, timeout};
use tracing::{debug, trace};

use super::channel::MessageChannel;
use crate::{ResumeError, Result, RpcStage};

/// Default settle pause: after navigation, and before each read under
/// [`WaitStrategy::FixedDelay`].
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// One JSON message exchanged with the browser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RemoteError>,
}

/// Protocol-level failure reported by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Frame {
    pub fn request(id: u64, method: &str, params: Value) -> Self {
        Self {
            id: Some(id),
            method: Some(method.to_string()),
            params: Some(params),
            ..Self::default()
        }
    }

    /// Events carry a method but no id.
    pub fn is_event(&self) -> bool {
        self.id.is_none() && self.method.is_some()
    }
}

/// How a call waits for its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitStrategy {
    /// Read until a frame with the request's id arrives; park others by id.
    #[default]
    Correlated,
    /// Sleep for the settle delay, then take the next frame as the response
    /// without checking its id. Only sound with one request in flight.
    FixedDelay,
}

#[derive(Debug, Clone)]
pub struct RpcOptions {
    pub wait: WaitStrategy,
    /// Time the page gets to load after navigation is acknowledged. Under
    /// [`WaitStrategy::FixedDelay`] it is also the pause before every read.
    pub settle_delay: Duration,
    /// Bound on waiting for a response; `None` waits indefinitely.
    pub response_timeout: Option<Duration>,
}

impl Default for RpcOptions {
    fn default() -> Self {
        Self {
            wait: WaitStrategy::Correlated,
            settle_delay: DEFAULT_SETTLE_DELAY,
            response_timeout: None,
        }
    }
}

/// Issues commands on a channel it owns.
///
/// Ids come from a counter owned by the client and start at 0, so each new
/// connection gets a fresh sequence.
pub struct RpcClient<C> {
    channel: C,
    next_id: u64,
    pending: HashMap<u64, Frame>,
    options: RpcOptions,
}

impl<C: MessageChannel> RpcClient<C> {
    pub fn new(channel: C, options: RpcOptions) -> Self {
        Self {
            channel,
            next_id: 0,
            pending: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> &RpcOptions {
        &self.options
    }

    /// Id the next [`RpcClient::call`] will use.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Sends `method` with the next id and returns the response's `result`.
    pub async fn call(&mut self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;
        self.call_with_id(id, method, params).await
    }

    /// Sends `method` with the next id and decodes the response's base64 `data`.
    pub async fn call_for_data(&mut self, method: &str, params: Value) -> Result<Vec<u8>> {
        let result = self.call(method, params).await?;
        decode_data(&result)
    }

    /// Sends `method` under a caller-chosen id. The caller keeps ids unique
    /// for the lifetime of the connection.
    pub async fn call_with_id(&mut self, id: u64, method: &str, params: Value) -> Result<Value> {
        let request = Frame::request(id, method, params);
        let text = serde_json::to_string(&request).map_err(|e| {
            ResumeError::rpc(
                RpcStage::Serialize,
                format!("Marshal of {method} command failed: {e}"),
            )
        })?;
        debug!(id, method, bytes = text.len(), "sending devtools command");
        self.channel.send_text(text).await.map_err(|e| {
            ResumeError::rpc(RpcStage::Write, format!("Send {method} command failed: {e}"))
        })?;

        let response_timeout = self.options.response_timeout;
        let response = match response_timeout {
            Some(limit) => timeout(limit, self.await_response(id, method))
                .await
                .map_err(|_| {
                    ResumeError::rpc(
                        RpcStage::Timeout,
                        format!("No response to {method} (id {id}) within {limit:?}"),
                    )
                })??,
            None => self.await_response(id, method).await?,
        };

        if let Some(error) = response.error {
            return Err(ResumeError::rpc(
                RpcStage::Remote,
                format!(
                    "{method} rejected by browser (code {}): {}",
                    error.code, error.message
                ),
            ));
        }
        debug!(id, method, "received devtools response");
        Ok(response.result.unwrap_or(Value::Null))
    }

    async fn await_response(&mut self, id: u64, method: &str) -> Result<Frame> {
        match self.options.wait {
            WaitStrategy::FixedDelay => {
                sleep(self.options.settle_delay).await;
                self.read_frame(method).await
            }
            WaitStrategy::Correlated => {
                if let Some(frame) = self.pending.remove(&id) {
                    return Ok(frame);
                }
                loop {
                    let frame = self.read_frame(method).await?;
                    let frame_id = frame.id;
                    match frame_id {
                        Some(frame_id) if frame_id == id => return Ok(frame),
                        Some(frame_id) => {
                            debug!(expected = id, received = frame_id, "parking out-of-order response");
                            self.pending.insert(frame_id, frame);
                        }
                        None => {
                            trace!(event = frame.method.as_deref().unwrap_or(""), "skipping event");
                        }
                    }
                }
            }
        }
    }

    async fn read_frame(&mut self, method: &str) -> Result<Frame> {
        let text = self.channel.recv_text().await.map_err(|e| {
            ResumeError::rpc(
                RpcStage::Read,
                format!("Receive {method} response failed: {e}"),
            )
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ResumeError::rpc(
                RpcStage::Parse,
                format!("Unmarshal {method} response failed: {e}"),
            )
        })
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Releases the channel.
    pub async fn close(mut self) -> Result<()> {
        self.channel.close().await
    }
}

/// Decodes the base64 `data` string of a command result.
///
/// A result without `data` decodes to no bytes; callers that need a payload
/// must check for emptiness themselves.
pub fn decode_data(result: &Value) -> Result<Vec<u8>> {
    let fields = result.as_object().ok_or_else(|| {
        ResumeError::rpc(
            RpcStage::Parse,
            format!("Unmarshal response data failed: expected an object, got {result}"),
        )
    })?;
    let encoded = match fields.get("data") {
        None => return Ok(Vec::new()),
        Some(Value::String(encoded)) => encoded,
        Some(other) => {
            return Err(ResumeError::rpc(
                RpcStage::Parse,
                format!("Unmarshal response data failed: data is not a string ({other})"),
            ))
        }
    };
    BASE64_STANDARD.decode(encoded).map_err(|e| {
        ResumeError::rpc(RpcStage::Decode, format!("Decode base64 data failed: {e}"))
    })
}
