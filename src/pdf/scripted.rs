//! In-memory [`MessageChannel`] replaying scripted replies, for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use super::channel::MessageChannel;
use crate::{ResumeError, Result};

#[derive(Clone, Default)]
pub(crate) struct ScriptedChannel {
    replies: Arc<Mutex<VecDeque<Result<String>>>>,
    sent: Arc<Mutex<Vec<String>>>,
    sent_at: Arc<Mutex<Vec<Instant>>>,
    received_at: Arc<Mutex<Vec<Instant>>>,
    closed: Arc<AtomicBool>,
    fail_writes: bool,
}

impl ScriptedChannel {
    pub(crate) fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channel = Self::default();
        for reply in replies {
            channel.push_reply(reply);
        }
        channel
    }

    pub(crate) fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub(crate) fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub(crate) fn push_read_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(ResumeError::channel(message.to_string())));
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn sent_json(&self) -> Vec<serde_json::Value> {
        self.sent()
            .iter()
            .map(|text| serde_json::from_str(text).unwrap())
            .collect()
    }

    /// Clock readings taken as each message was sent.
    pub(crate) fn sent_at(&self) -> Vec<Instant> {
        self.sent_at.lock().unwrap().clone()
    }

    /// Clock readings taken as each reply was handed out.
    pub(crate) fn received_at(&self) -> Vec<Instant> {
        self.received_at.lock().unwrap().clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl MessageChannel for ScriptedChannel {
    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.fail_writes {
            return Err(ResumeError::channel("Write message to socket failed: broken pipe"));
        }
        self.sent.lock().unwrap().push(text);
        self.sent_at.lock().unwrap().push(Instant::now());
        Ok(())
    }

    async fn recv_text(&mut self) -> Result<String> {
        self.received_at.lock().unwrap().push(Instant::now());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ResumeError::channel(
                "Read message from socket failed: connection closed",
            ))
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
