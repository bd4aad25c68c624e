use std::collections::VecDeque;

use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMsg {
    pub kind: StatusKind,
    pub text: String,
    at: Instant,
    timeout_ms: u128,
}

impl StatusMsg {
    fn expired(&self) -> bool {
        self.at.elapsed().as_millis() > self.timeout_ms
    }
}

/// Short-lived messages shown in the toolbar; each kind carries its own
/// display timeout.
#[derive(Default)]
pub struct StatusQueue {
    q: VecDeque<StatusMsg>,
}

impl StatusQueue {
    pub fn push_custom(&mut self, kind: StatusKind, text: impl Into<String>, timeout_ms: u128) {
        self.q.push_back(StatusMsg {
            kind,
            text: text.into(),
            at: Instant::now(),
            timeout_ms,
        });
    }

    pub fn push_info(&mut self, text: impl Into<String>) {
        self.push_custom(StatusKind::Info, text, 3000);
    }

    pub fn push_success(&mut self, text: impl Into<String>) {
        self.push_custom(StatusKind::Success, text, 3500);
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.push_custom(StatusKind::Error, text, 4000);
    }

    pub fn retain_active(&mut self) {
        self.q.retain(|m| !m.expired());
    }

    /// The most recent message still on screen.
    pub fn latest(&self) -> Option<&StatusMsg> {
        self.q.back()
    }
}
