//! Change-or-heartbeat throttle for outbound count updates
//!
//! An update goes out when the count differs from the last one sent, or when
//! the last send is older than the heartbeat interval. Timestamps are
//! offsets from an arbitrary session origin, which keeps this usable where
//! `Instant` is not (WASM).

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UpdateThrottler {
    heartbeat: Duration,
    /// None until the first send, which therefore always goes out
    last_sent: Option<(u32, Duration)>,
}

impl UpdateThrottler {
    pub fn new(heartbeat: Duration) -> Self {
        Self {
            heartbeat,
            last_sent: None,
        }
    }

    pub fn heartbeat(&self) -> Duration {
        self.heartbeat
    }

    /// Decide whether `count` should be sent at `now`, recording the send
    /// when it should.
    ///
    /// Callers only ask while a send is actually possible; a suppressed
    /// send must not advance the throttle.
    pub fn should_send(&mut self, count: u32, now: Duration) -> bool {
        let send = match self.last_sent {
            None => true,
            Some((last_count, sent_at)) => {
                last_count != count || now.saturating_sub(sent_at) > self.heartbeat
            }
        };

        if send {
            self.last_sent = Some((count, now));
        }
        send
    }

    /// Last count handed out for sending
    pub fn last_sent_count(&self) -> Option<u32> {
        self.last_sent.map(|(count, _)| count)
    }

    /// Back to the initial state, so the next call sends unconditionally
    pub fn forget(&mut self) {
        self.last_sent = None;
    }
}
