use chrono::{
    DateTime,
    Utc,
};
use http::StatusCode;
use std::time::Duration;

use crate::{
    model::error_message,
    transport::Response,
};

/// Retries are not attempted if the server asks to wait longer than this.
pub const MAX_RETRY_WAIT: Duration = Duration::from_secs(62 * 60);
pub const RETRY_GRACE: Duration = Duration::from_secs(10);
/// Used when a rate limited response carries no usable timing headers.
const FALLBACK_WAIT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, PartialEq)]
pub struct ThrottlePolicy {
    pub max_retry_wait: Duration,
    pub grace: Duration,
    pub retry_budget: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThrottleDecision {
    Retry(Duration),
    Abandon,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateLimit {
    /// The request quota is exhausted until the given wait has passed.
    Primary {
        retry_after: Duration,
    },
    /// Abuse detection; repeating the pattern is what triggered it.
    Secondary {
        retry_after: Option<Duration>,
    },
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            max_retry_wait: MAX_RETRY_WAIT,
            grace: RETRY_GRACE,
            retry_budget: 1,
        }
    }
}

impl ThrottlePolicy {
    pub fn new(max_retry_wait: Duration) -> Self {
        Self {
            max_retry_wait,
            .. Default::default()
        }
    }

    pub fn on_rate_limit(
        &self,
        retry_after: Duration,
        retry_count: u32,
    ) -> ThrottleDecision {
        if retry_count >= self.retry_budget {
            return ThrottleDecision::Abandon;
        }
        if retry_after > self.max_retry_wait + self.grace {
            return ThrottleDecision::Abandon;
        }
        ThrottleDecision::Retry(retry_after)
    }
}

impl RateLimit {
    /// Work out whether the response is a rate limit signal, and which.
    pub fn classify(response: &Response, now: DateTime<Utc>) -> Option<Self> {
        let status = response.status;
        if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
            return None;
        }
        let message = error_message(&response.body).to_lowercase();
        if message.contains("secondary rate") || message.contains("abuse") {
            return Some(Self::Secondary {
                retry_after: header_secs(response, "retry-after"),
            });
        }
        let exhausted = header_str(response, "x-ratelimit-remaining") == Some("0");
        if !exhausted && status != StatusCode::TOO_MANY_REQUESTS {
            // a plain permission failure
            return None;
        }
        let retry_after = header_secs(response, "retry-after")
            .or_else(|| header_str(response, "x-ratelimit-reset")
                .and_then(|v| v.parse::<i64>().ok())
                .map(|reset| Duration::from_secs(
                    (reset - now.timestamp()).max(0) as u64
                )))
            .unwrap_or(FALLBACK_WAIT);
        Some(Self::Primary { retry_after })
    }
}

fn header_str<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers.get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

fn header_secs(response: &Response, name: &str) -> Option<Duration> {
    header_str(response, name)
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}
