use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Monotonic request sequence number, unique across the whole app.
pub type Seq = u64;

/// The clock as seen by the state machine; it only enters through `Msg::Tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Now {
    pub instant: Instant,
    pub utc: DateTime<Utc>,
}

impl Now {
    pub fn capture() -> Self {
        Self {
            instant: Instant::now(),
            utc: Utc::now(),
        }
    }

    pub fn advanced(self, by: Duration) -> Self {
        let utc_delta = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        Self {
            instant: self.instant + by,
            utc: self.utc + utc_delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Network,
    Timeout,
    Server { status: u16 },
    Decode,
    Validation,
    Io,
    Cancelled,
}

/// A failed action as shown to the user. Carries no I/O types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::Server { status } => write!(f, "server error {status}: {}", self.message),
            FailureKind::Network => write!(f, "network error: {}", self.message),
            FailureKind::Timeout => write!(f, "request timed out: {}", self.message),
            FailureKind::Decode => write!(f, "unexpected response: {}", self.message),
            FailureKind::Validation => f.write_str(&self.message),
            FailureKind::Io => write!(f, "file error: {}", self.message),
            FailureKind::Cancelled => write!(f, "cancelled: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// A server snapshot with its fetch lifecycle and a stale-reply guard.
///
/// Each fetch gets a fresh sequence number. A reply is applied only when its
/// sequence is newer than the last applied one, so overlapping polls can never
/// roll the view back to an older snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    data: Option<T>,
    error: Option<Failure>,
    state: LoadState,
    last_issued: Option<Seq>,
    last_applied: Option<Seq>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            state: LoadState::Idle,
            last_issued: None,
            last_applied: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn begin(&mut self, seq: Seq) {
        self.last_issued = Some(seq);
        self.state = LoadState::Loading;
    }

    /// Returns `false` when the reply was stale and discarded.
    pub fn apply(&mut self, seq: Seq, result: Result<T, Failure>) -> bool {
        if self.last_applied.is_some_and(|applied| seq <= applied) {
            return false;
        }
        self.last_applied = Some(seq);
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.state = LoadState::Ready;
            }
            Err(failure) => {
                self.error = Some(failure);
                self.state = LoadState::Error;
            }
        }
        if self.last_issued.is_some_and(|issued| issued > seq) {
            self.state = LoadState::Loading;
        }
        true
    }

    /// Replace the snapshot locally, e.g. after a successful clear. Replies to
    /// requests issued before `seq` are discarded from now on.
    pub fn replace(&mut self, seq: Seq, data: T) {
        self.data = Some(data);
        self.error = None;
        self.last_applied = Some(self.last_applied.map_or(seq, |applied| applied.max(seq)));
        if !self.last_issued.is_some_and(|issued| issued > seq) {
            self.state = LoadState::Ready;
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// True until the first reply of any kind has landed.
    pub fn is_first_load(&self) -> bool {
        self.last_applied.is_none()
    }
}

/// Per-route polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
    armed: bool,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            armed: false,
        }
    }

    /// Called on mount, right after the mount fetch was issued; the first
    /// deadline is set by the next tick.
    pub fn arm(&mut self) {
        self.armed = true;
        self.next_due = None;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns true when a poll is due at `now`, and schedules the next one.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.armed {
            return false;
        }
        match self.next_due {
            None => {
                self.next_due = Some(now + self.interval);
                false
            }
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            Some(_) => false,
        }
    }
}
