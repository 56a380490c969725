//! Client-side name filter and its trailing debounce.
//!
//! A leading `*` switches from prefix to substring matching.  Matching is
//! case-insensitive and an empty filter matches everything.

use std::time::Duration;

use tokio::time::Instant;

/// Input inactivity required before a typed filter is applied.
pub const FILTER_QUIET_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    Prefix,
    Contains,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    raw: String,
}

impl FilterState {
    pub fn new(text: impl Into<String>) -> Self {
        Self { raw: text.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn kind(&self) -> PredicateKind {
        if self.raw.starts_with('*') {
            PredicateKind::Contains
        } else {
            PredicateKind::Prefix
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        matches(name, &self.raw)
    }
}

pub fn matches(name: &str, filter_text: &str) -> bool {
    let name = name.to_lowercase();
    let text = filter_text.to_lowercase();
    match text.strip_prefix('*') {
        Some(needle) => name.contains(needle),
        None => name.starts_with(&text),
    }
}

/// Trailing-edge debounce driven by the owner's tick.
///
/// Every `schedule` pushes the deadline out by the quiet window; `poll`
/// fires once when the deadline has passed, so only the settled value is
/// ever acted upon.
#[derive(Debug)]
pub struct FilterDebounce {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl FilterDebounce {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.quiet);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True exactly once per settled burst of `schedule` calls.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(d) if Instant::now() >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for FilterDebounce {
    fn default() -> Self {
        Self::new(FILTER_QUIET_WINDOW)
    }
}
