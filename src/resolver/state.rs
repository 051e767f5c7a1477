//! Resolver-owned state and the notices it surfaces

use crate::coord::Location;
use crate::error::Error;
use crate::resolver::request::Sequence;
use serde::Serialize;
use std::fmt;

/// In-flight indicators for the view (spinners, disabled buttons)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusyFlags {
    pub searching: bool,
    pub locating: bool,
}

/// User-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    GeocodeNotFound,
    GeocodeUnavailable,
    GeolocationDenied,
    GeolocationTimeout,
    GeolocationUnavailable,
}

/// A dismissable, non-blocking message shown next to the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify `err`, using `fallback` for errors outside the taxonomy
    pub fn from_error(err: &Error, fallback: NoticeKind) -> Self {
        let kind = match err {
            Error::GeocodeNotFound(_) => NoticeKind::GeocodeNotFound,
            Error::GeocodeUnavailable(_) => NoticeKind::GeocodeUnavailable,
            Error::GeolocationDenied(_) => NoticeKind::GeolocationDenied,
            Error::GeolocationTimeout(_) => NoticeKind::GeolocationTimeout,
            Error::GeolocationUnavailable(_) => NoticeKind::GeolocationUnavailable,
            _ => fallback,
        };
        Self::new(kind, err.to_string())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything the resolver owns about the current pick
#[derive(Debug, Clone, Default)]
pub struct ResolverState {
    /// The authoritative selection
    pub current: Option<Location>,
    pub last_applied_sequence: Sequence,
    /// Raw search box contents, independent of `current`
    pub pending_search_text: String,
    pub busy: BusyFlags,
    pub notice: Option<Notice>,
    /// Request that raised `notice`; a newer applied result clears it
    pub notice_sequence: Sequence,
}

impl ResolverState {
    pub fn new(initial_location: Option<Location>) -> Self {
        Self {
            current: initial_location,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> ResolverSnapshot {
        ResolverSnapshot {
            current: self.current.clone(),
            last_applied_sequence: self.last_applied_sequence,
            pending_search_text: self.pending_search_text.clone(),
            busy: self.busy,
            notice: self.notice.clone(),
        }
    }
}

/// Owned copy of the state for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolverSnapshot {
    pub current: Option<Location>,
    pub last_applied_sequence: Sequence,
    pub pending_search_text: String,
    pub busy: BusyFlags,
    pub notice: Option<Notice>,
}
