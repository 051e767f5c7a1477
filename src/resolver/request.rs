//! Resolution requests and their sequence stamps

use crate::coord::Coordinates;
use serde::Serialize;
use std::fmt;

/// Issue-order stamp for a request
///
/// Strictly increasing per resolver. Zero means "nothing issued yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Sequence(u64);

impl Sequence {
    pub const ZERO: Sequence = Sequence(0);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Input channel a request arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Map clicks and programmatic selections
    Click,
    Search,
    Geolocate,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click => write!(f, "click"),
            Self::Search => write!(f, "search"),
            Self::Geolocate => write!(f, "geolocate"),
        }
    }
}

/// What a request asks for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RequestKind {
    MapClick { coords: Coordinates },
    Search { query: String },
    Geolocate,
}

impl RequestKind {
    pub fn channel(&self) -> Channel {
        match self {
            Self::MapClick { .. } => Channel::Click,
            Self::Search { .. } => Channel::Search,
            Self::Geolocate => Channel::Geolocate,
        }
    }
}

/// A stamped request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionRequest {
    pub sequence: Sequence,
    #[serde(flatten)]
    pub kind: RequestKind,
}

impl ResolutionRequest {
    pub fn channel(&self) -> Channel {
        self.kind.channel()
    }
}

/// Highest sequence issued on each channel
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChannelMarks {
    click: Sequence,
    search: Sequence,
    geolocate: Sequence,
}

impl ChannelMarks {
    pub(crate) fn get(&self, channel: Channel) -> Sequence {
        match channel {
            Channel::Click => self.click,
            Channel::Search => self.search,
            Channel::Geolocate => self.geolocate,
        }
    }

    pub(crate) fn raise(&mut self, channel: Channel, sequence: Sequence) {
        let mark = match channel {
            Channel::Click => &mut self.click,
            Channel::Search => &mut self.search,
            Channel::Geolocate => &mut self.geolocate,
        };
        *mark = (*mark).max(sequence);
    }

    /// True when `sequence` is still the newest request on `channel`
    pub(crate) fn is_latest(&self, channel: Channel, sequence: Sequence) -> bool {
        self.get(channel) == sequence
    }
}
