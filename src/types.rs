use crate::error::MatrixError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest zone or source id a matrix exposes
pub const MAX_PORT: u8 = 8;

/// Output zone identifier (1-8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ZoneId(u8);

impl ZoneId {
    /// Create a zone id, rejecting values outside 1-8
    pub fn new(id: u8) -> Result<Self, MatrixError> {
        if (1..=MAX_PORT).contains(&id) {
            Ok(Self(id))
        } else {
            Err(MatrixError::InvalidZoneId(id))
        }
    }

    /// Get the raw zone number
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position of this zone in a device status vector
    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for ZoneId {
    type Error = MatrixError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ZoneId> for u8 {
    fn from(id: ZoneId) -> Self {
        id.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input source identifier (1-8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SourceId(u8);

impl SourceId {
    /// Create a source id, rejecting values outside 1-8
    pub fn new(id: u8) -> Result<Self, MatrixError> {
        if (1..=MAX_PORT).contains(&id) {
            Ok(Self(id))
        } else {
            Err(MatrixError::InvalidSourceId(id))
        }
    }

    /// Get the raw source number
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SourceId {
    type Error = MatrixError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<SourceId> for u8 {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of polling a single zone
///
/// The index carried by `On` is the raw 1-based source index the device
/// reported. It may be 0 or otherwise absent from the source catalog, in which
/// case the zone is on with an unknown source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// Zone is routed to the given source index
    On(u8),

    /// Device could not be reached or its answer could not be read
    Unavailable,
}

impl SwitchState {
    /// Check whether the zone reported a source
    pub fn is_on(self) -> bool {
        matches!(self, SwitchState::On(_))
    }

    /// Raw source index, if the zone reported one
    pub fn source_index(self) -> Option<u8> {
        match self {
            SwitchState::On(index) => Some(index),
            SwitchState::Unavailable => None,
        }
    }
}

/// Power state of a zone as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    /// Last poll returned a source
    On,

    /// Never polled, or the last poll failed
    #[default]
    Unavailable,
}

/// Cached state of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneState {
    /// Power state from the last poll
    pub power: PowerState,

    /// Last source index the device reported for this zone. Retained across
    /// failed polls.
    pub source_index: Option<u8>,
}

impl ZoneState {
    /// Fold a poll result into the cached state
    pub(crate) fn apply(&mut self, result: SwitchState) {
        match result {
            SwitchState::On(index) => {
                self.power = PowerState::On;
                self.source_index = Some(index);
            }
            SwitchState::Unavailable => {
                self.power = PowerState::Unavailable;
            }
        }
    }
}
