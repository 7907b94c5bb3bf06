//! Wire vocabulary shared by nodes
//!
//! These are conventions between the device logic on each node. The parser
//! never checks them: a line with an unknown type code or state word is
//! still a valid [`Message`](crate::Message).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Entity name used for operator input messages
pub const USER_INPUT: &str = "Input";

/// Message type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageType {
    /// Generic input (keypad, switch)
    Input,
    /// Door contact
    Door,
    /// Motion sensor
    Motion,
    /// Panel status report or request
    Status,
    /// Free-form log line
    Line,
}

// Wire format values
const TYPE_INPUT: &str = "0";
const TYPE_DOOR: &str = "1";
const TYPE_MOTION: &str = "2";
const TYPE_STATUS: &str = "100";
const TYPE_LINE: &str = "101";

impl MessageType {
    /// Parse a type from its wire code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            TYPE_INPUT => Some(MessageType::Input),
            TYPE_DOOR => Some(MessageType::Door),
            TYPE_MOTION => Some(MessageType::Motion),
            TYPE_STATUS => Some(MessageType::Status),
            TYPE_LINE => Some(MessageType::Line),
            _ => None,
        }
    }

    /// Wire code for this type
    pub fn code(self) -> &'static str {
        match self {
            MessageType::Input => TYPE_INPUT,
            MessageType::Door => TYPE_DOOR,
            MessageType::Motion => TYPE_MOTION,
            MessageType::Status => TYPE_STATUS,
            MessageType::Line => TYPE_LINE,
        }
    }

    /// Returns true for types whose state is a [`TripState`]
    pub fn is_sensor(&self) -> bool {
        matches!(
            self,
            MessageType::Input | MessageType::Door | MessageType::Motion
        )
    }
}

/// Alarm panel states carried by status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatusState {
    /// Status request (answered with the current state)
    Status,
    /// Alarm sounding
    Alarmed,
    /// Entry delay running, alarm pending
    Delayed,
    /// Armed and watching sensors
    Armed,
    /// Disarmed
    Standby,
    /// Exit delay running
    Arming,
}

impl StatusState {
    /// Parse a status word
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "Status" => Some(StatusState::Status),
            "Alarmed" => Some(StatusState::Alarmed),
            "Delayed" => Some(StatusState::Delayed),
            "Armed" => Some(StatusState::Armed),
            "Standby" => Some(StatusState::Standby),
            "Arming" => Some(StatusState::Arming),
            _ => None,
        }
    }

    /// Wire text for this status
    pub fn as_str(self) -> &'static str {
        match self {
            StatusState::Status => "Status",
            StatusState::Alarmed => "Alarmed",
            StatusState::Delayed => "Delayed",
            StatusState::Armed => "Armed",
            StatusState::Standby => "Standby",
            StatusState::Arming => "Arming",
        }
    }

    /// Returns true while the panel is watching sensors
    pub fn is_armed(&self) -> bool {
        matches!(
            self,
            StatusState::Armed | StatusState::Delayed | StatusState::Alarmed
        )
    }
}

/// Binary sensor state for input/door/motion messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TripState {
    /// Sensor tripped
    Tripped,
    /// Sensor back to rest
    Cleared,
}

const STATE_TRIPPED: &str = "trp";
const STATE_CLEARED: &str = "clr";

impl TripState {
    /// Parse a trip state word
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            STATE_TRIPPED => Some(TripState::Tripped),
            STATE_CLEARED => Some(TripState::Cleared),
            _ => None,
        }
    }

    /// Wire text for this state
    pub fn as_str(self) -> &'static str {
        match self {
            TripState::Tripped => STATE_TRIPPED,
            TripState::Cleared => STATE_CLEARED,
        }
    }

    pub fn is_tripped(&self) -> bool {
        matches!(self, TripState::Tripped)
    }
}
