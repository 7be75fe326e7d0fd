use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Position of a user inside the trip-creation conversation.
///
/// `Unknown` is the zero code and never a legitimate runtime state: it only
/// exists so that decoded or defaulted values can be told apart from real
/// ones. Everything at or above `SENTINEL` is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DialogState {
    Unknown = 0,
    Start = 1,
    NewTrip = 2,
    NewTripName = 3,
    NewTripDate = 4,
    NewTripDescription = 5,
    NewTripConfirm = 6,
    NewTripPublish = 7,
}

const SENTINEL: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid dialog state code {0}")]
pub struct InvalidDialogState(pub u8);

impl DialogState {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_valid(self) -> bool {
        self.code() > DialogState::Unknown.code() && self.code() < SENTINEL
    }

    /// States that belong to an unfinished `/newtrip` flow.
    pub fn is_trip_flow(self) -> bool {
        matches!(
            self,
            DialogState::NewTrip
                | DialogState::NewTripName
                | DialogState::NewTripDate
                | DialogState::NewTripDescription
                | DialogState::NewTripConfirm
        )
    }
}

impl TryFrom<u8> for DialogState {
    type Error = InvalidDialogState;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        let state = match code {
            1 => DialogState::Start,
            2 => DialogState::NewTrip,
            3 => DialogState::NewTripName,
            4 => DialogState::NewTripDate,
            5 => DialogState::NewTripDescription,
            6 => DialogState::NewTripConfirm,
            7 => DialogState::NewTripPublish,
            _ => return Err(InvalidDialogState(code)),
        };
        Ok(state)
    }
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialogState::Unknown => "Unknown",
            DialogState::Start => "Start",
            DialogState::NewTrip => "NewTrip",
            DialogState::NewTripName => "NewTripName",
            DialogState::NewTripDate => "NewTripDate",
            DialogState::NewTripDescription => "NewTripDescription",
            DialogState::NewTripConfirm => "NewTripConfirm",
            DialogState::NewTripPublish => "NewTripPublish",
        };
        f.write_str(name)
    }
}
