//! Tri-state outcome of an event ("succeeded / failed / not yet recorded").

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Whether the event was a success.
///
/// Form controls only emit strings, so the UI edge talks in `"true"` /
/// `"false"` / no value. The backend talks in `true` / `false` / `null`.
/// Everything in between uses this enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Success {
    True,
    False,
    #[default]
    Unknown,
}

impl Success {
    /// Parse the value emitted by a radio-group style control.
    ///
    /// Returns `None` when the value is not one of the literals the control emits.
    pub fn from_form_value(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Success::Unknown),
            Some("true") => Some(Success::True),
            Some("false") => Some(Success::False),
            Some(_) => None,
        }
    }

    pub fn as_form_value(self) -> Option<&'static str> {
        match self {
            Success::True => Some("true"),
            Success::False => Some("false"),
            Success::Unknown => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Success::True => Some(true),
            Success::False => Some(false),
            Success::Unknown => None,
        }
    }
}

impl From<Option<bool>> for Success {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Success::True,
            Some(false) => Success::False,
            None => Success::Unknown,
        }
    }
}

impl Serialize for Success {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_bool().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Success {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Success::from)
    }
}
