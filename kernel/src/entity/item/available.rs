use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Rental eligibility flag. Checked once when a booking is created and
/// never re-checked by later status transitions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct IsAvailable(bool);

impl IsAvailable {
    pub fn new(value: impl Into<bool>) -> Self {
        Self(value.into())
    }
}
