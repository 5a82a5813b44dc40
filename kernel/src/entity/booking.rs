mod id;
mod period;
mod state;
mod status;

pub use self::{id::*, period::*, state::*, status::*};
use crate::entity::{ItemId, UserId};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct Booking {
    id: BookingId,
    item_id: ItemId,
    booker_id: UserId,
    period: BookingPeriod,
    status: BookingStatus,
}

impl Booking {
    pub fn new(
        id: BookingId,
        item_id: ItemId,
        booker_id: UserId,
        period: BookingPeriod,
        status: BookingStatus,
    ) -> Self {
        Self {
            id,
            item_id,
            booker_id,
            period,
            status,
        }
    }

    /// Owner decision. Intentionally does not guard against re-deciding an
    /// already approved or rejected booking.
    pub fn decide(self, approved: bool) -> Self {
        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        Self { status, ..self }
    }

    pub fn is_booked_by(&self, user_id: &UserId) -> bool {
        &self.booker_id == user_id
    }
}
