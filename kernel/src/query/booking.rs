use time::OffsetDateTime;

use crate::entity::{Booking, BookingId, BookingState, ItemId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookingQuery<Connection: Send>: 'static + Sync + Send {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError>;

    /// Existing booking on the item whose interval covers `instant`
    /// (`end > instant AND start < instant`). The pre-insert overlap read.
    async fn find_overlapping(
        &self,
        con: &mut Connection,
        item_id: &ItemId,
        instant: OffsetDateTime,
    ) -> error_stack::Result<Option<Booking>, KernelError>;

    async fn find_all_by_booker(
        &self,
        con: &mut Connection,
        booker_id: &UserId,
        state: BookingState,
    ) -> error_stack::Result<Vec<Booking>, KernelError>;

    async fn find_all_by_owner(
        &self,
        con: &mut Connection,
        owner_id: &UserId,
        state: BookingState,
    ) -> error_stack::Result<Vec<Booking>, KernelError>;

    /// Every booking of one item, start ascending.
    async fn find_all_by_item(
        &self,
        con: &mut Connection,
        item_id: &ItemId,
    ) -> error_stack::Result<Vec<Booking>, KernelError>;

    /// A booking of `booker_id` on the item that ended before `before`.
    /// Gate for commenting.
    async fn find_finished(
        &self,
        con: &mut Connection,
        item_id: &ItemId,
        booker_id: &UserId,
        before: OffsetDateTime,
    ) -> error_stack::Result<Option<Booking>, KernelError>;
}

pub trait DependOnBookingQuery<Connection: Send>: 'static + Sync + Send {
    type BookingQuery: BookingQuery<Connection>;
    fn booking_query(&self) -> &Self::BookingQuery;
}
