use crate::entity::Booking;
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookingModifier<Connection: Send>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError>;

    /// Single-row overwrite; the only mutation is the owner's decision.
    async fn update(
        &self,
        con: &mut Connection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookingModifier<Connection: Send>: 'static + Sync + Send {
    type BookingModifier: BookingModifier<Connection>;
    fn booking_modifier(&self) -> &Self::BookingModifier;
}
