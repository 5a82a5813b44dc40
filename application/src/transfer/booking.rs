use kernel::prelude::entity::{
    Booking, BookingState, BookingStatus, DestructBooking, DestructItem, Item, User,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::UserDto;

#[derive(Debug, Clone, PartialEq)]
pub struct ItemShortDto {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
}

impl From<Item> for ItemShortDto {
    fn from(value: Item) -> Self {
        let DestructItem {
            id, owner_id, name, ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            owner_id: owner_id.into(),
        }
    }
}

/// Full booking projection returned by direct booking reads and listings.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDto {
    pub id: Uuid,
    pub item: ItemShortDto,
    pub booker: UserDto,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub status: BookingStatus,
}

impl BookingDto {
    pub fn project(booking: Booking, item: Item, booker: User) -> Self {
        let DestructBooking {
            id,
            period,
            status,
            ..
        } = booking.into_destruct();
        Self {
            id: id.into(),
            item: ItemShortDto::from(item),
            booker: UserDto::from(booker),
            start: *period.start(),
            end: *period.end(),
            status,
        }
    }
}

pub struct CreateBookingDto {
    pub booker_id: Uuid,
    pub item_id: Uuid,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

pub struct UpdateBookingStatusDto {
    pub booking_id: Uuid,
    pub caller_id: Uuid,
    pub approved: bool,
}

pub struct GetBookingDto {
    pub booking_id: Uuid,
    pub caller_id: Uuid,
}

pub struct ListBookingsDto {
    pub user_id: Uuid,
    pub state: BookingState,
}
