use kernel::prelude::entity::{Booking, Comment, DestructBooking, DestructItem, Item};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::CommentDto;

/// Compact booking annotation carried by item views.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSummaryDto {
    pub id: Uuid,
    pub booker_id: Uuid,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl From<Booking> for BookingSummaryDto {
    fn from(value: Booking) -> Self {
        let DestructBooking {
            id,
            booker_id,
            period,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            booker_id: booker_id.into(),
            start: *period.start(),
            end: *period.end(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<Uuid>,
    /// The booking whose interval contains "now", if any. Not the most
    /// recently ended one.
    pub current_booking: Option<BookingSummaryDto>,
    /// The soonest booking starting strictly after "now".
    pub next_booking: Option<BookingSummaryDto>,
    pub comments: Vec<CommentDto>,
}

impl From<Item> for ItemDto {
    fn from(value: Item) -> Self {
        let DestructItem {
            id,
            name,
            description,
            available,
            request_id,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            available: available.into(),
            request_id: request_id.map(Uuid::from),
            current_booking: None,
            next_booking: None,
            comments: Vec::new(),
        }
    }
}

impl ItemDto {
    /// Projects an item together with its booking annotations. `bookings` may
    /// span several items (an owner-wide fetch); rows of other items are
    /// skipped. Expects start-ascending input for the current-booking pick.
    pub fn assemble(
        item: Item,
        bookings: &[Booking],
        comments: Vec<Comment>,
        now: OffsetDateTime,
    ) -> Self {
        let item_id = item.id().clone();
        let mut dto = ItemDto::from(item);

        dto.current_booking = bookings
            .iter()
            .filter(|booking| booking.item_id() == &item_id)
            .find(|booking| booking.period().contains(now))
            .cloned()
            .map(BookingSummaryDto::from);

        dto.next_booking = bookings
            .iter()
            .filter(|booking| booking.item_id() == &item_id)
            .filter(|booking| booking.period().starts_after(now))
            .min_by_key(|booking| *booking.period().start())
            .cloned()
            .map(BookingSummaryDto::from);

        dto.comments = comments.into_iter().map(CommentDto::from).collect();
        dto
    }
}

pub struct GetItemDto {
    pub id: Uuid,
}

pub struct ListOwnedItemsDto {
    pub owner_id: Uuid,
}

pub struct CreateItemDto {
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<Uuid>,
}

pub struct UpdateItemDto {
    pub item_id: Uuid,
    pub caller_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

pub struct SearchItemsDto {
    pub text: String,
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{
        Booking, BookingId, BookingPeriod, BookingStatus, IsAvailable, Item, ItemDescription,
        ItemId, ItemName, UserId,
    };
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use super::ItemDto;

    fn item(id: ItemId, owner: UserId) -> Item {
        Item::new(
            id,
            owner,
            ItemName::new("drill"),
            ItemDescription::new("electric drill"),
            IsAvailable::new(true),
            None,
        )
    }

    fn booking(item_id: &ItemId, start: OffsetDateTime, end: OffsetDateTime) -> Booking {
        Booking::new(
            BookingId::new(Uuid::new_v4()),
            item_id.clone(),
            UserId::new(Uuid::new_v4()),
            BookingPeriod::new(start, end),
            BookingStatus::Approved,
        )
    }

    #[test]
    fn current_is_the_containing_booking_not_the_latest_past_one() {
        let now = datetime!(2024-06-10 12:00 UTC);
        let item_id = ItemId::new(Uuid::new_v4());
        let past = booking(&item_id, now - Duration::days(5), now - Duration::days(4));
        let active = booking(&item_id, now - Duration::hours(1), now + Duration::hours(1));
        let bookings = vec![past, active.clone()];

        let dto = ItemDto::assemble(
            item(item_id, UserId::new(Uuid::new_v4())),
            &bookings,
            Vec::new(),
            now,
        );

        let current = dto.current_booking.expect("active booking should be picked");
        assert_eq!(current.id, Uuid::from(active.id().clone()));
    }

    #[test]
    fn next_is_the_soonest_strictly_future_booking() {
        let now = datetime!(2024-06-10 12:00 UTC);
        let item_id = ItemId::new(Uuid::new_v4());
        let later = booking(&item_id, now + Duration::days(7), now + Duration::days(8));
        let sooner = booking(&item_id, now + Duration::days(2), now + Duration::days(3));
        let bookings = vec![later, sooner.clone()];

        let dto = ItemDto::assemble(
            item(item_id, UserId::new(Uuid::new_v4())),
            &bookings,
            Vec::new(),
            now,
        );

        let next = dto.next_booking.expect("future booking should be picked");
        assert_eq!(next.id, Uuid::from(sooner.id().clone()));
    }

    #[test]
    fn bookings_of_other_items_are_ignored() {
        let now = datetime!(2024-06-10 12:00 UTC);
        let item_id = ItemId::new(Uuid::new_v4());
        let other = booking(
            &ItemId::new(Uuid::new_v4()),
            now - Duration::hours(1),
            now + Duration::hours(1),
        );

        let dto = ItemDto::assemble(
            item(item_id, UserId::new(Uuid::new_v4())),
            &[other],
            Vec::new(),
            now,
        );

        assert!(dto.current_booking.is_none());
        assert!(dto.next_booking.is_none());
    }

    #[test]
    fn booking_starting_exactly_now_is_neither_current_nor_next() {
        let now = datetime!(2024-06-10 12:00 UTC);
        let item_id = ItemId::new(Uuid::new_v4());
        let boundary = booking(&item_id, now, now + Duration::hours(2));

        let dto = ItemDto::assemble(
            item(item_id, UserId::new(Uuid::new_v4())),
            &[boundary],
            Vec::new(),
            now,
        );

        assert!(dto.current_booking.is_none());
        assert!(dto.next_booking.is_none());
    }
}
