use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DependOnDatabaseConnection, QueryDatabaseConnection};
use kernel::interface::query::{
    BookingQuery, DependOnBookingQuery, DependOnItemQuery, DependOnUserQuery, ItemQuery, UserQuery,
};
use kernel::interface::update::{BookingModifier, DependOnBookingModifier};
use kernel::prelude::entity::{
    Booking, BookingId, BookingPeriod, BookingStatus, Item, ItemId, UserId,
};
use kernel::KernelError;

use crate::transfer::{
    BookingDto, CreateBookingDto, GetBookingDto, ListBookingsDto, UpdateBookingStatusDto,
};

static ALREADY_BOOKED: &str = "item is already booked for this time window";
static SELF_BOOKING: &str = "owner cannot book their own item";
static UNAVAILABLE: &str = "item is not available for rental";
static INVALID_PERIOD: &str = "end time must be after start time";
static OWNER_ONLY_DECISION: &str = "only the item owner can change the booking status";
static RELATED_ONLY_READ: &str = "only the item owner or the booker can view this booking";

/// Rules checked after the overlap read, in reporting order. Only the first
/// violated rule is surfaced.
fn first_rejection(period: &BookingPeriod, booker_id: &UserId, item: &Item) -> Option<&'static str> {
    if item.is_owned_by(booker_id) {
        return Some(SELF_BOOKING);
    }
    if !bool::from(*item.available()) {
        return Some(UNAVAILABLE);
    }
    if !period.is_positive() {
        return Some(INVALID_PERIOD);
    }
    None
}

#[async_trait::async_trait]
pub trait CreateBookingService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnItemQuery<Connection>
    + DependOnBookingQuery<Connection>
    + DependOnBookingModifier<Connection>
{
    async fn create_booking(
        &self,
        dto: CreateBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let item_id = ItemId::new(dto.item_id);
        let item = self
            .item_query()
            .find_by_id(&mut connection, &item_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("item")))?;

        let booker_id = UserId::new(dto.booker_id);
        let booker = self
            .user_query()
            .find_by_id(&mut connection, &booker_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let period = BookingPeriod::new(dto.start, dto.end);

        // The overlap read and the insert below are two independent storage
        // operations; concurrent creations for the same window can both pass
        // the read.
        let overlapping = self
            .booking_query()
            .find_overlapping(&mut connection, &item_id, *period.start())
            .await?;
        if overlapping.is_some() {
            return Err(Report::new(KernelError::rejected(ALREADY_BOOKED)));
        }
        if let Some(reason) = first_rejection(&period, &booker_id, &item) {
            return Err(Report::new(KernelError::rejected(reason)));
        }

        let booking = Booking::new(
            BookingId::new(Uuid::new_v4()),
            item_id,
            booker_id,
            period,
            BookingStatus::Waiting,
        );
        self.booking_modifier()
            .create(&mut connection, &booking)
            .await?;

        Ok(BookingDto::project(booking, item, booker))
    }
}

impl<Connection: Send, T> CreateBookingService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnItemQuery<Connection>
        + DependOnBookingQuery<Connection>
        + DependOnBookingModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait UpdateBookingStatusService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnItemQuery<Connection>
    + DependOnBookingQuery<Connection>
    + DependOnBookingModifier<Connection>
{
    /// Owner decision on a waiting booking. Deliberately does not refuse a
    /// second decision on an already approved or rejected booking.
    async fn update_booking_status(
        &self,
        dto: UpdateBookingStatusDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let booking_id = BookingId::new(dto.booking_id);
        let booking = self
            .booking_query()
            .find_by_id(&mut connection, &booking_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("booking")))?;

        let item = self
            .item_query()
            .find_by_id(&mut connection, booking.item_id())
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("item")))?;

        let caller_id = UserId::new(dto.caller_id);
        if !item.is_owned_by(&caller_id) {
            return Err(Report::new(KernelError::rejected(OWNER_ONLY_DECISION)));
        }

        let booking = booking.decide(dto.approved);
        self.booking_modifier()
            .update(&mut connection, &booking)
            .await?;

        let booker = self
            .user_query()
            .find_by_id(&mut connection, booking.booker_id())
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        Ok(BookingDto::project(booking, item, booker))
    }
}

impl<Connection: Send, T> UpdateBookingStatusService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnItemQuery<Connection>
        + DependOnBookingQuery<Connection>
        + DependOnBookingModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait GetBookingService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnItemQuery<Connection>
    + DependOnBookingQuery<Connection>
{
    async fn get_booking(
        &self,
        dto: GetBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let caller_id = UserId::new(dto.caller_id);
        self.user_query()
            .find_by_id(&mut connection, &caller_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let booking_id = BookingId::new(dto.booking_id);
        let booking = self
            .booking_query()
            .find_by_id(&mut connection, &booking_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("booking")))?;

        let item = self
            .item_query()
            .find_by_id(&mut connection, booking.item_id())
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("item")))?;

        if !booking.is_booked_by(&caller_id) && !item.is_owned_by(&caller_id) {
            return Err(Report::new(KernelError::rejected(RELATED_ONLY_READ)));
        }

        let booker = self
            .user_query()
            .find_by_id(&mut connection, booking.booker_id())
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        Ok(BookingDto::project(booking, item, booker))
    }
}

impl<Connection: Send, T> GetBookingService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnItemQuery<Connection>
        + DependOnBookingQuery<Connection>
{
}

#[async_trait::async_trait]
pub trait ListBookingsService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnItemQuery<Connection>
    + DependOnBookingQuery<Connection>
{
    async fn find_all_by_booker(
        &self,
        dto: ListBookingsDto,
    ) -> error_stack::Result<Vec<BookingDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let booker_id = UserId::new(dto.user_id);
        let booker = self
            .user_query()
            .find_by_id(&mut connection, &booker_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let bookings = self
            .booking_query()
            .find_all_by_booker(&mut connection, &booker_id, dto.state)
            .await?;

        let mut result = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let item = self
                .item_query()
                .find_by_id(&mut connection, booking.item_id())
                .await?
                .ok_or_else(|| Report::new(KernelError::not_found("item")))?;
            result.push(BookingDto::project(booking, item, booker.clone()));
        }
        Ok(result)
    }

    async fn find_all_by_owner(
        &self,
        dto: ListBookingsDto,
    ) -> error_stack::Result<Vec<BookingDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let owner_id = UserId::new(dto.user_id);
        self.user_query()
            .find_by_id(&mut connection, &owner_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let bookings = self
            .booking_query()
            .find_all_by_owner(&mut connection, &owner_id, dto.state)
            .await?;

        let mut result = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let item = self
                .item_query()
                .find_by_id(&mut connection, booking.item_id())
                .await?
                .ok_or_else(|| Report::new(KernelError::not_found("item")))?;
            let booker = self
                .user_query()
                .find_by_id(&mut connection, booking.booker_id())
                .await?
                .ok_or_else(|| Report::new(KernelError::not_found("user")))?;
            result.push(BookingDto::project(booking, item, booker));
        }
        Ok(result)
    }
}

impl<Connection: Send, T> ListBookingsService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnItemQuery<Connection>
        + DependOnBookingQuery<Connection>
{
}

#[cfg(test)]
mod test {
    use error_stack::Report;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use kernel::prelude::entity::{
        Booking, BookingId, BookingPeriod, BookingState, BookingStatus, IsAvailable, Item,
        ItemDescription, ItemId, ItemName, User, UserEmail, UserId, UserName,
    };
    use kernel::KernelError;

    use crate::testing::MockApp;
    use crate::transfer::{
        CreateBookingDto, GetBookingDto, ListBookingsDto, UpdateBookingStatusDto,
    };

    use super::{
        CreateBookingService, GetBookingService, ListBookingsService, UpdateBookingStatusService,
        ALREADY_BOOKED, INVALID_PERIOD, OWNER_ONLY_DECISION, RELATED_ONLY_READ, SELF_BOOKING,
        UNAVAILABLE,
    };

    fn reason(report: &Report<KernelError>) -> String {
        report.current_context().to_string()
    }

    fn user(name: &str) -> User {
        User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new(name),
            UserEmail::new(format!("{name}@example.com")),
        )
    }

    fn listed_item(owner: &User, available: bool) -> Item {
        Item::new(
            ItemId::new(Uuid::new_v4()),
            owner.id().clone(),
            ItemName::new("drill"),
            ItemDescription::new("electric drill"),
            IsAvailable::new(available),
            None,
        )
    }

    /// Owner, booker and one available item, pre-seeded.
    fn rental_setup() -> (MockApp, User, User, Item) {
        let app = MockApp::default();
        let owner = user("owner");
        let booker = user("booker");
        let item = listed_item(&owner, true);
        {
            let mut store = app.store.lock().unwrap();
            store.users.push(owner.clone());
            store.users.push(booker.clone());
            store.items.push(item.clone());
        }
        (app, owner, booker, item)
    }

    fn booking_request(item: &Item, booker: &User, start: OffsetDateTime, end: OffsetDateTime) -> CreateBookingDto {
        CreateBookingDto {
            booker_id: booker.id().clone().into(),
            item_id: item.id().clone().into(),
            start,
            end,
        }
    }

    const NOW: OffsetDateTime = datetime!(2024-06-10 12:00 UTC);

    #[tokio::test]
    async fn created_booking_starts_waiting() {
        let (app, _owner, booker, item) = rental_setup();
        let dto = app
            .create_booking(booking_request(
                &item,
                &booker,
                NOW + Duration::days(1),
                NOW + Duration::days(2),
            ))
            .await
            .unwrap();
        assert_eq!(dto.status, BookingStatus::Waiting);
        assert_eq!(dto.item.id, Uuid::from(item.id().clone()));
        assert_eq!(dto.booker.id, Uuid::from(booker.id().clone()));
    }

    #[tokio::test]
    async fn inverted_interval_is_rejected() {
        let (app, _owner, booker, item) = rental_setup();
        let error = app
            .create_booking(booking_request(
                &item,
                &booker,
                NOW + Duration::days(2),
                NOW + Duration::days(1),
            ))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), INVALID_PERIOD);
    }

    #[tokio::test]
    async fn zero_length_interval_is_rejected() {
        let (app, _owner, booker, item) = rental_setup();
        let at = NOW + Duration::days(1);
        let error = app
            .create_booking(booking_request(&item, &booker, at, at))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), INVALID_PERIOD);
    }

    #[tokio::test]
    async fn unavailable_item_is_rejected() {
        let (app, owner, booker, _item) = rental_setup();
        let hidden = listed_item(&owner, false);
        app.store.lock().unwrap().items.push(hidden.clone());
        let error = app
            .create_booking(booking_request(
                &hidden,
                &booker,
                NOW + Duration::days(1),
                NOW + Duration::days(2),
            ))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), UNAVAILABLE);
    }

    #[tokio::test]
    async fn owner_cannot_book_own_item() {
        let (app, owner, _booker, item) = rental_setup();
        let error = app
            .create_booking(booking_request(
                &item,
                &owner,
                NOW + Duration::days(1),
                NOW + Duration::days(2),
            ))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), SELF_BOOKING);
    }

    #[tokio::test]
    async fn overlapping_window_is_rejected() {
        let (app, _owner, booker, item) = rental_setup();
        app.create_booking(booking_request(
            &item,
            &booker,
            NOW + Duration::days(1),
            NOW + Duration::days(3),
        ))
        .await
        .unwrap();

        let second = user("second");
        app.store.lock().unwrap().users.push(second.clone());
        let error = app
            .create_booking(booking_request(
                &item,
                &second,
                NOW + Duration::days(2),
                NOW + Duration::days(4),
            ))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), ALREADY_BOOKED);
    }

    #[tokio::test]
    async fn overlap_is_reported_before_self_booking() {
        let (app, owner, booker, item) = rental_setup();
        app.create_booking(booking_request(
            &item,
            &booker,
            NOW + Duration::days(1),
            NOW + Duration::days(3),
        ))
        .await
        .unwrap();

        // Owner violates both rules; the overlap reason wins.
        let error = app
            .create_booking(booking_request(
                &item,
                &owner,
                NOW + Duration::days(2),
                NOW + Duration::days(4),
            ))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), ALREADY_BOOKED);
    }

    #[tokio::test]
    async fn self_booking_is_reported_before_availability() {
        let (app, owner, _booker, _item) = rental_setup();
        let hidden = listed_item(&owner, false);
        app.store.lock().unwrap().items.push(hidden.clone());
        let error = app
            .create_booking(booking_request(
                &hidden,
                &owner,
                NOW + Duration::days(1),
                NOW + Duration::days(2),
            ))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), SELF_BOOKING);
    }

    #[tokio::test]
    async fn availability_is_reported_before_interval_sanity() {
        let (app, owner, booker, _item) = rental_setup();
        let hidden = listed_item(&owner, false);
        app.store.lock().unwrap().items.push(hidden.clone());
        let error = app
            .create_booking(booking_request(
                &hidden,
                &booker,
                NOW + Duration::days(2),
                NOW + Duration::days(1),
            ))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_item_is_a_named_not_found() {
        let (app, _owner, booker, _item) = rental_setup();
        let error = app
            .create_booking(CreateBookingDto {
                booker_id: booker.id().clone().into(),
                item_id: Uuid::new_v4(),
                start: NOW + Duration::days(1),
                end: NOW + Duration::days(2),
            })
            .await
            .unwrap_err();
        assert_eq!(reason(&error), "item not found");
    }

    #[tokio::test]
    async fn unknown_booker_is_a_named_not_found() {
        let (app, _owner, _booker, item) = rental_setup();
        let error = app
            .create_booking(CreateBookingDto {
                booker_id: Uuid::new_v4(),
                item_id: item.id().clone().into(),
                start: NOW + Duration::days(1),
                end: NOW + Duration::days(2),
            })
            .await
            .unwrap_err();
        assert_eq!(reason(&error), "user not found");
    }

    #[tokio::test]
    async fn approved_rental_blocks_the_window() {
        let (app, owner, booker, item) = rental_setup();
        let created = app
            .create_booking(booking_request(&item, &booker, NOW, NOW + Duration::days(1)))
            .await
            .unwrap();
        assert_eq!(created.status, BookingStatus::Waiting);

        let approved = app
            .update_booking_status(UpdateBookingStatusDto {
                booking_id: created.id,
                caller_id: owner.id().clone().into(),
                approved: true,
            })
            .await
            .unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let second = user("second");
        app.store.lock().unwrap().users.push(second.clone());
        let error = app
            .create_booking(booking_request(
                &item,
                &second,
                NOW + Duration::hours(12),
                NOW + Duration::hours(36),
            ))
            .await
            .unwrap_err();
        assert_eq!(reason(&error), ALREADY_BOOKED);
    }

    #[tokio::test]
    async fn only_the_owner_may_decide() {
        let (app, _owner, booker, item) = rental_setup();
        let created = app
            .create_booking(booking_request(
                &item,
                &booker,
                NOW + Duration::days(1),
                NOW + Duration::days(2),
            ))
            .await
            .unwrap();

        let error = app
            .update_booking_status(UpdateBookingStatusDto {
                booking_id: created.id,
                caller_id: booker.id().clone().into(),
                approved: true,
            })
            .await
            .unwrap_err();
        assert_eq!(reason(&error), OWNER_ONLY_DECISION);
        assert!(matches!(
            error.current_context(),
            KernelError::ConditionsNotMet { .. }
        ));
    }

    #[tokio::test]
    async fn a_decided_booking_may_be_decided_again() {
        let (app, owner, booker, item) = rental_setup();
        let created = app
            .create_booking(booking_request(
                &item,
                &booker,
                NOW + Duration::days(1),
                NOW + Duration::days(2),
            ))
            .await
            .unwrap();

        let decide = |approved: bool| UpdateBookingStatusDto {
            booking_id: created.id,
            caller_id: owner.id().clone().into(),
            approved,
        };
        let approved = app.update_booking_status(decide(true)).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);
        let rejected = app.update_booking_status(decide(false)).await.unwrap();
        assert_eq!(rejected.status, BookingStatus::Rejected);
    }

    #[tokio::test]
    async fn unrelated_caller_is_rejected_not_hidden() {
        let (app, _owner, booker, item) = rental_setup();
        let created = app
            .create_booking(booking_request(
                &item,
                &booker,
                NOW + Duration::days(1),
                NOW + Duration::days(2),
            ))
            .await
            .unwrap();

        let stranger = user("stranger");
        app.store.lock().unwrap().users.push(stranger.clone());
        let error = app
            .get_booking(GetBookingDto {
                booking_id: created.id,
                caller_id: stranger.id().clone().into(),
            })
            .await
            .unwrap_err();
        assert_eq!(reason(&error), RELATED_ONLY_READ);
        assert!(matches!(
            error.current_context(),
            KernelError::ConditionsNotMet { .. }
        ));
    }

    #[tokio::test]
    async fn repeated_reads_return_the_same_projection() {
        let (app, owner, booker, item) = rental_setup();
        let created = app
            .create_booking(booking_request(
                &item,
                &booker,
                NOW + Duration::days(1),
                NOW + Duration::days(2),
            ))
            .await
            .unwrap();

        let request = || GetBookingDto {
            booking_id: created.id,
            caller_id: owner.id().clone().into(),
        };
        let first = app.get_booking(request()).await.unwrap();
        let second = app.get_booking(request()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn state_buckets_partition_the_booker_history() {
        let (app, _owner, booker, item) = rental_setup();
        let now = OffsetDateTime::now_utc();
        let seed = |start: OffsetDateTime, end: OffsetDateTime, status: BookingStatus| {
            let booking = Booking::new(
                BookingId::new(Uuid::new_v4()),
                item.id().clone(),
                booker.id().clone(),
                BookingPeriod::new(start, end),
                status,
            );
            app.store.lock().unwrap().bookings.push(booking);
        };
        seed(
            now - Duration::days(4),
            now - Duration::days(3),
            BookingStatus::Approved,
        );
        seed(
            now - Duration::hours(1),
            now + Duration::hours(1),
            BookingStatus::Approved,
        );
        seed(
            now + Duration::days(1),
            now + Duration::days(2),
            BookingStatus::Waiting,
        );
        seed(
            now + Duration::days(3),
            now + Duration::days(4),
            BookingStatus::Rejected,
        );

        let list = |state: BookingState| {
            let app = app.clone();
            let booker_id: Uuid = booker.id().clone().into();
            async move {
                app.find_all_by_booker(ListBookingsDto {
                    user_id: booker_id,
                    state,
                })
                .await
                .unwrap()
            }
        };

        let all = list(BookingState::All).await;
        assert_eq!(all.len(), 4);
        // ALL is the one ascending bucket.
        assert!(all.windows(2).all(|pair| pair[0].start <= pair[1].start));

        let past = list(BookingState::Past).await;
        let current = list(BookingState::Current).await;
        let future = list(BookingState::Future).await;
        assert_eq!(past.len() + current.len() + future.len(), all.len());

        let waiting = list(BookingState::Waiting).await;
        let rejected = list(BookingState::Rejected).await;
        assert_eq!(waiting.len(), 1);
        assert_eq!(rejected.len(), 1);

        let future_ids: Vec<Uuid> = future.iter().map(|dto| dto.id).collect();
        // FUTURE sorts start descending.
        assert!(future
            .windows(2)
            .all(|pair| pair[0].start >= pair[1].start));
        assert!(waiting.iter().all(|dto| future_ids.contains(&dto.id)));
    }
}
