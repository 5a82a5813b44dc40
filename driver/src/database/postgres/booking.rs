use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{BookingQuery, DependOnBookingQuery};
use kernel::interface::update::{BookingModifier, DependOnBookingModifier};
use kernel::prelude::entity::{
    Booking, BookingFilter, BookingId, BookingPeriod, BookingSelection, BookingState,
    BookingStatus, ItemId, StartOrder, UserId,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresBookingRepository;

#[async_trait::async_trait]
impl BookingQuery<PostgresConnection> for PostgresBookingRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        PgBookingInternal::find_by_id(con, id).await
    }

    async fn find_overlapping(
        &self,
        con: &mut PostgresConnection,
        item_id: &ItemId,
        instant: OffsetDateTime,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        PgBookingInternal::find_overlapping(con, item_id, instant).await
    }

    async fn find_all_by_booker(
        &self,
        con: &mut PostgresConnection,
        booker_id: &UserId,
        state: BookingState,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_all_by_booker(con, booker_id, state).await
    }

    async fn find_all_by_owner(
        &self,
        con: &mut PostgresConnection,
        owner_id: &UserId,
        state: BookingState,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_all_by_owner(con, owner_id, state).await
    }

    async fn find_all_by_item(
        &self,
        con: &mut PostgresConnection,
        item_id: &ItemId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_all_by_item(con, item_id).await
    }

    async fn find_finished(
        &self,
        con: &mut PostgresConnection,
        item_id: &ItemId,
        booker_id: &UserId,
        before: OffsetDateTime,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        PgBookingInternal::find_finished(con, item_id, booker_id, before).await
    }
}

impl DependOnBookingQuery<PostgresConnection> for PostgresDatabase {
    type BookingQuery = PostgresBookingRepository;
    fn booking_query(&self) -> &Self::BookingQuery {
        &PostgresBookingRepository
    }
}

#[async_trait::async_trait]
impl BookingModifier<PostgresConnection> for PostgresBookingRepository {
    async fn create(
        &self,
        con: &mut PostgresConnection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::create(con, booking).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::update(con, booking).await
    }
}

impl DependOnBookingModifier<PostgresConnection> for PostgresDatabase {
    type BookingModifier = PostgresBookingRepository;
    fn booking_modifier(&self) -> &Self::BookingModifier {
        &PostgresBookingRepository
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    item_id: Uuid,
    booker_id: Uuid,
    start_at: OffsetDateTime,
    end_at: OffsetDateTime,
    status: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = Report<KernelError>;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<BookingStatus>().map_err(Report::new)?;
        Ok(Booking::new(
            BookingId::new(row.id),
            ItemId::new(row.item_id),
            UserId::new(row.booker_id),
            BookingPeriod::new(row.start_at, row.end_at),
            status,
        ))
    }
}

fn collect(rows: Vec<BookingRow>) -> error_stack::Result<Vec<Booking>, KernelError> {
    rows.into_iter().map(Booking::try_from).collect()
}

pub(in crate::database) struct PgBookingInternal;

impl PgBookingInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        let row = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, item_id, booker_id, start_at, end_at, status
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Booking::try_from).transpose()
    }

    /// The pre-insert overlap read: any booking of the item whose interval
    /// covers the candidate start instant.
    async fn find_overlapping(
        con: &mut PgConnection,
        item_id: &ItemId,
        instant: OffsetDateTime,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        let row = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, item_id, booker_id, start_at, end_at, status
            FROM bookings
            WHERE item_id = $1 AND end_at > $2 AND start_at < $2
            LIMIT 1
            "#,
        )
        .bind(item_id.as_ref())
        .bind(instant)
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Booking::try_from).transpose()
    }

    async fn find_all_by_booker(
        con: &mut PgConnection,
        booker_id: &UserId,
        state: BookingState,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let BookingSelection { filter, order } = state.selection();
        let direction = direction(order);
        // "now" is bound per query, not shared between calls.
        let now = OffsetDateTime::now_utc();
        let rows = match filter {
            BookingFilter::Any => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT id, item_id, booker_id, start_at, end_at, status
                    FROM bookings
                    WHERE booker_id = $1
                    ORDER BY start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(booker_id.as_ref())
                    .fetch_all(con)
                    .await
            }
            BookingFilter::Status(status) => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT id, item_id, booker_id, start_at, end_at, status
                    FROM bookings
                    WHERE booker_id = $1 AND status = $2
                    ORDER BY start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(booker_id.as_ref())
                    .bind(status.as_str())
                    .fetch_all(con)
                    .await
            }
            BookingFilter::EndsBeforeNow => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT id, item_id, booker_id, start_at, end_at, status
                    FROM bookings
                    WHERE booker_id = $1 AND end_at < $2
                    ORDER BY start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(booker_id.as_ref())
                    .bind(now)
                    .fetch_all(con)
                    .await
            }
            BookingFilter::CoversNow => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT id, item_id, booker_id, start_at, end_at, status
                    FROM bookings
                    WHERE booker_id = $1 AND start_at < $2 AND end_at > $2
                    ORDER BY start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(booker_id.as_ref())
                    .bind(now)
                    .fetch_all(con)
                    .await
            }
            BookingFilter::StartsAfterNow => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT id, item_id, booker_id, start_at, end_at, status
                    FROM bookings
                    WHERE booker_id = $1 AND start_at > $2
                    ORDER BY start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(booker_id.as_ref())
                    .bind(now)
                    .fetch_all(con)
                    .await
            }
        }
        .convert_error()?;
        collect(rows)
    }

    async fn find_all_by_owner(
        con: &mut PgConnection,
        owner_id: &UserId,
        state: BookingState,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let BookingSelection { filter, order } = state.selection();
        let direction = direction(order);
        let now = OffsetDateTime::now_utc();
        let rows = match filter {
            BookingFilter::Any => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT b.id, b.item_id, b.booker_id, b.start_at, b.end_at, b.status
                    FROM bookings b
                    JOIN items i ON i.id = b.item_id
                    WHERE i.owner_id = $1
                    ORDER BY b.start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(owner_id.as_ref())
                    .fetch_all(con)
                    .await
            }
            BookingFilter::Status(status) => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT b.id, b.item_id, b.booker_id, b.start_at, b.end_at, b.status
                    FROM bookings b
                    JOIN items i ON i.id = b.item_id
                    WHERE i.owner_id = $1 AND b.status = $2
                    ORDER BY b.start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(owner_id.as_ref())
                    .bind(status.as_str())
                    .fetch_all(con)
                    .await
            }
            BookingFilter::EndsBeforeNow => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT b.id, b.item_id, b.booker_id, b.start_at, b.end_at, b.status
                    FROM bookings b
                    JOIN items i ON i.id = b.item_id
                    WHERE i.owner_id = $1 AND b.end_at < $2
                    ORDER BY b.start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(owner_id.as_ref())
                    .bind(now)
                    .fetch_all(con)
                    .await
            }
            BookingFilter::CoversNow => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT b.id, b.item_id, b.booker_id, b.start_at, b.end_at, b.status
                    FROM bookings b
                    JOIN items i ON i.id = b.item_id
                    WHERE i.owner_id = $1 AND b.start_at < $2 AND b.end_at > $2
                    ORDER BY b.start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(owner_id.as_ref())
                    .bind(now)
                    .fetch_all(con)
                    .await
            }
            BookingFilter::StartsAfterNow => {
                let sql = format!(
                    // language=postgresql
                    r#"
                    SELECT b.id, b.item_id, b.booker_id, b.start_at, b.end_at, b.status
                    FROM bookings b
                    JOIN items i ON i.id = b.item_id
                    WHERE i.owner_id = $1 AND b.start_at > $2
                    ORDER BY b.start_at {direction}
                    "#
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(owner_id.as_ref())
                    .bind(now)
                    .fetch_all(con)
                    .await
            }
        }
        .convert_error()?;
        collect(rows)
    }

    async fn find_all_by_item(
        con: &mut PgConnection,
        item_id: &ItemId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, item_id, booker_id, start_at, end_at, status
            FROM bookings
            WHERE item_id = $1
            ORDER BY start_at ASC
            "#,
        )
        .bind(item_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_finished(
        con: &mut PgConnection,
        item_id: &ItemId,
        booker_id: &UserId,
        before: OffsetDateTime,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        let row = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, item_id, booker_id, start_at, end_at, status
            FROM bookings
            WHERE item_id = $1 AND booker_id = $2 AND end_at < $3
            LIMIT 1
            "#,
        )
        .bind(item_id.as_ref())
        .bind(booker_id.as_ref())
        .bind(before)
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Booking::try_from).transpose()
    }

    async fn create(
        con: &mut PgConnection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO bookings (id, item_id, booker_id, start_at, end_at, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(booking.id().as_ref())
        .bind(booking.item_id().as_ref())
        .bind(booking.booker_id().as_ref())
        .bind(*booking.period().start())
        .bind(*booking.period().end())
        .bind(booking.status().as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE bookings
            SET item_id = $2, booker_id = $3, start_at = $4, end_at = $5, status = $6
            WHERE id = $1
            "#,
        )
        .bind(booking.id().as_ref())
        .bind(booking.item_id().as_ref())
        .bind(booking.booker_id().as_ref())
        .bind(*booking.period().start())
        .bind(*booking.period().end())
        .bind(booking.status().as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

fn direction(order: StartOrder) -> &'static str {
    match order {
        StartOrder::Asc => "ASC",
        StartOrder::Desc => "DESC",
    }
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};

    use kernel::interface::database::QueryDatabaseConnection;
    use kernel::interface::query::BookingQuery;
    use kernel::interface::update::{BookingModifier, ItemModifier, UserModifier};
    use kernel::prelude::entity::{
        Booking, BookingId, BookingPeriod, BookingState, BookingStatus, IsAvailable, Item,
        ItemDescription, ItemId, ItemName, User, UserEmail, UserId, UserName,
    };
    use kernel::KernelError;
    use rand::distributions::{Alphanumeric, DistString};

    use crate::database::postgres::{
        PostgresBookingRepository, PostgresDatabase, PostgresItemRepository,
        PostgresUserRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let suffix = Alphanumeric.sample_string(&mut rand::thread_rng(), 8);
        let owner_id = UserId::new(uuid::Uuid::new_v4());
        let owner = User::new(
            owner_id.clone(),
            UserName::new("owner"),
            UserEmail::new(format!("owner-{suffix}@example.com")),
        );
        PostgresUserRepository.create(&mut con, &owner).await?;

        let booker_id = UserId::new(uuid::Uuid::new_v4());
        let booker = User::new(
            booker_id.clone(),
            UserName::new("booker"),
            UserEmail::new(format!("booker-{suffix}@example.com")),
        );
        PostgresUserRepository.create(&mut con, &booker).await?;

        let item_id = ItemId::new(uuid::Uuid::new_v4());
        let item = Item::new(
            item_id.clone(),
            owner_id.clone(),
            ItemName::new("drill"),
            ItemDescription::new("electric drill"),
            IsAvailable::new(true),
            None,
        );
        PostgresItemRepository.create(&mut con, &item).await?;

        // Second precision so the value round-trips through timestamptz intact.
        let now = OffsetDateTime::from_unix_timestamp(OffsetDateTime::now_utc().unix_timestamp())
            .expect("valid timestamp");
        let booking_id = BookingId::new(uuid::Uuid::new_v4());
        let booking = Booking::new(
            booking_id.clone(),
            item_id.clone(),
            booker_id.clone(),
            BookingPeriod::new(now - Duration::hours(1), now + Duration::hours(1)),
            BookingStatus::Waiting,
        );
        PostgresBookingRepository.create(&mut con, &booking).await?;

        let found = PostgresBookingRepository
            .find_by_id(&mut con, &booking_id)
            .await?;
        assert_eq!(found, Some(booking.clone()));

        let covering = PostgresBookingRepository
            .find_overlapping(&mut con, &item_id, now)
            .await?;
        assert_eq!(covering, Some(booking.clone()));

        let current = PostgresBookingRepository
            .find_all_by_booker(&mut con, &booker_id, BookingState::Current)
            .await?;
        assert_eq!(current, vec![booking.clone()]);

        let waiting_for_owner = PostgresBookingRepository
            .find_all_by_owner(&mut con, &owner_id, BookingState::Waiting)
            .await?;
        assert_eq!(waiting_for_owner, vec![booking.clone()]);

        let decided = booking.decide(true);
        PostgresBookingRepository.update(&mut con, &decided).await?;
        let found = PostgresBookingRepository
            .find_by_id(&mut con, &booking_id)
            .await?;
        assert_eq!(found, Some(decided));
        Ok(())
    }
}
