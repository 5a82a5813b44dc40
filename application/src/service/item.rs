use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::database::{DependOnDatabaseConnection, QueryDatabaseConnection};
use kernel::interface::query::{
    BookingQuery, CommentQuery, DependOnBookingQuery, DependOnCommentQuery, DependOnItemQuery,
    DependOnRequestQuery, DependOnUserQuery, ItemQuery, RequestQuery, UserQuery,
};
use kernel::interface::update::{
    CommentModifier, DependOnCommentModifier, DependOnItemModifier, ItemModifier,
};
use kernel::prelude::entity::{
    BookingState, Comment, CommentId, CommentText, CreatedAt, IsAvailable, Item, ItemDescription,
    ItemId, ItemName, RequestId, UserId,
};
use kernel::KernelError;

use crate::transfer::{
    CommentDto, CreateCommentDto, CreateItemDto, GetItemDto, ItemDto, ListOwnedItemsDto,
    SearchItemsDto, UpdateItemDto,
};

static NOT_THE_OWNER: &str = "user is not the owner of the item";
static NO_FINISHED_RENTAL: &str = "user has not rented this item or the rental is not finished yet";

#[async_trait::async_trait]
pub trait GetItemService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnItemQuery<Connection>
    + DependOnBookingQuery<Connection>
    + DependOnCommentQuery<Connection>
{
    /// Item detail view with its booking annotations and comments.
    async fn get_item(&self, dto: GetItemDto) -> error_stack::Result<ItemDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = ItemId::new(dto.id);
        let item = self
            .item_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("item")))?;
        let bookings = self
            .booking_query()
            .find_all_by_item(&mut connection, &id)
            .await?;
        let comments = self
            .comment_query()
            .find_all_by_item(&mut connection, &id)
            .await?;

        Ok(ItemDto::assemble(
            item,
            &bookings,
            comments,
            OffsetDateTime::now_utc(),
        ))
    }
}

impl<Connection: Send, T> GetItemService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnItemQuery<Connection>
        + DependOnBookingQuery<Connection>
        + DependOnCommentQuery<Connection>
{
}

#[async_trait::async_trait]
pub trait ListOwnedItemsService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnItemQuery<Connection>
    + DependOnBookingQuery<Connection>
    + DependOnCommentQuery<Connection>
{
    async fn find_all_owned(
        &self,
        dto: ListOwnedItemsDto,
    ) -> error_stack::Result<Vec<ItemDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let owner_id = UserId::new(dto.owner_id);
        let bookings = self
            .booking_query()
            .find_all_by_owner(&mut connection, &owner_id, BookingState::All)
            .await?;
        let items = self
            .item_query()
            .find_all_by_owner(&mut connection, &owner_id)
            .await?;

        let now = OffsetDateTime::now_utc();
        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let comments = self
                .comment_query()
                .find_all_by_item(&mut connection, item.id())
                .await?;
            result.push(ItemDto::assemble(item, &bookings, comments, now));
        }
        Ok(result)
    }
}

impl<Connection: Send, T> ListOwnedItemsService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnItemQuery<Connection>
        + DependOnBookingQuery<Connection>
        + DependOnCommentQuery<Connection>
{
}

#[async_trait::async_trait]
pub trait CreateItemService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnRequestQuery<Connection>
    + DependOnItemModifier<Connection>
{
    async fn create_item(&self, dto: CreateItemDto) -> error_stack::Result<ItemDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let owner_id = UserId::new(dto.owner_id);
        self.user_query()
            .find_by_id(&mut connection, &owner_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let request_id = match dto.request_id {
            Some(id) => {
                let request_id = RequestId::new(id);
                self.request_query()
                    .find_by_id(&mut connection, &request_id)
                    .await?
                    .ok_or_else(|| Report::new(KernelError::not_found("request")))?;
                Some(request_id)
            }
            None => None,
        };

        let item = Item::new(
            ItemId::new(Uuid::new_v4()),
            owner_id,
            ItemName::new(dto.name),
            ItemDescription::new(dto.description),
            IsAvailable::new(dto.available),
            request_id,
        );
        self.item_modifier().create(&mut connection, &item).await?;
        Ok(ItemDto::from(item))
    }
}

impl<Connection: Send, T> CreateItemService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnRequestQuery<Connection>
        + DependOnItemModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait UpdateItemService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnItemQuery<Connection>
    + DependOnItemModifier<Connection>
{
    async fn update_item(&self, dto: UpdateItemDto) -> error_stack::Result<ItemDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = ItemId::new(dto.item_id);
        let item = self
            .item_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("item")))?;

        let caller_id = UserId::new(dto.caller_id);
        if !item.is_owned_by(&caller_id) {
            return Err(Report::new(KernelError::rejected(NOT_THE_OWNER)));
        }

        let mut destruct = item.into_destruct();
        if let Some(name) = dto.name {
            destruct.name = ItemName::new(name);
        }
        if let Some(description) = dto.description {
            destruct.description = ItemDescription::new(description);
        }
        if let Some(available) = dto.available {
            destruct.available = IsAvailable::new(available);
        }
        let item = Item::new(
            destruct.id,
            destruct.owner_id,
            destruct.name,
            destruct.description,
            destruct.available,
            destruct.request_id,
        );

        self.item_modifier().update(&mut connection, &item).await?;
        Ok(ItemDto::from(item))
    }
}

impl<Connection: Send, T> UpdateItemService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnItemQuery<Connection>
        + DependOnItemModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait SearchItemsService<Connection: Send>:
    'static + Sync + Send + DependOnDatabaseConnection<Connection> + DependOnItemQuery<Connection>
{
    async fn search_items(
        &self,
        dto: SearchItemsDto,
    ) -> error_stack::Result<Vec<ItemDto>, KernelError> {
        if dto.text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut connection = self.database_connection().transact().await?;

        let items = self.item_query().search(&mut connection, &dto.text).await?;
        Ok(items.into_iter().map(ItemDto::from).collect())
    }
}

impl<Connection: Send, T> SearchItemsService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnItemQuery<Connection>
{
}

#[async_trait::async_trait]
pub trait CreateCommentService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnItemQuery<Connection>
    + DependOnBookingQuery<Connection>
    + DependOnCommentModifier<Connection>
{
    /// Commenting is only open to a booker whose rental of the item already
    /// ended.
    async fn create_comment(
        &self,
        dto: CreateCommentDto,
    ) -> error_stack::Result<CommentDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let item_id = ItemId::new(dto.item_id);
        let item = self
            .item_query()
            .find_by_id(&mut connection, &item_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("item")))?;

        let author_id = UserId::new(dto.author_id);
        let author = self
            .user_query()
            .find_by_id(&mut connection, &author_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        self.booking_query()
            .find_finished(
                &mut connection,
                item.id(),
                &author_id,
                OffsetDateTime::now_utc(),
            )
            .await?
            .ok_or_else(|| Report::new(KernelError::rejected(NO_FINISHED_RENTAL)))?;

        let comment = Comment::new(
            CommentId::new(Uuid::new_v4()),
            item_id,
            author_id,
            author.name().clone(),
            CommentText::new(dto.text),
            CreatedAt::new(OffsetDateTime::now_utc()),
        );
        self.comment_modifier()
            .create(&mut connection, &comment)
            .await?;
        Ok(CommentDto::from(comment))
    }
}

impl<Connection: Send, T> CreateCommentService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnItemQuery<Connection>
        + DependOnBookingQuery<Connection>
        + DependOnCommentModifier<Connection>
{
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use kernel::prelude::entity::{
        Booking, BookingId, BookingPeriod, BookingStatus, IsAvailable, Item, ItemDescription,
        ItemId, ItemName, User, UserEmail, UserId, UserName,
    };
    use kernel::KernelError;

    use crate::testing::MockApp;
    use crate::transfer::{
        CreateCommentDto, GetItemDto, ListOwnedItemsDto, SearchItemsDto, UpdateItemDto,
    };

    use super::{
        CreateCommentService, GetItemService, ListOwnedItemsService, SearchItemsService,
        UpdateItemService, NOT_THE_OWNER, NO_FINISHED_RENTAL,
    };

    fn user(name: &str) -> User {
        User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new(name),
            UserEmail::new(format!("{name}@example.com")),
        )
    }

    fn listed_item(owner: &User) -> Item {
        Item::new(
            ItemId::new(Uuid::new_v4()),
            owner.id().clone(),
            ItemName::new("drill"),
            ItemDescription::new("electric drill"),
            IsAvailable::new(true),
            None,
        )
    }

    fn seeded() -> (MockApp, User, User, Item) {
        let app = MockApp::default();
        let owner = user("owner");
        let renter = user("renter");
        let item = listed_item(&owner);
        {
            let mut store = app.store.lock().unwrap();
            store.users.push(owner.clone());
            store.users.push(renter.clone());
            store.items.push(item.clone());
        }
        (app, owner, renter, item)
    }

    fn seed_booking(app: &MockApp, item: &Item, renter: &User, start: OffsetDateTime, end: OffsetDateTime) {
        let booking = Booking::new(
            BookingId::new(Uuid::new_v4()),
            item.id().clone(),
            renter.id().clone(),
            BookingPeriod::new(start, end),
            BookingStatus::Approved,
        );
        app.store.lock().unwrap().bookings.push(booking);
    }

    #[tokio::test]
    async fn commenting_requires_a_finished_rental() {
        let (app, _owner, renter, item) = seeded();
        let error = app
            .create_comment(CreateCommentDto {
                item_id: item.id().clone().into(),
                author_id: renter.id().clone().into(),
                text: "great drill".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context().to_string(), NO_FINISHED_RENTAL);
        assert!(matches!(
            error.current_context(),
            KernelError::ConditionsNotMet { .. }
        ));
    }

    #[tokio::test]
    async fn finished_rental_unlocks_commenting() {
        let (app, _owner, renter, item) = seeded();
        let now = OffsetDateTime::now_utc();
        seed_booking(&app, &item, &renter, now - Duration::days(3), now - Duration::days(2));

        let comment = app
            .create_comment(CreateCommentDto {
                item_id: item.id().clone().into(),
                author_id: renter.id().clone().into(),
                text: "great drill".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(comment.text, "great drill");
        assert_eq!(comment.author_name, "renter");

        let detail = app
            .get_item(GetItemDto {
                id: item.id().clone().into(),
            })
            .await
            .unwrap();
        assert_eq!(detail.comments.len(), 1);
    }

    #[tokio::test]
    async fn owned_listing_carries_booking_annotations() {
        let (app, owner, renter, item) = seeded();
        let now = OffsetDateTime::now_utc();
        seed_booking(&app, &item, &renter, now - Duration::hours(1), now + Duration::hours(1));
        seed_booking(&app, &item, &renter, now + Duration::days(2), now + Duration::days(3));

        let owned = app
            .find_all_owned(ListOwnedItemsDto {
                owner_id: owner.id().clone().into(),
            })
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);
        let dto = &owned[0];
        assert!(dto.current_booking.is_some());
        assert!(dto.next_booking.is_some());
    }

    #[tokio::test]
    async fn only_the_owner_may_update() {
        let (app, _owner, renter, item) = seeded();
        let error = app
            .update_item(UpdateItemDto {
                item_id: item.id().clone().into(),
                caller_id: renter.id().clone().into(),
                name: Some("hammer".to_string()),
                description: None,
                available: None,
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context().to_string(), NOT_THE_OWNER);
    }

    #[tokio::test]
    async fn blank_search_text_yields_nothing() {
        let (app, _owner, _renter, _item) = seeded();
        let found = app
            .search_items(SearchItemsDto {
                text: "  ".to_string(),
            })
            .await
            .unwrap();
        assert!(found.is_empty());

        let found = app
            .search_items(SearchItemsDto {
                text: "drill".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
