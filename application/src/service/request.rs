use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::database::{DependOnDatabaseConnection, QueryDatabaseConnection};
use kernel::interface::query::{
    DependOnItemQuery, DependOnRequestQuery, DependOnUserQuery, ItemQuery, RequestQuery, UserQuery,
};
use kernel::interface::update::{DependOnRequestModifier, RequestModifier};
use kernel::prelude::entity::{
    CreatedAt, RentalRequest, RequestDescription, RequestId, UserId,
};
use kernel::KernelError;

use crate::transfer::{CreateRequestDto, GetRequestDto, ListRequestsDto, RequestDto};

#[async_trait::async_trait]
pub trait CreateRequestService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnRequestModifier<Connection>
{
    async fn create_request(
        &self,
        dto: CreateRequestDto,
    ) -> error_stack::Result<RequestDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let requester_id = UserId::new(dto.requester_id);
        self.user_query()
            .find_by_id(&mut connection, &requester_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let request = RentalRequest::new(
            RequestId::new(Uuid::new_v4()),
            requester_id,
            RequestDescription::new(dto.description),
            CreatedAt::new(OffsetDateTime::now_utc()),
        );
        self.request_modifier()
            .create(&mut connection, &request)
            .await?;
        Ok(RequestDto::project(request, Vec::new()))
    }
}

impl<Connection: Send, T> CreateRequestService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnRequestModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait GetRequestService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnItemQuery<Connection>
    + DependOnRequestQuery<Connection>
{
    async fn get_request(
        &self,
        dto: GetRequestDto,
    ) -> error_stack::Result<RequestDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let caller_id = UserId::new(dto.caller_id);
        self.user_query()
            .find_by_id(&mut connection, &caller_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let request_id = RequestId::new(dto.request_id);
        let request = self
            .request_query()
            .find_by_id(&mut connection, &request_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("request")))?;
        let items = self
            .item_query()
            .find_all_by_request(&mut connection, &request_id)
            .await?;
        Ok(RequestDto::project(request, items))
    }

    async fn find_all_by_requester(
        &self,
        dto: ListRequestsDto,
    ) -> error_stack::Result<Vec<RequestDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let requester_id = UserId::new(dto.caller_id);
        self.user_query()
            .find_by_id(&mut connection, &requester_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let requests = self
            .request_query()
            .find_all_by_requester(&mut connection, &requester_id)
            .await?;

        let mut result = Vec::with_capacity(requests.len());
        for request in requests {
            let items = self
                .item_query()
                .find_all_by_request(&mut connection, request.id())
                .await?;
            result.push(RequestDto::project(request, items));
        }
        Ok(result)
    }

    async fn find_all_requests(&self) -> error_stack::Result<Vec<RequestDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let requests = self.request_query().find_all(&mut connection).await?;
        let mut result = Vec::with_capacity(requests.len());
        for request in requests {
            let items = self
                .item_query()
                .find_all_by_request(&mut connection, request.id())
                .await?;
            result.push(RequestDto::project(request, items));
        }
        Ok(result)
    }
}

impl<Connection: Send, T> GetRequestService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnItemQuery<Connection>
        + DependOnRequestQuery<Connection>
{
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::prelude::entity::{
        IsAvailable, Item, ItemDescription, ItemId, ItemName, RequestId, User, UserEmail, UserId,
        UserName,
    };

    use crate::testing::MockApp;
    use crate::transfer::{CreateItemDto, CreateRequestDto, GetRequestDto, ListRequestsDto};

    use super::{CreateRequestService, GetRequestService};
    use crate::service::CreateItemService;

    fn user(name: &str) -> User {
        User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new(name),
            UserEmail::new(format!("{name}@example.com")),
        )
    }

    #[tokio::test]
    async fn answered_request_lists_its_items() {
        let app = MockApp::default();
        let requester = user("requester");
        let owner = user("owner");
        {
            let mut store = app.store.lock().unwrap();
            store.users.push(requester.clone());
            store.users.push(owner.clone());
        }

        let request = app
            .create_request(CreateRequestDto {
                requester_id: requester.id().clone().into(),
                description: "need a drill for the weekend".to_string(),
            })
            .await
            .unwrap();
        assert!(request.items.is_empty());

        app.create_item(CreateItemDto {
            owner_id: owner.id().clone().into(),
            name: "drill".to_string(),
            description: "electric drill".to_string(),
            available: true,
            request_id: Some(request.id),
        })
        .await
        .unwrap();

        let fetched = app
            .get_request(GetRequestDto {
                request_id: request.id,
                caller_id: requester.id().clone().into(),
            })
            .await
            .unwrap();
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].name, "drill");

        let own = app
            .find_all_by_requester(ListRequestsDto {
                caller_id: requester.id().clone().into(),
            })
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
    }

    #[tokio::test]
    async fn unknown_request_is_a_named_not_found() {
        let app = MockApp::default();
        let caller = user("caller");
        app.store.lock().unwrap().users.push(caller.clone());

        let error = app
            .get_request(GetRequestDto {
                request_id: Uuid::new_v4(),
                caller_id: caller.id().clone().into(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context().to_string(), "request not found");
    }

    #[tokio::test]
    async fn seeded_items_do_not_leak_across_requests() {
        let app = MockApp::default();
        let requester = user("requester");
        app.store.lock().unwrap().users.push(requester.clone());

        let request = app
            .create_request(CreateRequestDto {
                requester_id: requester.id().clone().into(),
                description: "need a ladder".to_string(),
            })
            .await
            .unwrap();

        // An item answering a different request must not show up here.
        let unrelated = Item::new(
            ItemId::new(Uuid::new_v4()),
            requester.id().clone(),
            ItemName::new("ladder"),
            ItemDescription::new("tall ladder"),
            IsAvailable::new(true),
            Some(RequestId::new(Uuid::new_v4())),
        );
        app.store.lock().unwrap().items.push(unrelated);

        let fetched = app
            .get_request(GetRequestDto {
                request_id: request.id,
                caller_id: requester.id().clone().into(),
            })
            .await
            .unwrap();
        assert!(fetched.items.is_empty());
    }
}
