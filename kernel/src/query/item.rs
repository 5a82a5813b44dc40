use crate::entity::{Item, ItemId, RequestId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ItemQuery<Connection: Send>: 'static + Sync + Send {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError>;

    async fn find_all_by_owner(
        &self,
        con: &mut Connection,
        owner_id: &UserId,
    ) -> error_stack::Result<Vec<Item>, KernelError>;

    async fn find_all_by_request(
        &self,
        con: &mut Connection,
        request_id: &RequestId,
    ) -> error_stack::Result<Vec<Item>, KernelError>;

    /// Text search over name and description of available items.
    async fn search(
        &self,
        con: &mut Connection,
        text: &str,
    ) -> error_stack::Result<Vec<Item>, KernelError>;
}

pub trait DependOnItemQuery<Connection: Send>: 'static + Sync + Send {
    type ItemQuery: ItemQuery<Connection>;
    fn item_query(&self) -> &Self::ItemQuery;
}
