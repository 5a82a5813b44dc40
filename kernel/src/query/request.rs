use crate::entity::{RentalRequest, RequestId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RequestQuery<Connection: Send>: 'static + Sync + Send {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &RequestId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError>;

    /// Own requests, newest first.
    async fn find_all_by_requester(
        &self,
        con: &mut Connection,
        requester_id: &UserId,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError>;

    /// Every request, newest first.
    async fn find_all(
        &self,
        con: &mut Connection,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError>;
}

pub trait DependOnRequestQuery<Connection: Send>: 'static + Sync + Send {
    type RequestQuery: RequestQuery<Connection>;
    fn request_query(&self) -> &Self::RequestQuery;
}
