use crate::entity::RentalRequest;
use crate::KernelError;

#[async_trait::async_trait]
pub trait RequestModifier<Connection: Send>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        request: &RentalRequest,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnRequestModifier<Connection: Send>: 'static + Sync + Send {
    type RequestModifier: RequestModifier<Connection>;
    fn request_modifier(&self) -> &Self::RequestModifier;
}
