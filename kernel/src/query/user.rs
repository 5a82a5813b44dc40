use crate::entity::{User, UserEmail, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait UserQuery<Connection: Send>: 'static + Sync + Send {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError>;

    async fn find_by_email(
        &self,
        con: &mut Connection,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError>;

    async fn find_all(&self, con: &mut Connection) -> error_stack::Result<Vec<User>, KernelError>;
}

pub trait DependOnUserQuery<Connection: Send>: 'static + Sync + Send {
    type UserQuery: UserQuery<Connection>;
    fn user_query(&self) -> &Self::UserQuery;
}
