use crate::entity::{Comment, ItemId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CommentQuery<Connection: Send>: 'static + Sync + Send {
    async fn find_all_by_item(
        &self,
        con: &mut Connection,
        item_id: &ItemId,
    ) -> error_stack::Result<Vec<Comment>, KernelError>;
}

pub trait DependOnCommentQuery<Connection: Send>: 'static + Sync + Send {
    type CommentQuery: CommentQuery<Connection>;
    fn comment_query(&self) -> &Self::CommentQuery;
}
