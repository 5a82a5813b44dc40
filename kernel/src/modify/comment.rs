use crate::entity::Comment;
use crate::KernelError;

#[async_trait::async_trait]
pub trait CommentModifier<Connection: Send>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        comment: &Comment,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnCommentModifier<Connection: Send>: 'static + Sync + Send {
    type CommentModifier: CommentModifier<Connection>;
    fn comment_modifier(&self) -> &Self::CommentModifier;
}
