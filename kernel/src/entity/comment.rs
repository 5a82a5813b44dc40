mod id;
mod text;

pub use self::{id::*, text::*};
use crate::entity::{CreatedAt, ItemId, UserId, UserName};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct Comment {
    id: CommentId,
    item_id: ItemId,
    author_id: UserId,
    author_name: UserName,
    text: CommentText,
    created_at: CreatedAt<Comment>,
}

impl Comment {
    pub fn new(
        id: CommentId,
        item_id: ItemId,
        author_id: UserId,
        author_name: UserName,
        text: CommentText,
        created_at: CreatedAt<Comment>,
    ) -> Self {
        Self {
            id,
            item_id,
            author_id,
            author_name,
            text,
            created_at,
        }
    }
}
