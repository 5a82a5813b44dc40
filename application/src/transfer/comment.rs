use kernel::prelude::entity::{Comment, DestructComment};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct CommentDto {
    pub id: Uuid,
    pub text: String,
    pub author_name: String,
    pub created: OffsetDateTime,
}

impl From<Comment> for CommentDto {
    fn from(value: Comment) -> Self {
        let DestructComment {
            id,
            author_name,
            text,
            created_at,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            text: text.into(),
            author_name: author_name.into(),
            created: created_at.into(),
        }
    }
}

pub struct CreateCommentDto {
    pub item_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
}
