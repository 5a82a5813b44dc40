use kernel::prelude::entity::{DestructUser, User};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser { id, name, email } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

pub struct GetUserDto {
    pub id: Uuid,
}

pub struct CreateUserDto {
    pub name: String,
    pub email: String,
}

pub struct UpdateUserDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct DeleteUserDto {
    pub id: Uuid,
}
