use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DependOnDatabaseConnection, QueryDatabaseConnection};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{User, UserEmail, UserId, UserName};
use kernel::KernelError;

use crate::transfer::{CreateUserDto, DeleteUserDto, GetUserDto, UpdateUserDto, UserDto};

static EMAIL_TAKEN: &str = "email is already in use";

#[async_trait::async_trait]
pub trait GetUserService<Connection: Send>:
    'static + Sync + Send + DependOnDatabaseConnection<Connection> + DependOnUserQuery<Connection>
{
    async fn get_user(&self, dto: GetUserDto) -> error_stack::Result<UserDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = UserId::new(dto.id);
        let user = self
            .user_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;
        Ok(UserDto::from(user))
    }

    async fn get_all_users(&self) -> error_stack::Result<Vec<UserDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let users = self.user_query().find_all(&mut connection).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }
}

impl<Connection: Send, T> GetUserService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnUserQuery<Connection>
{
}

#[async_trait::async_trait]
pub trait CreateUserService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnUserModifier<Connection>
{
    async fn create_user(&self, dto: CreateUserDto) -> error_stack::Result<UserDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let email = UserEmail::new(dto.email);
        if self
            .user_query()
            .find_by_email(&mut connection, &email)
            .await?
            .is_some()
        {
            return Err(Report::new(KernelError::rejected(EMAIL_TAKEN)));
        }

        let user = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new(dto.name),
            email,
        );
        self.user_modifier().create(&mut connection, &user).await?;
        Ok(UserDto::from(user))
    }
}

impl<Connection: Send, T> CreateUserService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnUserModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait UpdateUserService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnUserModifier<Connection>
{
    async fn update_user(&self, dto: UpdateUserDto) -> error_stack::Result<UserDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = UserId::new(dto.id);
        let user = self
            .user_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;

        let mut destruct = user.into_destruct();
        if let Some(name) = dto.name {
            destruct.name = UserName::new(name);
        }
        if let Some(email) = dto.email {
            let email = UserEmail::new(email);
            let holder = self
                .user_query()
                .find_by_email(&mut connection, &email)
                .await?;
            if holder.map(|other| other.id() != &id).unwrap_or(false) {
                return Err(Report::new(KernelError::rejected(EMAIL_TAKEN)));
            }
            destruct.email = email;
        }
        let user = User::new(destruct.id, destruct.name, destruct.email);

        self.user_modifier().update(&mut connection, &user).await?;
        Ok(UserDto::from(user))
    }
}

impl<Connection: Send, T> UpdateUserService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnUserModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait DeleteUserService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnUserModifier<Connection>
{
    async fn delete_user(&self, dto: DeleteUserDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = UserId::new(dto.id);
        self.user_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("user")))?;
        self.user_modifier().delete(&mut connection, &id).await?;
        Ok(())
    }
}

impl<Connection: Send, T> DeleteUserService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnUserModifier<Connection>
{
}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use crate::testing::MockApp;
    use crate::transfer::{CreateUserDto, GetUserDto, UpdateUserDto};

    use super::{CreateUserService, GetUserService, UpdateUserService, EMAIL_TAKEN};

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let app = MockApp::default();
        app.create_user(CreateUserDto {
            name: "first".to_string(),
            email: "taken@example.com".to_string(),
        })
        .await
        .unwrap();

        let error = app
            .create_user(CreateUserDto {
                name: "second".to_string(),
                email: "taken@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context().to_string(), EMAIL_TAKEN);
        assert!(matches!(
            error.current_context(),
            KernelError::ConditionsNotMet { .. }
        ));
    }

    #[tokio::test]
    async fn update_may_keep_the_own_email() {
        let app = MockApp::default();
        let created = app
            .create_user(CreateUserDto {
                name: "first".to_string(),
                email: "first@example.com".to_string(),
            })
            .await
            .unwrap();

        let updated = app
            .update_user(UpdateUserDto {
                id: created.id,
                name: Some("renamed".to_string()),
                email: Some("first@example.com".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");

        let fetched = app.get_user(GetUserDto { id: created.id }).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn unknown_user_is_a_named_not_found() {
        let app = MockApp::default();
        let error = app
            .get_user(GetUserDto {
                id: uuid::Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context().to_string(), "user not found");
    }
}
