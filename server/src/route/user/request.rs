use crate::controller::Intake;
use application::transfer::{CreateUserDto, DeleteUserDto, GetUserDto, UpdateUserDto};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    name: Option<String>,
    email: Option<String>,
}

pub struct Transformer;

impl Intake<CreateUserRequest> for Transformer {
    type To = CreateUserDto;
    fn emit(&self, input: CreateUserRequest) -> Self::To {
        CreateUserDto {
            name: input.name,
            email: input.email,
        }
    }
}

impl Intake<(Uuid, UpdateUserRequest)> for Transformer {
    type To = UpdateUserDto;
    fn emit(&self, (id, req): (Uuid, UpdateUserRequest)) -> Self::To {
        UpdateUserDto {
            id,
            name: req.name,
            email: req.email,
        }
    }
}

impl Intake<GetUserDto> for Transformer {
    type To = GetUserDto;
    fn emit(&self, input: GetUserDto) -> Self::To {
        input
    }
}

impl Intake<DeleteUserDto> for Transformer {
    type To = DeleteUserDto;
    fn emit(&self, input: DeleteUserDto) -> Self::To {
        input
    }
}

impl Intake<()> for Transformer {
    type To = ();
    fn emit(&self, input: ()) -> Self::To {
        input
    }
}
