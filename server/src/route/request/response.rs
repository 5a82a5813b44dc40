use crate::controller::Exhaust;
use application::transfer::{ItemShortDto, RequestDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AnsweringItemResponse {
    id: Uuid,
    name: String,
    owner_id: Uuid,
}

impl From<ItemShortDto> for AnsweringItemResponse {
    fn from(dto: ItemShortDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            owner_id: dto.owner_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestResponse {
    id: Uuid,
    description: String,
    #[serde(with = "time::serde::rfc3339")]
    created: OffsetDateTime,
    items: Vec<AnsweringItemResponse>,
}

impl From<RequestDto> for RequestResponse {
    fn from(dto: RequestDto) -> Self {
        Self {
            id: dto.id,
            description: dto.description,
            created: dto.created,
            items: dto
                .items
                .into_iter()
                .map(AnsweringItemResponse::from)
                .collect(),
        }
    }
}

impl IntoResponse for RequestResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<RequestDto> for Presenter {
    type To = RequestResponse;
    fn emit(&self, input: RequestDto) -> Self::To {
        RequestResponse::from(input)
    }
}

impl Exhaust<Vec<RequestDto>> for Presenter {
    type To = axum::Json<Vec<RequestResponse>>;
    fn emit(&self, input: Vec<RequestDto>) -> Self::To {
        axum::Json::from(
            input
                .into_iter()
                .map(RequestResponse::from)
                .collect::<Vec<_>>(),
        )
    }
}
