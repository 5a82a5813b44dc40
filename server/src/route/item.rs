mod request;
mod response;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::CallerId;
use crate::handler::AppModule;
use crate::route::item::request::{
    CreateCommentRequest, CreateItemRequest, SearchQuery, Transformer, UpdateItemRequest,
};
use crate::route::item::response::{CommentPresenter, Presenter};
use application::service::{
    CreateCommentService, CreateItemService, GetItemService, ListOwnedItemsService,
    SearchItemsService, UpdateItemService,
};
use application::transfer::GetItemDto;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait ItemRouter {
    fn route_item(self) -> Self;
}

impl ItemRouter for Router<AppModule> {
    fn route_item(self) -> Self {
        self.route(
            "/items",
            get(
                |State(handler): State<AppModule>, caller: CallerId| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(caller)
                        .handle(|dto| handler.pgpool().find_all_owned(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Json(req): Json<CreateItemRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, req))
                        .handle(|dto| handler.pgpool().create_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/items/search",
            get(
                |State(handler): State<AppModule>, Query(query): Query<SearchQuery>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(query)
                        .handle(|dto| handler.pgpool().search_items(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/items/:id",
            get(
                |State(handler): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetItemDto { id })
                        .handle(|dto| handler.pgpool().get_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateItemRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, id, req))
                        .handle(|dto| handler.pgpool().update_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/items/:id/comment",
            post(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Path(id): Path<Uuid>,
                 Json(req): Json<CreateCommentRequest>| async move {
                    Controller::new(Transformer, CommentPresenter)
                        .intake((caller, id, req))
                        .handle(|dto| handler.pgpool().create_comment(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
