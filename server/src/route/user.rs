mod request;
mod response;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::user::request::{CreateUserRequest, Transformer, UpdateUserRequest};
use crate::route::user::response::{CreatedPresenter, Presenter};
use application::service::{
    CreateUserService, DeleteUserService, GetUserService, UpdateUserService,
};
use application::transfer::{DeleteUserDto, GetUserDto};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

pub trait UserRouter {
    fn route_user(self) -> Self;
}

impl UserRouter for Router<AppModule> {
    fn route_user(self) -> Self {
        self.route(
            "/users",
            get(|State(handler): State<AppModule>| async move {
                Controller::new(Transformer, Presenter)
                    .intake(())
                    .handle(|()| handler.pgpool().get_all_users())
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(handler): State<AppModule>, Json(req): Json<CreateUserRequest>| async move {
                    Controller::new(Transformer, CreatedPresenter)
                        .intake(req)
                        .handle(|dto| handler.pgpool().create_user(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id",
            get(
                |State(handler): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetUserDto { id })
                        .handle(|dto| handler.pgpool().get_user(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(handler): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateUserRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((id, req))
                        .handle(|dto| handler.pgpool().update_user(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(handler): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(DeleteUserDto { id })
                        .handle(|dto| handler.pgpool().delete_user(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
