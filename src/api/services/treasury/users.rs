//! User management endpoints

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;

use crate::services::UserService;

use super::error_code::ErrorScope;
use super::helpers::{api_created, api_result};
use super::types::{CreateUserPayload, UpdateUserPayload};

const SCOPE: ErrorScope = ErrorScope::Users;

type Service = web::Data<Arc<UserService>>;

pub async fn list_users(service: Service) -> ActixResult<impl Responder> {
    Ok(api_result(service.list().await, SCOPE))
}

pub async fn create_user(
    payload: web::Json<CreateUserPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    Ok(api_created(
        service.create(payload.into_inner().into()).await,
        SCOPE,
    ))
}

pub async fn update_user(
    path: web::Path<i64>,
    payload: web::Json<UpdateUserPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service
            .update(path.into_inner(), payload.into_inner().into())
            .await,
        SCOPE,
    ))
}

pub async fn delete_user(path: web::Path<i64>, service: Service) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let result = service
        .delete(id)
        .await
        .map(|()| serde_json::json!({ "deleted": id }));
    Ok(api_result(result, SCOPE))
}
