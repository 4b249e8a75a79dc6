//! Collection and disbursement endpoints

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::info;

use crate::services::EntryService;

use super::error_code::ErrorScope;
use super::helpers::{api_created, api_result};
use super::types::{
    EntriesQuery, ProcessIdsPayload, ProcessedResponse, StoreCollectionsPayload,
    StoreDisbursementsPayload, UpdateDisbursementPayload, ValidateDisbursementsPayload,
};

const SCOPE: ErrorScope = ErrorScope::Entries;

type Service = web::Data<Arc<EntryService>>;

pub async fn list_collections(
    query: web::Query<EntriesQuery>,
    service: Service,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service.list_collections(query.instrument_id).await,
        SCOPE,
    ))
}

pub async fn store_collections(
    payload: web::Json<StoreCollectionsPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let body = payload.into_inner();
    let items = body.collections.into_iter().map(Into::into).collect();
    Ok(api_created(
        service.store_collections(body.instrument_id, items).await,
        SCOPE,
    ))
}

pub async fn process_collections(
    payload: web::Json<ProcessIdsPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let result = service
        .process_collections(&payload.ids)
        .await
        .map(|processed| ProcessedResponse { processed });
    Ok(api_result(result, SCOPE))
}

pub async fn list_disbursements(
    query: web::Query<EntriesQuery>,
    service: Service,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service.list_disbursements(query.instrument_id).await,
        SCOPE,
    ))
}

pub async fn validate_disbursements(
    payload: web::Json<ValidateDisbursementsPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let items: Vec<_> = payload
        .into_inner()
        .disbursements
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(api_result(service.validate_disbursements(&items).await, SCOPE))
}

pub async fn store_disbursements(
    payload: web::Json<StoreDisbursementsPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let body = payload.into_inner();
    let items = body.disbursements.into_iter().map(Into::into).collect();
    Ok(api_created(
        service.store_disbursements(body.instrument_id, items).await,
        SCOPE,
    ))
}

pub async fn update_disbursement(
    path: web::Path<i64>,
    payload: web::Json<UpdateDisbursementPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service
            .update_disbursement(path.into_inner(), payload.into_inner().into())
            .await,
        SCOPE,
    ))
}

pub async fn delete_disbursement(
    path: web::Path<i64>,
    service: Service,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let result = service
        .delete_disbursement(id)
        .await
        .map(|()| serde_json::json!({ "deleted": id }));
    Ok(api_result(result, SCOPE))
}

pub async fn process_disbursements(
    payload: web::Json<ProcessIdsPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let result = service
        .process_disbursements(&payload.ids)
        .await
        .map(|processed| ProcessedResponse { processed });
    Ok(api_result(result, SCOPE))
}

pub async fn auto_process(service: Service) -> ActixResult<impl Responder> {
    info!("API: manual auto-process requested");
    Ok(api_result(service.auto_process_pending().await, SCOPE))
}
