//! Instrument endpoints, one set of routes for every kind

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::errors::Result;
use crate::services::InstrumentService;
use crate::storage::InstrumentKind;

use super::error_code::ErrorScope;
use super::helpers::{api_created, api_result, error_from_ledger, success_response};
use super::types::{
    AmountDatePayload, AmountExplanationPayload, InstrumentPayload, RenewPayload,
    SetAmountPayload,
};

const SCOPE: ErrorScope = ErrorScope::Instruments;

type Service = web::Data<Arc<InstrumentService>>;

fn parse_kind(slug: &str) -> Result<InstrumentKind> {
    InstrumentKind::from_slug(slug)
}

/// Resolve the kind segment or answer with the error response
macro_rules! kind_or_return {
    ($slug:expr) => {
        match parse_kind($slug) {
            Ok(kind) => kind,
            Err(e) => return Ok(error_from_ledger(&e, SCOPE)),
        }
    };
}

pub async fn list_instruments(
    path: web::Path<String>,
    service: Service,
) -> ActixResult<impl Responder> {
    let kind = kind_or_return!(&path);
    trace!("API: list {}", kind);
    Ok(api_result(service.list(kind).await, SCOPE))
}

pub async fn get_instrument(
    path: web::Path<(String, i64)>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    Ok(api_result(service.get(kind, id).await, SCOPE))
}

pub async fn create_instrument(
    path: web::Path<String>,
    payload: web::Json<InstrumentPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let kind = kind_or_return!(&path);
    let result = service.create(kind, payload.into_inner().into()).await;
    if let Ok(created) = &result {
        info!("API: {} #{} created", kind, created.id);
    }
    Ok(api_created(result, SCOPE))
}

pub async fn update_instrument(
    path: web::Path<(String, i64)>,
    payload: web::Json<InstrumentPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    Ok(api_result(
        service.update(kind, id, payload.into_inner().into()).await,
        SCOPE,
    ))
}

pub async fn delete_instrument(
    path: web::Path<(String, i64)>,
    service: Service,
) -> ActixResult<HttpResponse> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    Ok(match service.delete(kind, id).await {
        Ok(()) => success_response(serde_json::json!({ "deleted": id })),
        Err(e) => error_from_ledger(&e, SCOPE),
    })
}

pub async fn add_collection(
    path: web::Path<(String, i64)>,
    payload: web::Json<AmountDatePayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    let body = payload.into_inner();
    Ok(api_result(
        service
            .add_collection(kind, id, body.amount, &body.date)
            .await,
        SCOPE,
    ))
}

pub async fn update_collection(
    path: web::Path<(String, i64)>,
    payload: web::Json<SetAmountPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    let body = payload.into_inner();
    Ok(api_result(
        service
            .update_collection(kind, id, body.amount, body.date.as_deref())
            .await,
        SCOPE,
    ))
}

pub async fn add_disbursement(
    path: web::Path<(String, i64)>,
    payload: web::Json<AmountDatePayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    let body = payload.into_inner();
    Ok(api_result(
        service
            .add_disbursement(kind, id, body.amount, &body.date)
            .await,
        SCOPE,
    ))
}

pub async fn update_disbursement(
    path: web::Path<(String, i64)>,
    payload: web::Json<SetAmountPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    let body = payload.into_inner();
    Ok(api_result(
        service
            .update_disbursement(kind, id, body.amount, body.date.as_deref())
            .await,
        SCOPE,
    ))
}

pub async fn renew_instrument(
    path: web::Path<(String, i64)>,
    payload: web::Json<RenewPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    let body = payload.into_inner();
    Ok(api_result(
        service
            .renew(kind, id, &body.new_maturity_date, &body.explanation)
            .await,
        SCOPE,
    ))
}

pub async fn withdraw_instrument(
    path: web::Path<(String, i64)>,
    payload: web::Json<AmountExplanationPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    let body = payload.into_inner();
    Ok(api_result(
        service
            .withdraw(kind, id, body.amount, &body.explanation)
            .await,
        SCOPE,
    ))
}

pub async fn add_balance(
    path: web::Path<(String, i64)>,
    payload: web::Json<AmountExplanationPayload>,
    service: Service,
) -> ActixResult<impl Responder> {
    let (slug, id) = path.into_inner();
    let kind = kind_or_return!(&slug);
    let body = payload.into_inner();
    Ok(api_result(
        service
            .add_balance(kind, id, body.amount, &body.explanation)
            .await,
        SCOPE,
    ))
}
