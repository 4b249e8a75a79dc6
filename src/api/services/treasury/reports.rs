//! Daily report endpoints

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;

use crate::errors::Result;
use crate::services::{DailyReport, ReportService};
use crate::utils::parse_iso_date;

use super::error_code::ErrorScope;
use super::helpers::{api_result, error_from_ledger};
use super::types::ReportQuery;

const SCOPE: ErrorScope = ErrorScope::Reports;

async fn build_report(query: &ReportQuery, service: &ReportService) -> Result<DailyReport> {
    let date = query
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(parse_iso_date)
        .transpose()?;
    service.daily_report(date).await
}

pub async fn daily_report(
    query: web::Query<ReportQuery>,
    service: web::Data<Arc<ReportService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(build_report(&query, &service).await, SCOPE))
}

pub async fn daily_report_csv(
    query: web::Query<ReportQuery>,
    service: web::Data<Arc<ReportService>>,
) -> ActixResult<HttpResponse> {
    let rendered = match build_report(&query, &service).await {
        Ok(report) => report.to_csv().map(|csv| (report.filename(), csv)),
        Err(e) => Err(e),
    };

    Ok(match rendered {
        Ok((filename, csv)) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .body(csv),
        Err(e) => error_from_ledger(&e, SCOPE),
    })
}
