//! Route table for `/api/v1`

use actix_web::web;

use super::entries::{
    auto_process, delete_disbursement, list_collections, list_disbursements,
    process_collections, process_disbursements, store_collections, store_disbursements,
    update_disbursement, validate_disbursements,
};
use super::instruments::{
    add_balance, add_collection, add_disbursement, create_instrument, delete_instrument,
    get_instrument, list_instruments, renew_instrument, update_collection, update_instrument,
    withdraw_instrument,
};
use super::reports::{daily_report, daily_report_csv};
use super::users::{create_user, delete_user, list_users, update_user};

/// Instrument routes `/instruments/{kind}`
///
/// - GET/POST /instruments/{kind}
/// - GET/PUT/DELETE /instruments/{kind}/{id}
/// - POST (add) and PUT (set) /instruments/{kind}/{id}/collection
/// - POST (add) and PUT (set) /instruments/{kind}/{id}/disbursement
/// - POST /instruments/{kind}/{id}/renew, /withdraw, /balance
pub fn instruments_routes() -> actix_web::Scope {
    web::scope("/instruments/{kind}")
        .route("", web::get().to(list_instruments))
        .route("", web::post().to(create_instrument))
        .route("/{id}/collection", web::post().to(add_collection))
        .route("/{id}/collection", web::put().to(update_collection))
        .route("/{id}/disbursement", web::post().to(add_disbursement))
        .route(
            "/{id}/disbursement",
            web::put().to(super::instruments::update_disbursement),
        )
        .route("/{id}/renew", web::post().to(renew_instrument))
        .route("/{id}/withdraw", web::post().to(withdraw_instrument))
        .route("/{id}/balance", web::post().to(add_balance))
        .route("/{id}", web::get().to(get_instrument))
        .route("/{id}", web::put().to(update_instrument))
        .route("/{id}", web::delete().to(delete_instrument))
}

/// Collection routes `/collections`
pub fn collections_routes() -> actix_web::Scope {
    web::scope("/collections")
        .route("", web::get().to(list_collections))
        .route("", web::post().to(store_collections))
        .route("/process", web::post().to(process_collections))
}

/// Disbursement routes `/disbursements`
///
/// `/validate` and `/process` are registered before `/{id}`.
pub fn disbursements_routes() -> actix_web::Scope {
    web::scope("/disbursements")
        .route("", web::get().to(list_disbursements))
        .route("", web::post().to(store_disbursements))
        .route("/validate", web::post().to(validate_disbursements))
        .route("/process", web::post().to(process_disbursements))
        .route("/{id}", web::put().to(update_disbursement))
        .route("/{id}", web::delete().to(delete_disbursement))
}

pub fn entries_routes() -> actix_web::Scope {
    web::scope("/entries").route("/auto-process", web::post().to(auto_process))
}

pub fn reports_routes() -> actix_web::Scope {
    web::scope("/reports")
        .route("/daily.csv", web::get().to(daily_report_csv))
        .route("/daily", web::get().to(daily_report))
}

pub fn users_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("", web::get().to(list_users))
        .route("", web::post().to(create_user))
        .route("/{id}", web::put().to(update_user))
        .route("/{id}", web::delete().to(delete_user))
}

/// All `/v1` routes
pub fn api_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(instruments_routes())
        .service(collections_routes())
        .service(disbursements_routes())
        .service(entries_routes())
        .service(reports_routes())
        .service(users_routes())
}
