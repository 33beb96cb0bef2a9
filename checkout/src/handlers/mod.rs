mod payments;
mod plans;
mod transactions;

use actix_web::web;

use crate::error::ApiError;

pub use payments::*;
pub use plans::*;
pub use transactions::*;

/// Registers every route of the checkout service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(index)
        .service(submit)
        .service(payment_confirmation)
        .service(confirm_payment)
        .service(get_transactions);
}

/// Malformed JSON bodies are answered like any other validation failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid JSON body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query string: {}", err)).into()
    })
}
