use actix_web::{HttpResponse, get, web};
use common::TransactionStatus;
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
struct TransactionQuery {
    #[serde(default)]
    status: Option<String>,
}

/// Lists stored transactions, optionally filtered by status. Admin/debug view.
#[get("/transactions")]
pub async fn get_transactions(
    query: web::Query<TransactionQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let transactions = match query.status.as_deref() {
        Some(status) => {
            let status: TransactionStatus = status.parse().map_err(|_| {
                ApiError::Validation(
                    "Transaction status must be either 'Pending' or 'Completed'.".to_string(),
                )
            })?;
            app_state.db.get_transactions_by_status(status).await?
        }
        None => app_state.db.get_all_transactions().await?,
    };

    Ok(HttpResponse::Ok().json(transactions))
}
