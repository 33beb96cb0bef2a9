use actix_web::{HttpResponse, get, http::header::ContentType, post, web};
use common::{PaymentLink, PlanTable, Transaction, TransactionStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::ApiError, pages, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mobile: Option<String>,
    #[serde(default)]
    plan: Option<String>,
    /// Accepted as a JSON number or a numeric string.
    #[serde(default)]
    amount: Option<Value>,
    /// Ignored: payments always go to the configured payee.
    #[serde(default)]
    upi_id: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
struct Submission {
    name: String,
    mobile: String,
    plan: String,
    amount: i64,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing_fields() -> ApiError {
    ApiError::Validation("All fields are required".to_string())
}

/// Empty values and zero count as missing; anything else must be a positive
/// whole number.
fn parse_amount(value: Option<Value>) -> Result<i64, ApiError> {
    let amount = match value {
        None | Some(Value::Null) => return Err(missing_fields()),
        Some(Value::String(text)) if text.trim().is_empty() => return Err(missing_fields()),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match amount {
        Some(0) => Err(missing_fields()),
        Some(amount) if amount > 0 => Ok(amount),
        _ => Err(ApiError::Validation(
            "Amount must be a positive whole number".to_string(),
        )),
    }
}

impl SubmitRequest {
    fn validate(self, plans: &PlanTable) -> Result<Submission, ApiError> {
        if let Some(upi_id) = &self.upi_id {
            log::debug!("Ignoring client supplied upi_id `{}`", upi_id);
        }

        let name = required(self.name).ok_or_else(missing_fields)?;
        let mobile = required(self.mobile).ok_or_else(missing_fields)?;
        let plan = required(self.plan).ok_or_else(missing_fields)?;
        let amount = parse_amount(self.amount)?;

        let price = plans
            .price_of(&plan)
            .ok_or_else(|| ApiError::Validation(format!("Unknown plan `{}`", plan)))?;
        if amount != price {
            return Err(ApiError::Validation(format!(
                "Amount {} does not match the price of plan `{}` ({})",
                amount, plan, price
            )));
        }

        Ok(Submission {
            name,
            mobile,
            plan,
            amount,
        })
    }
}

/// Creates a pending transaction with its UPI link and QR code.
#[post("/submit")]
pub async fn submit(
    request: web::Json<SubmitRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let Submission {
        name,
        mobile,
        plan,
        amount,
    } = request.into_inner().validate(&app_state.plans)?;

    let link = PaymentLink::generate(&app_state.payee, &plan, amount);
    let qr_code_path = app_state
        .qr
        .encode(&link.payment_uri, &link.transaction_id)
        .await?;

    let transaction = Transaction::new(
        link,
        name,
        mobile,
        plan,
        amount,
        qr_code_path.to_string_lossy().into_owned(),
    );
    app_state.db.insert_transaction(&transaction).await?;

    log::info!(
        "Transaction {} created for plan `{}` ({})",
        transaction.transaction_id,
        transaction.plan,
        transaction.amount
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Payment data saved successfully",
        transaction_id: Some(transaction.transaction_id),
    }))
}

#[get("/payment_confirmation/{transaction_id}")]
pub async fn payment_confirmation(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let transaction_id = path.into_inner();

    let transaction = app_state
        .db
        .get_transaction(&transaction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found.".to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::payment_confirmation_page(
            &transaction,
            app_state.support_telegram.as_deref(),
        )))
}

/// Moves a transaction from Pending to Completed.
///
/// Only a real status change counts as success. When nothing changed the
/// record is read back to tell an unknown id from a repeated confirmation;
/// both answer 404.
#[post("/confirm_payment/{transaction_id}")]
pub async fn confirm_payment(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let transaction_id = path.into_inner();

    if app_state.db.mark_completed(&transaction_id).await? > 0 {
        log::info!("Transaction {} completed", transaction_id);
        return Ok(HttpResponse::Ok().json(MessageResponse {
            message: "Payment successful!",
            transaction_id: Some(transaction_id),
        }));
    }

    let message = match app_state.db.get_transaction(&transaction_id).await? {
        None => "Transaction not found.",
        Some(tx) if tx.status == TransactionStatus::Completed => "Transaction already completed.",
        Some(_) => "Transaction not found or already completed.",
    };
    log::warn!("Confirmation of {} rejected: {}", transaction_id, message);

    Ok(HttpResponse::NotFound().json(MessageResponse {
        message,
        transaction_id: None,
    }))
}
