use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CURRENCY: &str = "INR";

/// Characters escaped in free-text UPI query values. `@` and `.` stay literal
/// so the payee address remains readable to payment apps.
const UPI_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?');

/// The account that receives every payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payee {
    /// UPI virtual payment address, e.g. `shop@oksbi`.
    pub upi_id: String,
    pub name: String,
    /// Fixed transaction note shown by the payment app.
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLink {
    pub transaction_id: String,
    pub payment_uri: String,
}

impl PaymentLink {
    /// Creates a fresh transaction id and the UPI URI that pays `amount` for `plan`.
    pub fn generate(payee: &Payee, plan: &str, amount: i64) -> Self {
        let transaction_id = Uuid::new_v4().to_string();
        let payment_uri = payment_uri(payee, amount, &transaction_id);
        log::debug!(
            "Generated payment link for plan `{}` ({} {}): {}",
            plan,
            amount,
            CURRENCY,
            transaction_id
        );
        PaymentLink {
            transaction_id,
            payment_uri,
        }
    }
}

pub fn payment_uri(payee: &Payee, amount: i64, transaction_id: &str) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}&cu={}&tid={}&tn={}",
        utf8_percent_encode(&payee.upi_id, UPI_VALUE),
        utf8_percent_encode(&payee.name, UPI_VALUE),
        amount,
        CURRENCY,
        utf8_percent_encode(transaction_id, UPI_VALUE),
        utf8_percent_encode(&payee.note, UPI_VALUE),
    )
}
