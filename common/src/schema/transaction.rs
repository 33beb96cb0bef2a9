use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::PaymentLink;

/// Payment status of a transaction. The only transition is `Pending -> Completed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TransactionStatus::Pending),
            "Completed" => Ok(TransactionStatus::Completed),
            other => Err(anyhow::anyhow!(
                "Unknown transaction status `{}`, expected `Pending` or `Completed`",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub transaction_id: String,
    pub name: String,
    pub mobile: String,
    pub plan: String,
    pub amount: i64,
    pub payment_url: String,
    pub qr_code_path: String,
    pub status: TransactionStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Transaction {
    pub fn new(
        link: PaymentLink,
        name: String,
        mobile: String,
        plan: String,
        amount: i64,
        qr_code_path: String,
    ) -> Self {
        Transaction {
            transaction_id: link.transaction_id,
            name,
            mobile,
            plan,
            amount,
            payment_url: link.payment_uri,
            qr_code_path,
            status: TransactionStatus::Pending,
            created_at: None, // set by DB
            updated_at: None, // set by DB
        }
    }

    /// File name of the QR image, without the directory part.
    pub fn qr_code_filename(&self) -> &str {
        std::path::Path::new(&self.qr_code_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.qr_code_path)
    }
}
