use anyhow::Context;
use common::{DEFAULT_DATABASE_URL, Database, Payee, PlanTable, QrEncoder};

use crate::state::AppState;

pub struct AppConfig {
    pub database_url: String,
    pub qr_code_dir: String,
    pub host: String,
    pub port: u16,
    pub payee_upi_id: String,
    pub payee_name: String,
    pub support_telegram: Option<String>,
    pub plans_yaml: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let qr_code_dir =
            std::env::var("QR_CODE_DIR").unwrap_or_else(|_| "static/qrcodes".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got `{}`", port))?,
            Err(_) => 8000,
        };

        let payee_upi_id = std::env::var("PAYEE_UPI_ID").context("PAYEE_UPI_ID must be set")?;

        let payee_name = std::env::var("PAYEE_NAME").context("PAYEE_NAME must be set")?;

        let support_telegram = std::env::var("SUPPORT_TELEGRAM")
            .ok()
            .map(|handle| handle.trim_start_matches('@').to_string())
            .filter(|handle| !handle.is_empty());

        let plans_yaml = std::env::var("PLANS_YAML").ok();

        Ok(Self {
            database_url,
            qr_code_dir,
            host,
            port,
            payee_upi_id,
            payee_name,
            support_telegram,
            plans_yaml,
        })
    }

    pub fn payee(&self) -> Payee {
        let note = match &self.support_telegram {
            Some(handle) => format!("Complete payment and contact @{} on Telegram", handle),
            None => "Complete payment to activate your subscription".to_string(),
        };
        Payee {
            upi_id: self.payee_upi_id.clone(),
            name: self.payee_name.clone(),
            note,
        }
    }

    pub async fn create_app_state(&self) -> anyhow::Result<AppState> {
        let plans = match &self.plans_yaml {
            Some(path) => PlanTable::from_yaml_file(path)
                .await
                .with_context(|| format!("Failed to load plans from `{}`", path))?,
            None => PlanTable::default(),
        };

        let db = Database::new(&self.database_url).await?;
        log::info!("Database initialized successfully!");

        AppState::new(
            db,
            plans,
            self.payee(),
            QrEncoder::new(&self.qr_code_dir),
            self.support_telegram.clone(),
        )
        .await
        .context("Failed to initialize AppState")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(support_telegram: Option<&str>) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            qr_code_dir: "static/qrcodes".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            payee_upi_id: "shop@oksbi".to_string(),
            payee_name: "Shop".to_string(),
            support_telegram: support_telegram.map(str::to_string),
            plans_yaml: None,
        }
    }

    #[test]
    fn payee_note_mentions_support_handle() {
        let payee = config(Some("ShopSupport")).payee();
        assert_eq!(payee.upi_id, "shop@oksbi");
        assert_eq!(
            payee.note,
            "Complete payment and contact @ShopSupport on Telegram"
        );
    }

    #[test]
    fn payee_note_without_support_handle() {
        let payee = config(None).payee();
        assert_eq!(payee.note, "Complete payment to activate your subscription");
    }
}
