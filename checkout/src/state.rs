use anyhow::Result;
use common::{Database, Payee, PlanTable, QrEncoder};

/// Everything the handlers share. Built once at startup and never mutated.
pub struct AppState {
    pub db: Database,
    pub plans: PlanTable,
    pub payee: Payee,
    pub qr: QrEncoder,
    pub support_telegram: Option<String>,
}

impl AppState {
    pub async fn new(
        db: Database,
        plans: PlanTable,
        payee: Payee,
        qr: QrEncoder,
        support_telegram: Option<String>,
    ) -> Result<Self> {
        qr.ensure_dir().await?;
        log::info!("QR codes will be written to {}", qr.output_dir().display());

        Ok(AppState {
            db,
            plans,
            payee,
            qr,
            support_telegram,
        })
    }
}
