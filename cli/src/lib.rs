mod args;

pub use args::{Args, Commands, ConfirmPaymentArgs, ListTransactionsArgs};
use clap::Parser;
use common::{DEFAULT_DATABASE_URL, Database, PlanTable, TransactionStatus};

/// Runs the CLI command parser and executes the selected command.
/// Returns true if a CLI command was handled, false otherwise.
pub async fn run_cli() -> bool {
    let args = Args::parse();
    match &args.command {
        Some(Commands::ListPlans) => {
            if let Err(e) = list_plans().await {
                eprintln!("Failed to list plans: {e:#}");
            }
            true
        }
        Some(Commands::ListTransactions(list_args)) => {
            if let Err(e) = list_transactions(list_args.status.as_deref()).await {
                eprintln!("Failed to list transactions: {e:#}");
            }
            true
        }
        Some(Commands::ConfirmPayment(confirm_args)) => {
            match confirm_payment(&confirm_args.transaction_id).await {
                Ok(true) => println!(
                    "Payment for transaction {} marked as completed.",
                    confirm_args.transaction_id
                ),
                Ok(false) => eprintln!(
                    "Transaction {} not found or already completed.",
                    confirm_args.transaction_id
                ),
                Err(e) => eprintln!("Failed to confirm payment: {e:#}"),
            }
            true
        }
        None => false,
    }
}

/// Helper to read DATABASE_URL, falling back to the server's default.
fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

async fn list_plans() -> anyhow::Result<()> {
    let plans = match std::env::var("PLANS_YAML") {
        Ok(path) => PlanTable::from_yaml_file(&path).await?,
        Err(_) => PlanTable::default(),
    };
    for plan in plans.iter() {
        println!("{:<12} {:>6} INR", plan.name, plan.price);
    }
    Ok(())
}

async fn list_transactions(status: Option<&str>) -> anyhow::Result<()> {
    let db = Database::new(&database_url()).await?;
    let transactions = match status {
        Some(status) => {
            let status: TransactionStatus = status.parse()?;
            db.get_transactions_by_status(status).await?
        }
        None => db.get_all_transactions().await?,
    };
    for transaction in &transactions {
        println!("{}", serde_json::to_string(transaction)?);
    }
    Ok(())
}

/// Returns whether the transaction changed from Pending to Completed.
async fn confirm_payment(transaction_id: &str) -> anyhow::Result<bool> {
    let db = Database::new(&database_url()).await?;
    let modified = db.mark_completed(transaction_id).await?;
    Ok(modified > 0)
}
