use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Checkout CLI - inspect plans and manage payment transactions"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the subscription plans and their prices
    ///
    /// Reads PLANS_YAML when it is set, otherwise prints the built-in table.
    ListPlans,

    /// Print stored transactions as JSON lines
    ListTransactions(ListTransactionsArgs),

    /// Mark a pending transaction as completed
    ///
    /// Same effect as POST /confirm_payment/{transaction_id}.
    ConfirmPayment(ConfirmPaymentArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ListTransactionsArgs {
    /// Only show transactions with this status
    #[arg(short, long, help = "Filter by status: Pending or Completed")]
    pub status: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ConfirmPaymentArgs {
    /// Transaction id returned by /submit
    #[arg(short, long, help = "Transaction id to confirm")]
    pub transaction_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let args = Args::try_parse_from(["checkout"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn parses_confirm_payment() {
        let args =
            Args::try_parse_from(["checkout", "confirm-payment", "--transaction-id", "abc"])
                .unwrap();
        match args.command {
            Some(Commands::ConfirmPayment(confirm)) => assert_eq!(confirm.transaction_id, "abc"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_list_transactions_with_status() {
        let args =
            Args::try_parse_from(["checkout", "list-transactions", "-s", "Completed"]).unwrap();
        match args.command {
            Some(Commands::ListTransactions(list)) => {
                assert_eq!(list.status.as_deref(), Some("Completed"))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
