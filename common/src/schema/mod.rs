mod plan;
mod transaction;

pub use plan::*;
pub use transaction::*;
