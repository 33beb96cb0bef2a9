mod db;
mod payment_link;
mod qr;
mod schema;

pub use db::*;
pub use payment_link::*;
pub use qr::*;
pub use schema::*;
