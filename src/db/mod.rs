pub mod invoices;
pub mod pool;
pub mod suppliers;
pub mod users;

pub use pool::create_pool;
