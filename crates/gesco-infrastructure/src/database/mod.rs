pub mod connection;
pub mod tx;

pub use connection::create_pool;
pub use tx::{Tx, TxConn};
