mod file_store;
mod http_client;
mod memory_store;
mod token_vault;

pub use file_store::*;
pub use http_client::*;
pub use memory_store::*;
pub use token_vault::*;
