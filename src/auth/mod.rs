pub mod token_store;

pub use token_store::{FileTokenStore, LayeredTokenStore, MemoryTokenStore, TokenStore};
