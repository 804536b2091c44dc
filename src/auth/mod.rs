mod callback;
mod flow;
pub mod oauth;
pub mod token;
pub mod token_store;

pub use oauth::{AuthLoginResult, AuthService, AuthStatus};
pub use token::TokenSet;
pub use token_store::{FileTokenStore, TokenStore};
