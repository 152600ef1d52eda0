//! Authentication

mod service;
mod session;
mod token;

pub use service::AuthService;
pub use session::FileSessionStore;
pub use session::MemorySessionStore;
pub use session::Session;
pub use session::SessionStore;
pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
