//! Error types

mod api;
mod auth;

pub use api::*;
pub use auth::*;

/// Top-level error for client and service calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl Error {
    /// The message shown to the console user.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(e) => e.user_message(),
            Error::Auth(AuthError::Rejected { message }) => message.clone(),
            Error::Auth(e) => e.to_string(),
        }
    }
}

/// Outcome as seen by screens: a value or a displayable message.
pub type ServiceResult<T> = Result<T, String>;

/// Converts library results into [`ServiceResult`]s.
pub trait UserFacing<T> {
    /// Logs the error and replaces it with its user message.
    fn user_facing(self) -> ServiceResult<T>;
}

impl<T, E: Into<Error>> UserFacing<T> for Result<T, E> {
    fn user_facing(self) -> ServiceResult<T> {
        self.map_err(|e| {
            let e = e.into();
            log::error!("{}", e);
            e.user_message()
        })
    }
}
