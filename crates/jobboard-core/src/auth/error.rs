use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend refused the login, or could not be reached. The two are
    /// not told apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The backend accepted the login but its reply lacked `id`, `email`
    /// or `token`.
    #[error("Incomplete identity in login response (missing {0})")]
    IncompleteIdentity(&'static str),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "The email or password is incorrect.".to_string(),
            AuthError::IncompleteIdentity(_) => {
                "The server returned an incomplete login response. Please try again.".to_string()
            }
        }
    }
}
