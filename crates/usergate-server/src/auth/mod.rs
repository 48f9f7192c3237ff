pub mod password;
pub mod service;
pub mod token;

pub use password::CredentialHasher;
pub use service::{AuthError, AuthService, LoginForm, LoginOutcome, SignupForm};
pub use token::{TokenError, TokenIssuer, TOKEN_TTL_SECS};
