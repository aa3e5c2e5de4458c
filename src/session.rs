use std::fmt;

/// Bearer token issued by the backend at login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// Authentication context handed to every notification component.
///
/// Components never look the token up on their own. A session without a
/// token is treated as "unauthenticated, do nothing".
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<AuthToken>,
}

impl Session {
    pub fn authenticated(token: AuthToken) -> Self {
        Self { token: Some(token) }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn from_raw(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => {
                Self::authenticated(AuthToken::new(token.trim()))
            }
            _ => Self::anonymous(),
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }
}
