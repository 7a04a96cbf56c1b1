const OAUTH_TOKEN_PREFIX: &str = "lin_oauth_";

/// How the credential is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Bearer,
    ApiKey,
}

/// Credential used to authenticate GraphQL requests.
#[derive(Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: TokenType,
}

impl AuthSession {
    pub fn new_access_token(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TokenType::Bearer,
        }
    }

    pub fn new_api_key(key: String) -> Self {
        Self {
            access_token: key,
            token_type: TokenType::ApiKey,
        }
    }

    /// Build a session from a raw credential, recognising OAuth access tokens by prefix.
    pub fn from_credential(credential: impl Into<String>) -> Self {
        let credential = credential.into();
        if credential.starts_with(OAUTH_TOKEN_PREFIX) {
            Self::new_access_token(credential)
        } else {
            Self::new_api_key(credential)
        }
    }

    /// Value sent in the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        match self.token_type {
            TokenType::Bearer => format!("Bearer {}", self.access_token),
            TokenType::ApiKey => self.access_token.clone(),
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}
