//! Account registration, login, and token-to-user resolution.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::ports::{
    AuthError, BaseRepository, PasswordService, TokenClaims, TokenService, UserRepository,
};
use crate::validation::{validate_email, validate_password, validate_username};

/// Input for a new account.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A freshly issued token together with the user it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Server side of the credential store: owns user records and issues tokens.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Create an account and log it in.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, DomainError> {
        validate_username(&input.username).map_err(DomainError::Validation)?;
        validate_email(&input.email).map_err(DomainError::Validation)?;
        validate_password(&input.password).map_err(DomainError::Validation)?;

        let username = input.username.trim().to_string();
        let email = normalize_email(&input.email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already in use".into()));
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Duplicate("Username already taken".into()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = self
            .users
            .insert(User::new(username, email, password_hash))
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => {
                    DomainError::Duplicate("Email or username already in use".into())
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        self.issue(user)
    }

    /// Exchange credentials for a token. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        self.issue(user)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// Decode a bearer token.
    pub fn authenticate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.tokens.validate_token(token)
    }

    fn issue(&self, user: User) -> Result<AuthSession, DomainError> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username, &user.email)?;
        Ok(AuthSession { token, user })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
