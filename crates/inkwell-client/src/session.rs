//! Client session: who is logged in, and with which bearer token.
//!
//! The state is a small tagged machine:
//!
//! ```text
//! Unauthenticated --login/register--> Authenticated
//! Hydrating --current_user ok--> Authenticated
//! Hydrating --any failure-----> Unauthenticated (persisted token removed)
//! Authenticated --logout------> Unauthenticated
//! ```
//!
//! Every mutating call writes the state once, when its request completes, so
//! the last completed call wins.

use std::sync::Arc;

use parking_lot::RwLock;

use inkwell_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::api::AuthApi;
use crate::error::ClientError;
use crate::storage::{TOKEN_KEY, TokenStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// A persisted token was found and is being checked against the server.
    Hydrating { token: String },
    Authenticated { token: String, user: UserResponse },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Hydrating { .. })
    }

    pub fn current_user(&self) -> Option<&UserResponse> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Token usable for authenticated requests; `None` until hydration succeeds.
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }
}

pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Starts `Hydrating` when the store holds a token, else `Unauthenticated`.
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>) -> Self {
        let state = match store.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => SessionState::Hydrating { token },
            Ok(_) => SessionState::Unauthenticated,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted token");
                SessionState::Unauthenticated
            }
        };

        Self {
            api,
            store,
            state: RwLock::new(state),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn current_user(&self) -> Option<UserResponse> {
        self.state.read().current_user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token().map(str::to_string)
    }

    /// Resolve a persisted token to its user. Fails closed: on any error the
    /// token is dropped and the session becomes unauthenticated. A login,
    /// register or logout that completes first supersedes the result.
    pub async fn hydrate(&self) -> SessionState {
        let token = match &*self.state.read() {
            SessionState::Hydrating { token } => token.clone(),
            other => return other.clone(),
        };

        let result = self.api.current_user(&token).await;

        let mut state = self.state.write();
        let still_hydrating =
            matches!(&*state, SessionState::Hydrating { token: t } if *t == token);
        if !still_hydrating {
            tracing::debug!("Hydration superseded");
            return state.clone();
        }

        *state = match result {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "Session restored");
                SessionState::Authenticated { token, user }
            }
            Err(e) => {
                tracing::info!(error = %e, "Persisted token rejected");
                if let Err(e) = self.store.remove(TOKEN_KEY) {
                    tracing::warn!(error = %e, "Could not remove persisted token");
                }
                SessionState::Unauthenticated
            }
        };
        state.clone()
    }

    /// On failure the state is left untouched.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<UserResponse, ClientError> {
        let auth = self.api.login(credentials).await?;
        Ok(self.establish(auth))
    }

    /// Registration logs the new account in.
    pub async fn register(&self, user: &RegisterUserRequest) -> Result<UserResponse, ClientError> {
        let auth = self.api.register(user).await?;
        Ok(self.establish(auth))
    }

    pub fn logout(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "Could not remove persisted token");
        }
        *self.state.write() = SessionState::Unauthenticated;
    }

    fn establish(&self, auth: AuthResponse) -> UserResponse {
        if let Err(e) = self.store.set(TOKEN_KEY, &auth.token) {
            tracing::warn!(error = %e, "Could not persist token");
        }

        let user = auth.user;
        tracing::debug!(user_id = %user.id, "Session established");
        *self.state.write() = SessionState::Authenticated {
            token: auth.token,
            user: user.clone(),
        };
        user
    }
}
