// ── Identity service ──
//
// Bridges the hosted auth provider and the application's `users`
// profile relation. Token issuance and password storage stay with the
// provider; this service only orchestrates the two-step flows the app
// needs (register account + create profile row, auth user → profile).

use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use safeops_api::{AuthClient, Query, RestClient, Session};

use crate::error::CoreError;
use crate::model::{UserProfile, UserRole};
use crate::service::relation;

#[derive(Clone)]
pub struct IdentityService {
    auth: Arc<AuthClient>,
    rest: Arc<RestClient>,
}

impl IdentityService {
    pub fn new(auth: Arc<AuthClient>, rest: Arc<RestClient>) -> Self {
        Self { auth, rest }
    }

    /// Register an account and create its profile row.
    ///
    /// The profile insert is part of the sign-up contract: a failure
    /// there fails the whole operation (the caller can retry — the
    /// provider-side account already exists, keyed by email).
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        full_name: &str,
        role: UserRole,
    ) -> Result<(Session, UserProfile), CoreError> {
        let session = self
            .auth
            .sign_up(
                email,
                password,
                json!({ "full_name": full_name, "role": role }),
            )
            .await?;

        #[derive(Serialize)]
        struct ProfileInsert<'a> {
            auth_id: Uuid,
            email: &'a str,
            full_name: &'a str,
            role: UserRole,
        }

        let profile = self
            .rest
            .insert_one(
                relation::USERS,
                &ProfileInsert {
                    auth_id: session.user.id,
                    email,
                    full_name,
                    role,
                },
            )
            .await?;

        Ok((session, profile))
    }

    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, CoreError> {
        let session = self.auth.sign_in_with_password(email, password).await?;
        Ok(session)
    }

    pub async fn sign_out(&self, access_token: &SecretString) -> Result<(), CoreError> {
        self.auth.sign_out(access_token).await?;
        Ok(())
    }

    /// The profile behind an access token, or `None` when either lookup
    /// fails. The underlying error is logged, not propagated.
    pub async fn current_user(&self, access_token: &SecretString) -> Option<UserProfile> {
        let auth_user = match self.auth.get_user(access_token).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "failed to resolve auth user");
                return None;
            }
        };

        match self
            .rest
            .select_one(
                &Query::new(relation::USERS)
                    .select("*")
                    .eq("auth_id", auth_user.id),
            )
            .await
        {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(auth_id = %auth_user.id, error = %e, "failed to fetch user profile");
                None
            }
        }
    }
}
