//! Login session.
//!
//! A [`Session`] only exists after a successful login and is consumed by
//! [`Session::logout`]. Every gateway call made through it carries the
//! bearer token.

use shared_types::{Call, Recording, User};
use std::fmt;
use tracing::info;

use crate::client::GatewayClient;
use crate::error::ClientError;
use crate::requests::{ProbeOutcome, ProbeRequest};

#[derive(Clone)]
pub struct Session {
    client: GatewayClient,
    user: User,
    token: String,
}

impl Session {
    pub(crate) fn new(client: GatewayClient, user: User, token: String) -> Self {
        info!(username = %user.username, "Session started");
        Self {
            client,
            user,
            token,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    /// True while both the user and the token are held.
    pub fn is_authenticated(&self) -> bool {
        !self.user.id.is_empty() && !self.token.is_empty()
    }

    pub async fn list_calls(&self) -> Result<Vec<Call>, ClientError> {
        self.client.list_calls(Some(&self.token)).await
    }

    pub async fn list_recordings(&self) -> Result<Vec<Recording>, ClientError> {
        self.client.list_recordings(Some(&self.token)).await
    }

    pub async fn probe(&self, request: &ProbeRequest) -> ProbeOutcome {
        self.client.probe(request, Some(&self.token)).await
    }

    /// Drop user and token; the client stays usable for a new login.
    pub fn logout(self) -> GatewayClient {
        info!(username = %self.user.username, "Session ended");
        self.client
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}
