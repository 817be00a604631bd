// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Credential capability injected into the remote clients.
//!
//! Credentials are supplied ambiently by the environment; this module only
//! attaches them to outgoing requests. Nothing here validates or persists
//! them, and neither client ever reads credentials from global state.

use reqwest::RequestBuilder;

/// Attaches ambient credentials to an outgoing HTTP request.
pub trait Authenticator: Send + Sync {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Bearer-token authenticator backed by the process environment.
///
/// When `LABELVIEW_API_TOKEN` is unset the requests go out anonymous, which
/// is fine against stores and endpoints that allow public reads.
pub struct EnvAuthenticator {
    token: Option<String>,
}

impl EnvAuthenticator {
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("LABELVIEW_API_TOKEN").ok(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.token.is_none()
    }
}

impl Authenticator for EnvAuthenticator {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Fixed-token authenticator, used by tests and one-off scripts.
pub struct StaticAuthenticator {
    token: String,
}

impl StaticAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authenticator for StaticAuthenticator {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }
}
