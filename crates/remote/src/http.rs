//! REST implementation of the cart service client.

use std::sync::Arc;

use async_trait::async_trait;
use cart::CartLine;
use common::{LineId, TicketTypeId};
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::dto::{AddToCartRequest, ApiEnvelope, CartSnapshotDto, UpdateCartRequest};
use crate::{CartApi, RemoteError, TokenStore};

/// Cart service client over HTTP.
///
/// Attaches the session's bearer token to every request when one is present.
/// A 401 that arrives while a token was attached invalidates the session:
/// the token is cleared and the call resolves to
/// [`RemoteError::AuthRejected`]. Anonymous 401s pass through as ordinary
/// API errors.
#[derive(Clone)]
pub struct HttpCartApi {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpCartApi {
    /// Creates a client for the service at `base_url` (scheme + host, no
    /// trailing path).
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/cart{path}", self.base_url)
    }

    /// Attaches the bearer token if present; returns whether one was.
    fn authorize(&self, builder: RequestBuilder) -> (RequestBuilder, bool) {
        match self.tokens.token() {
            Some(token) => (builder.bearer_auth(token), true),
            None => (builder, false),
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
    ) -> Result<reqwest::Response, RemoteError> {
        let (builder, had_token) = self.authorize(builder);
        let response = builder
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && had_token {
            tracing::warn!("cart service rejected the session token");
            self.tokens.clear();
            return Err(RemoteError::AuthRejected);
        }
        if status.is_server_error() {
            tracing::warn!(%status, "cart service unavailable");
            return Err(RemoteError::Unavailable(format!(
                "service returned {status}"
            )));
        }

        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_for_snapshot(
        &self,
        builder: RequestBuilder,
    ) -> Result<Vec<CartLine>, RemoteError> {
        let response = self.send(builder).await?;
        let envelope = response
            .json::<ApiEnvelope<CartSnapshotDto>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(envelope.data.into_lines())
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn fetch_cart(&self) -> Result<Vec<CartLine>, RemoteError> {
        self.send_for_snapshot(self.client.get(self.url(""))).await
    }

    async fn add_line(
        &self,
        ticket_type_id: &TicketTypeId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, RemoteError> {
        let body = AddToCartRequest {
            id: ticket_type_id.to_string(),
            quantity,
        };
        self.send_for_snapshot(self.client.post(self.url("/add")).json(&body))
            .await
    }

    async fn update_line(
        &self,
        line_id: &LineId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, RemoteError> {
        let body = UpdateCartRequest { quantity };
        self.send_for_snapshot(
            self.client
                .put(self.url(&format!("/{line_id}")))
                .json(&body),
        )
        .await
    }

    async fn remove_line(&self, line_id: &LineId) -> Result<Vec<CartLine>, RemoteError> {
        self.send_for_snapshot(self.client.delete(self.url(&format!("/{line_id}"))))
            .await
    }

    async fn clear(&self) -> Result<(), RemoteError> {
        self.send(self.client.delete(self.url(""))).await?;
        Ok(())
    }
}
