// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport: one GET per action.

use std::time::Duration;

use reqwest::Client;

use crate::error::DispatchError;
use crate::protocol::{Action, Dispatch, DispatchResponse};

/// Dispatches [`Action::Http`] by requesting its URL.
///
/// The URL is used verbatim; the response body is returned for logging only.
///
/// # Examples
///
/// ```no_run
/// use hcfan_lib::protocol::{Action, Dispatch, HttpDispatcher};
///
/// # async fn example() -> hcfan_lib::Result<()> {
/// let http = HttpDispatcher::new()?;
/// http.dispatch(&Action::http("http://192.168.1.20/fan?speed=2")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
    timeout: Duration,
}

impl HttpDispatcher {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a dispatcher with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, DispatchError> {
        HttpDispatcherBuilder::new().build()
    }

    /// Creates a builder for custom settings.
    #[must_use]
    pub fn builder() -> HttpDispatcherBuilder {
        HttpDispatcherBuilder::new()
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get(&self, url: &str) -> Result<DispatchResponse, DispatchError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DispatchError::InvalidAddress(url.to_string()));
        }

        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(DispatchError::Http)?;

        if !response.status().is_success() {
            return Err(DispatchError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(DispatchError::Http)?;

        tracing::debug!(body = %body, "Received HTTP response");

        Ok(DispatchResponse::new(body))
    }
}

impl Dispatch for HttpDispatcher {
    async fn dispatch(&self, action: &Action) -> Result<DispatchResponse, DispatchError> {
        match action {
            Action::Http { url } => self.get(url).await,
            Action::Mqtt { .. } => Err(DispatchError::TransportUnavailable(action.transport())),
        }
    }
}

/// Builder for an [`HttpDispatcher`].
#[derive(Debug, Default)]
pub struct HttpDispatcherBuilder {
    timeout: Option<Duration>,
}

impl HttpDispatcherBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build(self) -> Result<HttpDispatcher, DispatchError> {
        let timeout = self.timeout.unwrap_or(HttpDispatcher::DEFAULT_TIMEOUT);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DispatchError::Http)?;

        Ok(HttpDispatcher { client, timeout })
    }
}
