// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP collaborators: reachability probe and remote document store.

use std::time::Duration;

use bh_core::{BoxFuture, DocumentStore, Probe, ProbeError, RemoteError};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

use crate::error::{Error, Result};

pub fn client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("backhaul/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Http(e.to_string()))
}

/// `HEAD <url>`; any response counts as reachable.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(client: Client) -> Self {
        HttpProbe { client }
    }
}

impl Probe for HttpProbe {
    fn probe<'a>(&'a self, url: &'a str) -> BoxFuture<'a, std::result::Result<(), ProbeError>> {
        Box::pin(async move {
            self.client
                .head(url)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| ProbeError::Request(e.to_string()))
        })
    }
}

/// Documents at `<base_url>/<collection>/<id>`: `POST` creates, `PUT`
/// replaces, `DELETE` removes, `GET` reads.
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(client: Client, base_url: &str) -> Self {
        HttpDocumentStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    async fn send(
        &self,
        method: Method,
        collection: &str,
        id: &str,
        payload: Option<&Value>,
    ) -> std::result::Result<Response, RemoteError> {
        let url = self.document_url(collection, id);
        tracing::debug!(%method, %url, "remote request");
        let mut request = self.client.request(method, &url);
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        request.send().await.map_err(network_error)
    }

    async fn write(
        &self,
        method: Method,
        collection: &str,
        id: &str,
        payload: Option<&Value>,
    ) -> std::result::Result<(), RemoteError> {
        let response = self.send(method.clone(), collection, id, payload).await?;
        let status = response.status();
        if status.is_success() || (method == Method::DELETE && status == StatusCode::NOT_FOUND) {
            return Ok(());
        }
        Err(status_error(response).await)
    }
}

impl DocumentStore for HttpDocumentStore {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        payload: &'a Value,
    ) -> BoxFuture<'a, std::result::Result<(), RemoteError>> {
        Box::pin(self.write(Method::POST, collection, id, Some(payload)))
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        payload: &'a Value,
    ) -> BoxFuture<'a, std::result::Result<(), RemoteError>> {
        Box::pin(self.write(Method::PUT, collection, id, Some(payload)))
    }

    fn delete<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, std::result::Result<(), RemoteError>> {
        Box::pin(self.write(Method::DELETE, collection, id, None))
    }

    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, std::result::Result<Option<Value>, RemoteError>> {
        Box::pin(async move {
            let response = self.send(Method::GET, collection, id, None).await?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !status.is_success() {
                return Err(status_error(response).await);
            }
            response
                .json::<Value>()
                .await
                .map(Some)
                .map_err(|e| RemoteError::Decode(e.to_string()))
        })
    }
}

fn network_error(e: reqwest::Error) -> RemoteError {
    if e.is_decode() {
        RemoteError::Decode(e.to_string())
    } else {
        RemoteError::Network(e.to_string())
    }
}

async fn status_error(response: Response) -> RemoteError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| status.to_string());
    RemoteError::Status {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
