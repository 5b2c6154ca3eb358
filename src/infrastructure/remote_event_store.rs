//! HTTP client for the remote event store

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};

use crate::application::dto::EmotionEventDto;
use crate::application::ports::outbound::{
    EventStorePort, StoreError, StoredCollection, WriteReceipt,
};
use crate::application::services::dtos_to_events;
use crate::domain::entities::EmotionEvent;

/// Client for the `/emotions` REST surface
pub struct RemoteEventStore {
    client: Client,
    base_url: String,
}

impl RemoteEventStore {
    /// `base_url` includes the API prefix, e.g. `http://localhost:3001/api`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn emotions_url(&self) -> String {
        format!("{}/emotions", self.base_url)
    }

    /// Turn a non-success status into a rejection carrying the response body
    async fn check(response: Response, expected: Option<StatusCode>) -> Result<Response, StoreError> {
        let status = response.status();
        let accepted = match expected {
            Some(expected) => status == expected,
            None => status.is_success(),
        };
        if accepted {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn receipt() -> WriteReceipt {
        WriteReceipt {
            written_at: Utc::now(),
        }
    }
}

fn network(e: reqwest::Error) -> StoreError {
    StoreError::Network(e.to_string())
}

#[async_trait]
impl EventStorePort for RemoteEventStore {
    async fn fetch(&self) -> Result<StoredCollection, StoreError> {
        let response = self
            .client
            .get(self.emotions_url())
            .send()
            .await
            .map_err(network)?;
        let response = Self::check(response, None).await?;

        let dtos: Vec<EmotionEventDto> = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let events = dtos_to_events(dtos).map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(StoredCollection {
            events,
            written_at: Some(Utc::now()),
        })
    }

    async fn append(&self, event: &EmotionEvent) -> Result<WriteReceipt, StoreError> {
        let response = self
            .client
            .post(self.emotions_url())
            .json(&EmotionEventDto::from(event))
            .send()
            .await
            .map_err(network)?;
        Self::check(response, Some(StatusCode::CREATED)).await?;
        Ok(Self::receipt())
    }

    async fn replace_all(&self, events: &[EmotionEvent]) -> Result<WriteReceipt, StoreError> {
        let dtos: Vec<EmotionEventDto> = events.iter().map(EmotionEventDto::from).collect();
        let response = self
            .client
            .put(self.emotions_url())
            .json(&dtos)
            .send()
            .await
            .map_err(network)?;
        Self::check(response, None).await?;
        Ok(Self::receipt())
    }

    async fn clear(&self) -> Result<WriteReceipt, StoreError> {
        let response = self
            .client
            .delete(self.emotions_url())
            .send()
            .await
            .map_err(network)?;
        Self::check(response, None).await?;
        Ok(Self::receipt())
    }
}
