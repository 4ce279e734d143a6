//! Management API for event types.

use reqwest::{Method, StatusCode};
use tracing::{info_span, Instrument};
use url::Url;

use crate::error::Result;
use crate::event_types::types::EventType;
use crate::http::Client;
use crate::resilience::{RetryOptions, RetryPolicy};

const EVENT_TYPES: &str = "event-types";

/// Inspects and manages the event types of a broker.
///
/// Every method applies the retry policy the API was created with. The
/// policy is shared, the backoff state is not: each call starts its own.
#[derive(Debug, Clone)]
pub struct EventApi {
    client: Client,
    retry: RetryPolicy,
}

impl EventApi {
    pub fn new(client: Client, options: RetryOptions) -> Self {
        Self {
            client,
            retry: RetryPolicy::new(options),
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// All registered event types. Empty when none exist.
    pub async fn list(&self) -> Result<Vec<EventType>> {
        let url = self.collection_url()?;
        async {
            let event_types: Vec<EventType> = self
                .client
                .get_json(&self.retry, &url, "unable to request event types")
                .await?;
            tracing::debug!(count = event_types.len(), "Listed event types");
            Ok(event_types)
        }
        .instrument(info_span!("event_types.list"))
        .await
    }

    /// The event type called `name`.
    ///
    /// # Errors
    ///
    /// A remote error for which [`Error::is_not_found`](crate::Error::is_not_found)
    /// holds if the event type does not exist.
    pub async fn get(&self, name: &str) -> Result<EventType> {
        let url = self.item_url(name)?;
        self.client
            .get_json(&self.retry, &url, "unable to request event type")
            .instrument(info_span!("event_types.get", name))
            .await
    }

    /// Register a new event type. Succeeds only on `201 Created`.
    ///
    /// # Errors
    ///
    /// A conflict-class remote error if the name is taken or the broker
    /// rejects the definition; the problem detail is part of the message.
    pub async fn create(&self, event_type: &EventType) -> Result<()> {
        let url = self.collection_url()?;
        self.client
            .send_json(
                &self.retry,
                Method::POST,
                &url,
                event_type,
                &[StatusCode::CREATED],
                "unable to create event type",
            )
            .instrument(info_span!("event_types.create", name = %event_type.name))
            .await?;
        tracing::info!(name = %event_type.name, "Event type created");
        Ok(())
    }

    /// Replace an existing event type, addressed by `event_type.name`.
    pub async fn update(&self, event_type: &EventType) -> Result<()> {
        let url = self.item_url(&event_type.name)?;
        self.client
            .send_json(
                &self.retry,
                Method::PUT,
                &url,
                event_type,
                &[StatusCode::OK],
                "unable to update event type",
            )
            .instrument(info_span!("event_types.update", name = %event_type.name))
            .await?;
        tracing::info!(name = %event_type.name, "Event type updated");
        Ok(())
    }

    /// Remove the event type called `name`.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let url = self.item_url(name)?;
        self.client
            .delete(&self.retry, &url, "unable to delete event type")
            .instrument(info_span!("event_types.delete", name))
            .await?;
        tracing::info!(name, "Event type deleted");
        Ok(())
    }

    fn collection_url(&self) -> Result<Url> {
        self.client.endpoint(&[EVENT_TYPES])
    }

    fn item_url(&self, name: &str) -> Result<Url> {
        self.client.endpoint(&[EVENT_TYPES, name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = Client::new("http://localhost:8080").unwrap();
        let api = EventApi::new(client, RetryOptions::default());

        assert_eq!(api.collection_url().unwrap().as_str(), "http://localhost:8080/event-types");
        assert_eq!(
            api.item_url("order.created").unwrap().as_str(),
            "http://localhost:8080/event-types/order.created"
        );
        assert!(!api.retry_policy().is_enabled());
    }
}
