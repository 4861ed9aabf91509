use thiserror::Error;

use geocode_service::GeoapifyClient;
use hubspot_service::HubspotClient;
use shared_lib::hubspot_structs::WebhookEvent;

use crate::{sync_city_from_zip, SyncError, SyncOutcome};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub received: usize,
    pub ignored: usize,
    pub synced: usize,
    pub failed: usize,
}

#[derive(Debug, Error)]
enum EventError {
    #[error("event has no objectId")]
    MissingObjectId,

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Runs the zip to city sync for every zip change in the batch, in delivery order.
/// Events are decoded one at a time, so a malformed or failing event is logged
/// and counted as failed without stopping the rest of the batch.
pub async fn process_webhook_events(
    crm: &HubspotClient,
    geocoder: &GeoapifyClient,
    events: &[serde_json::Value],
    country: &str,
) -> BatchReport {
    let mut report = BatchReport {
        received: events.len(),
        ..Default::default()
    };

    for raw in events {
        let event = match serde_json::from_value::<WebhookEvent>(raw.clone()) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!("Failed to read webhook event {}: {}", raw, err);
                report.failed += 1;
                continue;
            }
        };

        if !event.is_zip_change() {
            tracing::trace!(
                "Ignoring {:?} event for property {:?}",
                event.subscription_type,
                event.property_name
            );
            report.ignored += 1;
            continue;
        }

        match process_event(crm, geocoder, &event, country).await {
            Ok(outcome) => {
                tracing::info!(
                    "Processed zip change for contact {}: {} -> {}",
                    outcome.contact_id,
                    outcome.zip,
                    outcome.city
                );
                report.synced += 1;
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to process contact {}: {}",
                    event.object_id.as_deref().unwrap_or("<unknown>"),
                    err
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        "Webhook batch done: {} received, {} synced, {} failed, {} ignored",
        report.received,
        report.synced,
        report.failed,
        report.ignored
    );

    report
}

async fn process_event(
    crm: &HubspotClient,
    geocoder: &GeoapifyClient,
    event: &WebhookEvent,
    country: &str,
) -> Result<SyncOutcome, EventError> {
    let contact_id = event
        .object_id
        .as_deref()
        .ok_or(EventError::MissingObjectId)?;

    tracing::debug!("Processing zip change for contact {}", contact_id);

    Ok(sync_city_from_zip(crm, geocoder, contact_id, country).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn zip_change(object_id: serde_json::Value) -> serde_json::Value {
        json!({
            "subscriptionType": "contact.propertyChange",
            "propertyName": "zip",
            "objectId": object_id
        })
    }

    #[tokio::test]
    async fn failing_event_does_not_stop_the_batch() {
        let server = MockServer::start_async().await;
        let (crm, geocoder) = clients(&server);

        mock_geocode(&server, "48201", json!([{"city": "Detroit"}])).await;

        let mut writes = Vec::new();
        for id in ["1", "2", "4", "5"] {
            mock_contact(&server, id, Some("48201")).await;
            writes.push(mock_city_update(&server, id, "Detroit").await);
        }

        // contact 3 blows up upstream
        let broken_read = server
            .mock_async(|when, then| {
                when.method(GET).path("/crm/v3/objects/contacts/3");
                then.status(500)
                    .json_body(json!({"status": "error", "message": "internal error"}));
            })
            .await;
        let broken_write = mock_any_update(&server, "3").await;

        let events: Vec<_> = (1..=5).map(|id| zip_change(json!(id))).collect();

        let report = process_webhook_events(&crm, &geocoder, &events, "US").await;

        assert_eq!(
            report,
            BatchReport {
                received: 5,
                ignored: 0,
                synced: 4,
                failed: 1,
            }
        );
        broken_read.assert_async().await;
        broken_write.assert_hits_async(0).await;
        for write in writes {
            write.assert_async().await;
        }
    }

    #[tokio::test]
    async fn only_zip_property_changes_are_processed() {
        let server = MockServer::start_async().await;
        let (crm, geocoder) = clients(&server);

        let read = mock_contact(&server, "10", Some("48201")).await;
        mock_geocode(&server, "48201", json!([{"city": "Detroit"}])).await;
        let write = mock_city_update(&server, "10", "Detroit").await;
        let other_read = mock_contact(&server, "11", Some("48201")).await;

        let events = vec![
            json!({"subscriptionType": "contact.propertyChange", "propertyName": "city", "objectId": 11}),
            json!({"subscriptionType": "contact.creation", "objectId": 11}),
            json!({"subscriptionType": "contact.propertyChange", "propertyName": "zip", "objectId": "10"}),
        ];

        let report = process_webhook_events(&crm, &geocoder, &events, "US").await;

        assert_eq!(report.ignored, 2);
        assert_eq!(report.synced, 1);
        read.assert_async().await;
        write.assert_async().await;
        other_read.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn zip_change_without_object_id_counts_as_failed() {
        let server = MockServer::start_async().await;
        let (crm, geocoder) = clients(&server);

        let events = vec![json!({"subscriptionType": "contact.propertyChange", "propertyName": "zip"})];

        let report = process_webhook_events(&crm, &geocoder, &events, "US").await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.synced, 0);
    }

    #[tokio::test]
    async fn badly_typed_event_fails_alone() {
        let server = MockServer::start_async().await;
        let (crm, geocoder) = clients(&server);

        let read = mock_contact(&server, "1", Some("48201")).await;
        mock_geocode(&server, "48201", json!([{"city": "Detroit"}])).await;
        let write = mock_city_update(&server, "1", "Detroit").await;

        let events = vec![
            zip_change(json!(1)),
            zip_change(json!(true)),
            json!({"subscriptionType": "contact.propertyChange", "propertyName": 7, "objectId": 2}),
            json!("not an event"),
        ];

        let report = process_webhook_events(&crm, &geocoder, &events, "US").await;

        assert_eq!(
            report,
            BatchReport {
                received: 4,
                ignored: 0,
                synced: 1,
                failed: 3,
            }
        );
        read.assert_async().await;
        write.assert_async().await;
    }

    #[tokio::test]
    async fn empty_batch_is_fine() {
        let server = MockServer::start_async().await;
        let (crm, geocoder) = clients(&server);

        let report = process_webhook_events(&crm, &geocoder, &[], "US").await;
        assert_eq!(report, BatchReport::default());
    }
}
