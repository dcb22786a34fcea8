//! Generic integration messages
//!
//! The request starts from the routed params. When the event names an
//! `event`, it is enriched with the client information from the consumer
//! service, the organization genealogy and the exclusion settings before it
//! is sent.

use super::{put, urls, EventRouter};
use crate::core::codec::decode_field;
use crate::core::exclusions;
use crate::core::genealogy::resolve_genealogy;
use crate::domain::event::LooseRead;
use crate::domain::{fields, DispatchKind, PatientEvent, RequestContext, RequestParams, Result};
use crate::{log_dispatch, log_lookup_degraded};
use serde_json::{Map, Value};

impl EventRouter {
    pub(super) async fn route_generic(
        &self,
        ctx: &RequestContext,
        event: &PatientEvent,
        params: RequestParams,
    ) -> Result<()> {
        let payload = decode_field(event, fields::PAYLOAD);
        let url = urls::integration_url(&self.urls.cih_integration, event, &payload);

        let request = if event.get_non_empty(fields::EVENT).is_some() {
            self.prepare_request(ctx, event, params).await
        } else {
            params
        };

        let url = url
            .param(fields::MEASURE_NAME, request.get_string(fields::MEASURE_NAME))
            .build();

        self.gateway.send_message(ctx, &url, &request).await?;
        log_dispatch!(DispatchKind::Message, ctx, &url);
        Ok(())
    }

    async fn prepare_request(
        &self,
        ctx: &RequestContext,
        event: &PatientEvent,
        mut params: RequestParams,
    ) -> RequestParams {
        let info = self.client_information(ctx, event, &params).await;
        params.extend(info);

        put(
            &mut params,
            fields::ORGANIZATION_ID,
            event.get_string(fields::ORGANIZATION_ID),
        );
        put(
            &mut params,
            fields::ORGANIZATION,
            event.get_string(fields::ORGANIZATION),
        );
        put(
            &mut params,
            fields::APPOINTMENT_STATUS,
            event.get_string(fields::APPOINTMENT_STATUS),
        );

        let payload = decode_field(event, fields::PAYLOAD);
        put(
            &mut params,
            fields::APPT_ORGANIZATION_ID,
            payload.get_string(fields::APPT_ORGANIZATION_ID),
        );

        if let Some(organization_id) = event.organization_id() {
            let genealogy = resolve_genealogy(self.lookup.as_ref(), ctx, organization_id).await;
            params.insert(
                fields::GENEALOGY_ORGANIZATION.to_string(),
                Value::Array(genealogy.into_iter().map(Value::String).collect()),
            );
        }

        exclusions::enrich(params, event)
    }

    /// Client information backing the message, empty when the lookup fails
    async fn client_information(
        &self,
        ctx: &RequestContext,
        event: &PatientEvent,
        params: &RequestParams,
    ) -> Map<String, Value> {
        let lookup_url = if event.event_name().as_deref() == Some(fields::event_name::SIGN_CANS) {
            urls::cans_lookup_url(&self.urls.consumer_patient_cans, event)
        } else {
            let payload = decode_field(event, fields::PAYLOAD);
            urls::generic_lookup_url(&self.urls.consumer_patient, event, &payload, params)
        };

        tracing::debug!(lookup_url = %lookup_url, "Fetching client information");

        match self.gateway.get_patient_info(ctx, &lookup_url, params).await {
            Ok(info) => info,
            Err(e) => {
                log_lookup_degraded!(&e, ctx, "client information treated as empty");
                Map::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use crate::adapters::memory::{RecordingGateway, StaticConfigurationLookup};
    use crate::domain::{EndpointKey, Organization};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn info(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_sign_cans_uses_document_lookup() {
        let gateway = Arc::new(
            RecordingGateway::new().with_patient_info(info(json!({"measureName": "CANS"}))),
        );
        let router = test_router(gateway.clone(), Arc::new(StaticConfigurationLookup::new()));

        router
            .route(
                &event(json!({
                    "documentId": 321,
                    "type": "GNRINT",
                    "event": "SIGN_CANS"
                })),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        let reads = gateway.calls_to(EndpointKey::ConsumerGetPatient);
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].url, "http://svc.local/consumer/cans?documentId=321");

        let sends = gateway.calls_to(EndpointKey::CihSendMessage);
        assert!(sends[0].url.ends_with("&measureName=CANS"));
        assert_eq!(sends[0].body[fields::MEASURE_NAME], "CANS");
    }

    #[tokio::test]
    async fn test_enriched_request() {
        let gateway = Arc::new(
            RecordingGateway::new()
                .with_patient_info(info(json!({"firstName": "Ada", "patientId": "override"}))),
        );
        let lookup = Arc::new(
            StaticConfigurationLookup::new()
                .with_organization(Organization::new(12).with_parent(Organization::new(1))),
        );
        let router = test_router(gateway.clone(), lookup);

        router
            .route(
                &event(json!({
                    "patientId": "P9",
                    "type": "GNRINT",
                    "event": "DISCHARGE",
                    "organizationId": 12,
                    "organization": "East",
                    "extractPeriodGeneric": 2,
                    "exclusions": "{\"exclusionsArray\": [\"labs\"]}",
                    "payload": "{\"apptOrganizationId\": 44, \"activityLogId\": 5}"
                })),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        let reads = gateway.calls_to(EndpointKey::ConsumerGetPatient);
        assert!(reads[0].url.contains("appointmentId=5"));

        let sends = gateway.calls_to(EndpointKey::CihSendMessage);
        let body = &sends[0].body;
        assert_eq!(body["firstName"], "Ada");
        assert_eq!(body[fields::PATIENT_ID], "override");
        assert_eq!(body[fields::ORGANIZATION_ID], "12");
        assert_eq!(body[fields::ORGANIZATION], "East");
        assert_eq!(body[fields::APPT_ORGANIZATION_ID], "44");
        assert_eq!(body[fields::GENEALOGY_ORGANIZATION], json!(["12", "1"]));
        assert_eq!(body[fields::HAS_EXCLUSIONS], true);
        assert_eq!(body[fields::EXCLUSIONS], json!(["labs"]));
        assert!(body.contains_key(fields::REQUEST_DATE));
        assert!(body.contains_key(fields::CCDA_BEGIN_DATE));
        assert!(sends[0].url.ends_with("&measureName"));
    }

    #[tokio::test]
    async fn test_without_event_sends_base_params() {
        let gateway = Arc::new(RecordingGateway::new());
        let lookup = Arc::new(StaticConfigurationLookup::new());
        let router = test_router(gateway.clone(), lookup.clone());

        router
            .route(
                &event(json!({"patientId": "P5", "type": "GNRINT", "organizationId": 3})),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        assert!(gateway.calls_to(EndpointKey::ConsumerGetPatient).is_empty());
        let sends = gateway.calls_to(EndpointKey::CihSendMessage);
        assert_eq!(sends.len(), 1);
        assert!(!sends[0].body.contains_key(fields::REQUEST_DATE));
        assert!(!sends[0].body.contains_key(fields::GENEALOGY_ORGANIZATION));
        // only the configuration value lookup, no genealogy
        assert_eq!(lookup.lookups().len(), 1);
    }

    #[tokio::test]
    async fn test_client_information_failure_degrades() {
        let gateway = Arc::new(RecordingGateway::new().failing_on(EndpointKey::ConsumerGetPatient));
        let router = test_router(gateway.clone(), Arc::new(StaticConfigurationLookup::new()));

        let outcome = router
            .route(
                &event(json!({"patientId": "P6", "type": "GNRINT", "event": "UPDATE"})),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.dispatches(), &[DispatchKind::Message]);
        let sends = gateway.calls_to(EndpointKey::CihSendMessage);
        assert_eq!(sends[0].body[fields::PATIENT_ID], "P6");
        assert!(sends[0].body.contains_key(fields::REQUEST_DATE));
    }
}
