//! Event classification and dispatch
//!
//! [`EventRouter`] validates one inbound event, enriches a shared parameter
//! map and runs each matching branch in turn:
//!
//! 1. `type == "ADT"` sends an appointment/patient message
//! 2. `type == "CCDA"` sends a clinical document request
//! 3. `event == "REFER_PATIENT"` sends referral contact information
//! 4. `type == "GNRINT"` sends a generic integration message (see [`generic`])
//!
//! Branches are independent, so one event can trigger several dispatches.
//! Enrichment lookups that fail are logged and skipped. A failed dispatch
//! stops the event and is returned as [`RouterError::Downstream`].

mod generic;
pub mod urls;

pub use urls::EndpointUrls;

use crate::adapters::traits::{CihGateway, ConfigurationLookup};
use crate::config::EndpointsConfig;
use crate::core::codec::decode_field;
use crate::domain::event::LooseRead;
use crate::domain::fields;
use crate::domain::{
    DispatchKind, PatientEvent, RequestContext, RequestParams, Result, RouteOutcome, RouterError,
};
use crate::{log_dispatch, log_lookup_degraded};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Configuration section holding the patient identifier settings
pub const CONFIG_SECTION: &str = "CIH Integration";

/// Configuration subsection holding the patient identifier settings
pub const CONFIG_SUBSECTION: &str = "HIE General Integration";

const MISSING_IDENTIFIER: &str =
    "At least one of the parameters (patientId or documentId) is required.";

/// Routes patient events to the integration gateway
///
/// Holds only immutable state, so one router is shared by every concurrent
/// event. Each [`route`](Self::route) call builds its own [`RequestContext`].
pub struct EventRouter {
    urls: EndpointUrls,
    gateway: Arc<dyn CihGateway>,
    lookup: Arc<dyn ConfigurationLookup>,
}

impl EventRouter {
    pub fn new(
        urls: EndpointUrls,
        gateway: Arc<dyn CihGateway>,
        lookup: Arc<dyn ConfigurationLookup>,
    ) -> Self {
        Self {
            urls,
            gateway,
            lookup,
        }
    }

    /// Create a router from the endpoints section of the configuration
    pub fn from_config(
        endpoints: &EndpointsConfig,
        gateway: Arc<dyn CihGateway>,
        lookup: Arc<dyn ConfigurationLookup>,
    ) -> Result<Self> {
        Ok(Self::new(EndpointUrls::from_config(endpoints)?, gateway, lookup))
    }

    /// Queue-facing entry point
    ///
    /// Never fails: routing errors are logged and reported as
    /// [`RouteOutcome::Failed`].
    pub async fn on_message(
        &self,
        event: &PatientEvent,
        headers: &BTreeMap<String, String>,
    ) -> RouteOutcome {
        match self.route(event, headers).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_type = event.event_type().as_deref().unwrap_or_default(),
                    patient_id = event.patient_id().as_deref().unwrap_or_default(),
                    "Failed to route event"
                );
                RouteOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Route one event
    ///
    /// # Returns
    ///
    /// * `Ok(Rejected)` when the event has neither `patientId` nor `documentId`
    /// * `Ok(Dispatched)` listing the dispatches made, in branch order
    /// * `Err(RouterError::Downstream)` when a dispatch call fails
    pub async fn route(
        &self,
        event: &PatientEvent,
        headers: &BTreeMap<String, String>,
    ) -> Result<RouteOutcome> {
        let event_type = event.event_type();
        let event_name = event.event_name();

        if event.get_non_empty(fields::PATIENT_ID).is_none() && event.document_id().is_none() {
            let error = RouterError::Validation(MISSING_IDENTIFIER.to_string());
            tracing::error!(
                error = %error,
                event_type = event_type.as_deref().unwrap_or_default(),
                "Rejected event"
            );
            return Ok(RouteOutcome::Rejected {
                reason: MISSING_IDENTIFIER.to_string(),
            });
        }

        tracing::info!(
            event_type = event_type.as_deref().unwrap_or_default(),
            event = event_name.as_deref().unwrap_or_default(),
            patient_id = event.patient_id().as_deref().unwrap_or_default(),
            "Routing event"
        );

        let mut ctx = RequestContext::from_inbound(headers);
        ctx.apply_consent_flags(event);

        let mut params = RequestParams::new();
        put(&mut params, fields::PATIENT_ID, event.patient_id());

        let payload = decode_field(event, fields::PAYLOAD);
        let integration_url =
            urls::integration_url(&self.urls.cih_integration, event, &payload).build();

        if let Some(organization_id) = event.organization_id() {
            if let Some(value) = self.configuration_value(&ctx, organization_id).await {
                params.insert(
                    fields::CONFIGURATION_VALUE.to_string(),
                    Value::String(value),
                );
            }
        }

        let is_type = |expected: &str| event_type.as_deref() == Some(expected);
        let mut dispatches = Vec::new();

        if is_type(fields::event_type::ADT) {
            put(
                &mut params,
                fields::APPOINTMENT_STATUS,
                event.get_string(fields::APPOINTMENT_STATUS),
            );
            let lookup_url =
                urls::adt_lookup_url(&self.urls.consumer_patient, event, &payload, &params);

            tracing::debug!(lookup_url = %lookup_url, "Sending patient message");
            self.gateway
                .send_patient(&ctx, &lookup_url, &integration_url, &params)
                .await?;
            log_dispatch!(DispatchKind::Patient, &ctx, &integration_url);
            dispatches.push(DispatchKind::Patient);
        }

        if is_type(fields::event_type::CCDA) {
            for key in [
                fields::EXTRACT_PERIOD,
                fields::ORGANIZATION_ID,
                fields::EXCLUSIONS,
                fields::ORGANIZATION,
                fields::EVENT,
            ] {
                put(&mut params, key, event.get_string(key));
            }
            let lookup_url = urls::ccda_lookup_url(&self.urls.consumer_patient, event, &payload);

            tracing::debug!(lookup_url = %lookup_url, "Sending clinical document request");
            self.gateway
                .send_ccda(&ctx, &lookup_url, &integration_url, &params)
                .await?;
            log_dispatch!(DispatchKind::Ccda, &ctx, &integration_url);
            dispatches.push(DispatchKind::Ccda);
        }

        if event_name.as_deref() == Some(fields::event_name::REFER_PATIENT) {
            let referral_url = urls::referral_url(&self.urls.cih_referral, event);
            for key in [
                fields::CLINICIAN_ID,
                fields::ORGANIZATION_ACCESS_CODE,
                fields::ORGANIZATION_LOGIN,
                fields::ORGANIZATION_PASSWORD,
                fields::ORGANIZATION_SECRET_CODE,
            ] {
                put(&mut params, key, event.get_string(key));
            }
            let lookup_url = urls::contact_info_url(&self.urls.consumer_contact_info, event);

            self.gateway
                .send_person_contact_info(&ctx, &lookup_url, &referral_url, &params)
                .await?;
            log_dispatch!(DispatchKind::PersonContactInfo, &ctx, &referral_url);
            dispatches.push(DispatchKind::PersonContactInfo);
        }

        if is_type(fields::event_type::GNRINT) {
            self.route_generic(&ctx, event, params).await?;
            dispatches.push(DispatchKind::Message);
        }

        if dispatches.is_empty() {
            tracing::debug!(
                event_type = event_type.as_deref().unwrap_or_default(),
                "No branch matched event"
            );
        }

        Ok(RouteOutcome::Dispatched { dispatches })
    }

    /// Patient identifier type configured for the organization
    async fn configuration_value(
        &self,
        ctx: &RequestContext,
        organization_id: i64,
    ) -> Option<String> {
        match self
            .lookup
            .get_configuration_value(
                ctx,
                CONFIG_SECTION,
                CONFIG_SUBSECTION,
                urls::DESCRIPTOR_TYPE_ID_NUMBER,
                organization_id,
            )
            .await
        {
            Ok(value) => value,
            Err(e) => {
                log_lookup_degraded!(&e, ctx, "configurationValue omitted");
                None
            }
        }
    }
}

/// Store a string read, or `null` when absent
fn put(params: &mut RequestParams, key: &str, value: Option<String>) {
    params.insert(
        key.to_string(),
        value.map(Value::String).unwrap_or(Value::Null),
    );
}


#[cfg(test)]
mod tests {
    use super::tests_support::*;
    use super::*;
    use crate::adapters::memory::{RecordingGateway, StaticConfigurationLookup};
    use crate::domain::EndpointKey;
    use serde_json::json;

    #[tokio::test]
    async fn test_rejects_event_without_identifiers() {
        let gateway = Arc::new(RecordingGateway::new());
        let lookup = Arc::new(StaticConfigurationLookup::new());
        let router = test_router(gateway.clone(), lookup.clone());

        let outcome = router
            .route(
                &event(json!({"type": "ADT", "patientId": "", "organizationId": 3})),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        assert!(outcome.is_rejected());
        assert!(gateway.calls().is_empty());
        assert!(lookup.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_document_id_alone_is_valid() {
        let gateway = Arc::new(RecordingGateway::new());
        let router = test_router(gateway.clone(), Arc::new(StaticConfigurationLookup::new()));

        let outcome = router
            .route(&event(json!({"documentId": "55"})), &BTreeMap::new())
            .await
            .unwrap();

        assert_eq!(outcome, RouteOutcome::Dispatched { dispatches: vec![] });
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_adt_params_and_descriptor() {
        let gateway = Arc::new(RecordingGateway::new());
        let lookup = Arc::new(StaticConfigurationLookup::new().with_value(
            9,
            urls::DESCRIPTOR_TYPE_ID_NUMBER,
            "MRN",
        ));
        let router = test_router(gateway.clone(), lookup);

        let outcome = router
            .route(
                &event(json!({
                    "patientId": "P1",
                    "type": "ADT",
                    "organizationId": "9",
                    "appointmentStatus": "ARRIVED"
                })),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.dispatches(), &[DispatchKind::Patient]);
        let calls = gateway.calls_to(EndpointKey::CihSendPatient);
        let call = &calls[0];
        assert_eq!(call.body[fields::PATIENT_ID], "P1");
        assert_eq!(call.body[fields::CONFIGURATION_VALUE], "MRN");
        assert_eq!(call.body[fields::APPOINTMENT_STATUS], "ARRIVED");
        let lookup_url = call.lookup_url.as_deref().unwrap();
        assert!(lookup_url.starts_with("http://svc.local/consumer/patient?"));
        assert!(lookup_url.contains("descriptorName=MRN"));
    }

    #[tokio::test]
    async fn test_ccda_and_referral_share_params() {
        let gateway = Arc::new(RecordingGateway::new());
        let router = test_router(gateway.clone(), Arc::new(StaticConfigurationLookup::new()));

        let outcome = router
            .route(
                &event(json!({
                    "patientId": "P2",
                    "type": "CCDA",
                    "event": "REFER_PATIENT",
                    "exclusions": "{\"exclusionsArray\": []}",
                    "clinicianId": "C7"
                })),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome.dispatches(),
            &[DispatchKind::Ccda, DispatchKind::PersonContactInfo]
        );

        let ccda_calls = gateway.calls_to(EndpointKey::CihSendCcda);
        let ccda = &ccda_calls[0];
        assert_eq!(ccda.body[fields::EXCLUSIONS], "{\"exclusionsArray\": []}");
        assert_eq!(ccda.body[fields::EVENT], "REFER_PATIENT");
        assert!(!ccda.body.contains_key(fields::CLINICIAN_ID));

        let referral_calls = gateway.calls_to(EndpointKey::CihSendContactInfo);
        let referral = &referral_calls[0];
        assert!(referral.url.starts_with("http://svc.local/cih/referral?entity"));
        assert_eq!(
            referral.lookup_url.as_deref(),
            Some("http://svc.local/consumer/contact?patientId=P2")
        );
        assert_eq!(referral.body[fields::CLINICIAN_ID], "C7");
        assert_eq!(referral.body[fields::ORGANIZATION_LOGIN], Value::Null);
        assert_eq!(referral.body[fields::EVENT], "REFER_PATIENT");
    }

    #[tokio::test]
    async fn test_configuration_failure_degrades() {
        let gateway = Arc::new(RecordingGateway::new());
        let lookup = Arc::new(StaticConfigurationLookup::new().failing());
        let router = test_router(gateway.clone(), lookup);

        let outcome = router
            .route(
                &event(json!({"patientId": "P3", "type": "ADT", "organizationId": 4})),
                &BTreeMap::new(),
            )
            .await
            .unwrap();

        assert!(outcome.is_dispatched());
        let calls = gateway.calls();
        let call = &calls[0];
        assert!(!call.body.contains_key(fields::CONFIGURATION_VALUE));
        assert!(call.lookup_url.as_deref().unwrap().contains("&descriptorName&"));
    }

    #[tokio::test]
    async fn test_dispatch_failure_surfaces() {
        let gateway = Arc::new(RecordingGateway::new().failing_on(EndpointKey::CihSendPatient));
        let router = test_router(gateway.clone(), Arc::new(StaticConfigurationLookup::new()));
        let e = event(json!({"patientId": "P4", "type": "ADT"}));

        let result = router.route(&e, &BTreeMap::new()).await;
        assert!(matches!(result, Err(RouterError::Downstream(_))));

        let outcome = router.on_message(&e, &BTreeMap::new()).await;
        assert!(outcome.is_failed());
    }
}
