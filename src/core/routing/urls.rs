//! Outbound URL composition
//!
//! Each builder emits its parameters in a fixed order. Absent values are
//! kept as bare keys (see [`QueryUrlBuilder`]).

use crate::config::EndpointsConfig;
use crate::domain::event::LooseRead;
use crate::domain::{fields, PatientEvent, QueryUrlBuilder, RequestParams, Result, RouterError};
use url::Url;

/// Descriptor type sent with every patient lookup
pub const DESCRIPTOR_TYPE_ID_NUMBER: &str = "ID Number Type";

/// Parsed base URLs of every collaborator endpoint
#[derive(Debug, Clone)]
pub struct EndpointUrls {
    pub cih_integration: Url,
    pub cih_referral: Url,
    pub consumer_patient: Url,
    pub consumer_patient_cans: Url,
    pub consumer_contact_info: Url,
}

impl EndpointUrls {
    /// Parse the routing endpoints out of configuration
    pub fn from_config(config: &EndpointsConfig) -> Result<Self> {
        Ok(Self {
            cih_integration: parse("cih_integration_url", &config.cih_integration_url)?,
            cih_referral: parse("cih_referral_url", &config.cih_referral_url)?,
            consumer_patient: parse("consumer_patient_url", &config.consumer_patient_url)?,
            consumer_patient_cans: parse(
                "consumer_patient_cans_url",
                &config.consumer_patient_cans_url,
            )?,
            consumer_contact_info: parse(
                "consumer_contact_info_url",
                &config.consumer_contact_info_url,
            )?,
        })
    }
}

fn parse(name: &str, value: &str) -> Result<Url> {
    Url::parse(value)
        .map_err(|e| RouterError::Configuration(format!("endpoints.{name} is invalid: {e}")))
}

/// Integration URL carrying the event identity and sub-payload program keys
///
/// Returned as a builder so the generic branch can append `measureName`.
pub fn integration_url<P: LooseRead + ?Sized>(
    base: &Url,
    event: &PatientEvent,
    payload: &P,
) -> QueryUrlBuilder {
    QueryUrlBuilder::new(base)
        .param(fields::ENTITY, event.get_string(fields::ENTITY))
        .param(fields::OPERATION, event.get_string(fields::OPERATION))
        .param(fields::EVENT, event.event_name())
        .param(fields::TYPE, event.event_type())
        .param(fields::ORGANIZATION, event.get_string(fields::ORGANIZATION))
        .param(fields::CLIENT_PROGRAM_ID, payload.get_string(fields::CLIENT_PROGRAM_ID))
        .param(fields::ACTIVITY_DETAIL_ID, payload.get_string(fields::ACTIVITY_DETAIL_ID))
        .param(fields::ACTIVITY_LOG_ID, payload.get_string(fields::ACTIVITY_LOG_ID))
        .param(fields::CLIENT_EPISODE_ID, payload.get_string(fields::CLIENT_EPISODE_ID))
        .param(fields::PROGRAM_ID, payload.get_string(fields::PROGRAM_ID))
        .param(fields::PROGRAM_NAME, payload.get_string(fields::PROGRAM_NAME))
}

/// Referral URL, identity keys only
pub fn referral_url(base: &Url, event: &PatientEvent) -> String {
    QueryUrlBuilder::new(base)
        .param(fields::ENTITY, event.get_string(fields::ENTITY))
        .param(fields::OPERATION, event.get_string(fields::OPERATION))
        .param(fields::EVENT, event.event_name())
        .param(fields::TYPE, event.event_type())
        .param(fields::ORGANIZATION, event.get_string(fields::ORGANIZATION))
        .build()
}

/// Patient lookup for an ADT message
pub fn adt_lookup_url<P: LooseRead + ?Sized>(
    base: &Url,
    event: &PatientEvent,
    payload: &P,
    params: &RequestParams,
) -> String {
    QueryUrlBuilder::new(base)
        .param(fields::CLIENT_PROGRAM_ID, event.get_string(fields::CLIENT_PROGRAM_ID))
        .param(fields::APPOINTMENT_ID, event.get_string(fields::APPOINTMENT_ID))
        .param(fields::ORGANIZATION_ID, event.get_string(fields::ORGANIZATION_ID))
        .param(fields::EXTRACT_PERIOD, event.get_string(fields::EXTRACT_PERIOD))
        .param(
            fields::CLIENT_PROGRAM_BEGIN_DATE,
            event.get_string(fields::CLIENT_PROGRAM_BEGIN_DATE),
        )
        .param(fields::DISCHARGE_DATE, event.get_string(fields::DISCHARGE_DATE))
        .param(fields::EVENT, event.event_name())
        .param(
            fields::DIAGNOSIS_DOCUMENT_ID,
            event.get_string(fields::DIAGNOSIS_DOCUMENT_ID),
        )
        .param(fields::STAFF_ID, event.get_string(fields::STAFF_ID))
        .param(fields::CLIENT_EPISODE_ID, payload.get_string(fields::CLIENT_EPISODE_ID))
        .param(fields::ACTIVITY_ID, payload.get_string(fields::ACTIVITY_ID))
        .param(
            fields::APPT_ORGANIZATION_ID,
            payload.get_string(fields::APPT_ORGANIZATION_ID),
        )
        .param(
            fields::DESCRIPTOR_NAME,
            params.get_string(fields::CONFIGURATION_VALUE),
        )
        .param(fields::DESCRIPTOR_TYPE, Some(DESCRIPTOR_TYPE_ID_NUMBER))
        .param(
            fields::MOD_CONSENT_CONFIG_ID,
            event.get_long(fields::MOD_CONSENT_CONFIG_ID),
        )
        .param(
            fields::DISCHARGE_DISPOSITION_ID,
            payload.get_long(fields::DISCHARGE_DISPOSITION_ID),
        )
        .param(
            fields::DISCHARGE_LOCATION_ID,
            payload.get_long(fields::DISCHARGE_LOCATION_ID),
        )
        .build()
}

/// Patient lookup for a clinical document request
pub fn ccda_lookup_url<P: LooseRead + ?Sized>(
    base: &Url,
    event: &PatientEvent,
    payload: &P,
) -> String {
    QueryUrlBuilder::new(base)
        .param(fields::CLIENT_PROGRAM_ID, event.get_string(fields::CLIENT_PROGRAM_ID))
        .param(fields::APPOINTMENT_ID, event.get_string(fields::APPOINTMENT_ID))
        .param(fields::ORGANIZATION_ID, event.get_string(fields::ORGANIZATION_ID))
        .param(fields::EXTRACT_PERIOD, event.get_string(fields::EXTRACT_PERIOD))
        .param(
            fields::CLIENT_PROGRAM_BEGIN_DATE,
            event.get_string(fields::CLIENT_PROGRAM_BEGIN_DATE),
        )
        .param(fields::DISCHARGE_DATE, event.get_string(fields::DISCHARGE_DATE))
        .param(fields::STAFF_ID, event.get_string(fields::STAFF_ID))
        .param(fields::CLIENT_EPISODE_ID, payload.get_string(fields::CLIENT_EPISODE_ID))
        .param(fields::ACTIVITY_ID, payload.get_string(fields::ACTIVITY_ID))
        .param(
            fields::APPT_ORGANIZATION_ID,
            payload.get_string(fields::APPT_ORGANIZATION_ID),
        )
        .param(
            fields::MOD_CONSENT_CONFIG_ID,
            event.get_long(fields::MOD_CONSENT_CONFIG_ID),
        )
        .param(
            fields::DISCHARGE_DISPOSITION_ID,
            payload.get_long(fields::DISCHARGE_DISPOSITION_ID),
        )
        .param(
            fields::DISCHARGE_LOCATION_ID,
            payload.get_long(fields::DISCHARGE_LOCATION_ID),
        )
        .build()
}

/// Contact information lookup for a referral
pub fn contact_info_url(base: &Url, event: &PatientEvent) -> String {
    QueryUrlBuilder::new(base)
        .param(fields::PATIENT_ID, event.patient_id())
        .build()
}

/// Assessment (CANS) lookup, keyed by document only
pub fn cans_lookup_url(base: &Url, event: &PatientEvent) -> String {
    QueryUrlBuilder::new(base)
        .param(fields::DOCUMENT_ID, event.get_string(fields::DOCUMENT_ID))
        .build()
}

/// Patient lookup for a generic integration message
///
/// `appointmentId` falls back to the sub-payload `activityLogId`.
pub fn generic_lookup_url<P: LooseRead + ?Sized>(
    base: &Url,
    event: &PatientEvent,
    payload: &P,
    params: &RequestParams,
) -> String {
    let appointment_id = event
        .get_non_empty(fields::APPOINTMENT_ID)
        .or_else(|| payload.get_string(fields::ACTIVITY_LOG_ID));

    QueryUrlBuilder::new(base)
        .param(fields::CLIENT_PROGRAM_ID, event.get_string(fields::CLIENT_PROGRAM_ID))
        .param(fields::APPOINTMENT_ID, appointment_id)
        .param(fields::ORGANIZATION_ID, event.get_string(fields::ORGANIZATION_ID))
        .param(fields::EXTRACT_PERIOD, event.get_string(fields::EXTRACT_PERIOD))
        .param(
            fields::CLIENT_PROGRAM_BEGIN_DATE,
            event.get_string(fields::CLIENT_PROGRAM_BEGIN_DATE),
        )
        .param(fields::DISCHARGE_DATE, event.get_string(fields::DISCHARGE_DATE))
        .param(fields::STAFF_ID, event.get_string(fields::STAFF_ID))
        .param(fields::CLIENT_EPISODE_ID, payload.get_long(fields::CLIENT_EPISODE_ID))
        .param(fields::ACTIVITY_ID, payload.get_long(fields::ACTIVITY_ID))
        .param(
            fields::APPT_ORGANIZATION_ID,
            payload.get_long(fields::APPT_ORGANIZATION_ID),
        )
        .param(fields::DOCUMENT_ID, event.get_string(fields::DOCUMENT_ID))
        .param(
            fields::DESCRIPTOR_NAME,
            params.get_string(fields::CONFIGURATION_VALUE),
        )
        .param(fields::DESCRIPTOR_TYPE, Some(DESCRIPTOR_TYPE_ID_NUMBER))
        .param(
            fields::MOD_CONSENT_CONFIG_ID,
            event.get_string(fields::MOD_CONSENT_CONFIG_ID),
        )
        .param(
            fields::DISCHARGE_DISPOSITION_ID,
            payload.get_long(fields::DISCHARGE_DISPOSITION_ID),
        )
        .param(
            fields::DISCHARGE_LOCATION_ID,
            payload.get_long(fields::DISCHARGE_LOCATION_ID),
        )
        .build()
}

/// Query keys of `url`, in order
#[cfg(test)]
pub(crate) fn query_keys(url: &str) -> Vec<String> {
    Url::parse(url)
        .map(|u| u.query_pairs().map(|(k, _)| k.into_owned()).collect())
        .unwrap_or_default()
}
