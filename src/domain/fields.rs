//! Wire field names
//!
//! Keys shared by inbound events, sub-payloads, outbound query strings and
//! request bodies. Producers and downstream services agree on these names,
//! so they are camelCase on the wire.

pub const PATIENT_ID: &str = "patientId";
pub const DOCUMENT_ID: &str = "documentId";
pub const TYPE: &str = "type";
pub const EVENT: &str = "event";
pub const ENTITY: &str = "entity";
pub const OPERATION: &str = "operation";
pub const ORGANIZATION: &str = "organization";
pub const ORGANIZATION_ID: &str = "organizationId";
pub const PAYLOAD: &str = "payload";

pub const CLIENT_PROGRAM_ID: &str = "clientProgramId";
pub const CLIENT_PROGRAM_BEGIN_DATE: &str = "clientProgramBeginDate";
pub const CLIENT_EPISODE_ID: &str = "clientEpisodeId";
pub const APPOINTMENT_ID: &str = "appointmentId";
pub const APPOINTMENT_STATUS: &str = "appointmentStatus";
pub const APPT_ORGANIZATION_ID: &str = "apptOrganizationId";
pub const ACTIVITY_ID: &str = "activityId";
pub const ACTIVITY_DETAIL_ID: &str = "activityDetailId";
pub const ACTIVITY_LOG_ID: &str = "activityLogId";
pub const PROGRAM_ID: &str = "programId";
pub const PROGRAM_NAME: &str = "programName";
pub const DISCHARGE_DATE: &str = "dischargeDate";
pub const DISCHARGE_DISPOSITION_ID: &str = "dischargeDispositionId";
pub const DISCHARGE_LOCATION_ID: &str = "dischargeLocationId";
pub const DIAGNOSIS_DOCUMENT_ID: &str = "diagnosisDocumentId";
pub const STAFF_ID: &str = "staffId";
pub const MOD_CONSENT_CONFIG_ID: &str = "modConsentConfigId";

pub const EXTRACT_PERIOD: &str = "extractPeriod";
pub const EXTRACT_PERIOD_GENERIC: &str = "extractPeriodGeneric";
pub const EXCLUSIONS: &str = "exclusions";
pub const EXCLUSIONS_ARRAY: &str = "exclusionsArray";
pub const HAS_EXCLUSIONS: &str = "hasExclusions";
pub const REQUEST_DATE: &str = "requestDate";
pub const CCDA_BEGIN_DATE: &str = "ccdaBeginDate";
pub const CCDA_END_DATE: &str = "ccdaEndDate";

pub const CONFIGURATION_VALUE: &str = "configurationValue";
pub const DESCRIPTOR_NAME: &str = "descriptorName";
pub const DESCRIPTOR_TYPE: &str = "descriptorType";
pub const GENEALOGY_ORGANIZATION: &str = "genealogyOrganization";
pub const MEASURE_NAME: &str = "measureName";

pub const REVOKE_CONSENT: &str = "revokeConsent";
pub const REVOKE_SENSITIVE_CONSENT: &str = "revokeSensitiveConsent";

pub const CLINICIAN_ID: &str = "clinicianId";
pub const ORGANIZATION_ACCESS_CODE: &str = "organizationAccessCode";
pub const ORGANIZATION_LOGIN: &str = "organizationLogin";
pub const ORGANIZATION_PASSWORD: &str = "organizationPassword";
pub const ORGANIZATION_SECRET_CODE: &str = "organizationSecretCode";

/// `type` discriminator values
pub mod event_type {
    pub const ADT: &str = "ADT";
    pub const CCDA: &str = "CCDA";
    pub const GNRINT: &str = "GNRINT";
}

/// `event` discriminator values
pub mod event_name {
    pub const SIGN_CANS: &str = "SIGN_CANS";
    pub const REFER_PATIENT: &str = "REFER_PATIENT";
}
