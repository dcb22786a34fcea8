//! In-memory facade implementations
//!
//! [`RecordingGateway`] records every outbound call instead of sending it.
//! The CLI uses it for `--dry-run`, where reads can still be passed through
//! to a live gateway, and tests use it as a scripted double.
//! [`StaticConfigurationLookup`] answers lookups from fixed tables.

use super::traits::{CihGateway, ConfigurationLookup, DownstreamResult};
use crate::domain::errors::DownstreamError;
use crate::domain::{EndpointKey, Organization, RequestContext, RequestParams};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn injected_failure(endpoint: EndpointKey) -> DownstreamError {
    DownstreamError::ServerError {
        endpoint,
        status: 503,
        message: "injected failure".to_string(),
    }
}

/// One call captured by [`RecordingGateway`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Operation that was invoked
    pub endpoint: EndpointKey,

    /// Lookup URL passed alongside the target, for the `send_*` operations
    pub lookup_url: Option<String>,

    /// Target URL of the call
    pub url: String,

    /// Body that would have been sent
    pub body: RequestParams,

    /// Context headers at the time of the call
    pub headers: BTreeMap<String, String>,
}

/// Gateway that records calls instead of sending them
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<RecordedCall>>,
    patient_info: Map<String, Value>,
    failing: HashSet<EndpointKey>,
    reads: Option<Arc<dyn CihGateway>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `get_patient_info` from a live gateway instead of the fixed map
    pub fn with_reads_from(mut self, inner: Arc<dyn CihGateway>) -> Self {
        self.reads = Some(inner);
        self
    }

    /// Fixed answer for `get_patient_info`
    pub fn with_patient_info(mut self, info: Map<String, Value>) -> Self {
        self.patient_info = info;
        self
    }

    /// Make every call to `endpoint` fail with a 503
    pub fn failing_on(mut self, endpoint: EndpointKey) -> Self {
        self.failing.insert(endpoint);
        self
    }

    /// Snapshot of the calls recorded so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Calls recorded for one operation
    pub fn calls_to(&self, endpoint: EndpointKey) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .cloned()
            .collect()
    }

    fn record(
        &self,
        endpoint: EndpointKey,
        ctx: &RequestContext,
        lookup_url: Option<&str>,
        url: &str,
        body: &RequestParams,
    ) -> DownstreamResult<()> {
        lock(&self.calls).push(RecordedCall {
            endpoint,
            lookup_url: lookup_url.map(str::to_string),
            url: url.to_string(),
            body: body.clone(),
            headers: ctx.headers().clone(),
        });

        if self.failing.contains(&endpoint) {
            return Err(injected_failure(endpoint));
        }

        tracing::info!(
            endpoint = %endpoint,
            url = %url,
            correlation_id = ctx.correlation_id(),
            "Recorded outbound call"
        );
        Ok(())
    }
}

#[async_trait]
impl CihGateway for RecordingGateway {
    async fn send_patient(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()> {
        self.record(
            EndpointKey::CihSendPatient,
            ctx,
            Some(lookup_url),
            integration_url,
            params,
        )
    }

    async fn send_ccda(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()> {
        self.record(
            EndpointKey::CihSendCcda,
            ctx,
            Some(lookup_url),
            integration_url,
            params,
        )
    }

    async fn send_person_contact_info(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()> {
        self.record(
            EndpointKey::CihSendContactInfo,
            ctx,
            Some(lookup_url),
            integration_url,
            params,
        )
    }

    async fn send_message(
        &self,
        ctx: &RequestContext,
        integration_url: &str,
        request: &RequestParams,
    ) -> DownstreamResult<()> {
        self.record(
            EndpointKey::CihSendMessage,
            ctx,
            None,
            integration_url,
            request,
        )
    }

    async fn get_patient_info(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<Map<String, Value>> {
        self.record(
            EndpointKey::ConsumerGetPatient,
            ctx,
            None,
            lookup_url,
            params,
        )?;

        match &self.reads {
            Some(inner) => inner.get_patient_info(ctx, lookup_url, params).await,
            None => Ok(self.patient_info.clone()),
        }
    }
}

/// Configuration lookup answered from fixed tables
#[derive(Default)]
pub struct StaticConfigurationLookup {
    values: HashMap<(i64, String), String>,
    organizations: HashMap<i64, Organization>,
    failing: bool,
    lookups: Mutex<Vec<(EndpointKey, i64)>>,
}

impl StaticConfigurationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a configuration value for `(organization_id, name)`
    pub fn with_value(
        mut self,
        organization_id: i64,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.values
            .insert((organization_id, name.into()), value.into());
        self
    }

    /// Register an organization, keyed by its own id
    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organizations.insert(organization.id, organization);
        self
    }

    /// Make every lookup fail with a 503
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Lookups performed so far, as `(operation, organization_id)`
    pub fn lookups(&self) -> Vec<(EndpointKey, i64)> {
        lock(&self.lookups).clone()
    }

    fn record(&self, endpoint: EndpointKey, organization_id: i64) -> DownstreamResult<()> {
        lock(&self.lookups).push((endpoint, organization_id));
        if self.failing {
            return Err(injected_failure(endpoint));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigurationLookup for StaticConfigurationLookup {
    async fn get_configuration_value(
        &self,
        _ctx: &RequestContext,
        _section: &str,
        _subsection: &str,
        name: &str,
        organization_id: i64,
    ) -> DownstreamResult<Option<String>> {
        self.record(EndpointKey::ConfigurationGetValue, organization_id)?;
        Ok(self
            .values
            .get(&(organization_id, name.to_string()))
            .cloned())
    }

    async fn get_organization_genealogy(
        &self,
        _ctx: &RequestContext,
        organization_id: i64,
    ) -> DownstreamResult<Option<Organization>> {
        self.record(EndpointKey::ConfigurationGetOrganization, organization_id)?;
        Ok(self.organizations.get(&organization_id).cloned())
    }
}
