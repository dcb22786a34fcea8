//! Facade traits for the router's external collaborators
//!
//! The router never talks to the network directly. It only sees these two
//! traits, which lets the transport (and its timeout and retry policy) be
//! swapped without touching the routing logic.

use crate::domain::errors::DownstreamError;
use crate::domain::{Organization, RequestContext, RequestParams};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Result type for facade operations
pub type DownstreamResult<T> = std::result::Result<T, DownstreamError>;

/// Outbound integration calls
///
/// Every call receives the per-event [`RequestContext`] whose headers must be
/// sent along with the request.
#[async_trait]
pub trait CihGateway: Send + Sync {
    /// Send an appointment/ADT patient message
    ///
    /// # Arguments
    ///
    /// * `lookup_url` - Patient lookup URL with the query parameters already composed
    /// * `integration_url` - Integration endpoint receiving the message
    /// * `params` - Routed attributes sent in the body
    async fn send_patient(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()>;

    /// Send a clinical document (CCDA) request
    async fn send_ccda(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()>;

    /// Send referral contact information
    async fn send_person_contact_info(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()>;

    /// Send a generic integration message
    async fn send_message(
        &self,
        ctx: &RequestContext,
        integration_url: &str,
        request: &RequestParams,
    ) -> DownstreamResult<()>;

    /// Fetch the client/patient information backing a generic message
    async fn get_patient_info(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<Map<String, Value>>;
}

/// Organization-scoped configuration lookups
#[async_trait]
pub trait ConfigurationLookup: Send + Sync {
    /// Look up a named configuration value
    ///
    /// Returns `Ok(None)` when the organization has no such value.
    async fn get_configuration_value(
        &self,
        ctx: &RequestContext,
        section: &str,
        subsection: &str,
        name: &str,
        organization_id: i64,
    ) -> DownstreamResult<Option<String>>;

    /// Fetch an organization with its parent chain
    ///
    /// Returns `Ok(None)` when the organization does not exist.
    async fn get_organization_genealogy(
        &self,
        ctx: &RequestContext,
        organization_id: i64,
    ) -> DownstreamResult<Option<Organization>>;
}
