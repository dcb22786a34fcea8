//! HTTP implementation of [`ConfigurationLookup`]

use super::client::HttpClient;
use crate::adapters::traits::{ConfigurationLookup, DownstreamResult};
use crate::config::EndpointsConfig;
use crate::domain::errors::DownstreamError;
use crate::domain::event::loose_string;
use crate::domain::{
    fields, EndpointKey, Organization, QueryUrlBuilder, RequestContext, Result, RouterError,
};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// Key of the envelope the configuration service wraps answers in
const RESPONSE_KEY: &str = "response";

/// Configuration service client
#[derive(Clone)]
pub struct HttpConfigurationLookup {
    client: HttpClient,
    value_url: Url,
    organization_url: Url,
}

impl HttpConfigurationLookup {
    pub fn new(client: HttpClient, endpoints: &EndpointsConfig) -> Result<Self> {
        let parse = |name: &str, value: &str| {
            Url::parse(value).map_err(|e| {
                RouterError::Configuration(format!("endpoints.{name} is invalid: {e}"))
            })
        };

        Ok(Self {
            client,
            value_url: parse("configuration_value_url", &endpoints.configuration_value_url)?,
            organization_url: parse(
                "configuration_organization_url",
                &endpoints.configuration_organization_url,
            )?,
        })
    }
}

#[async_trait]
impl ConfigurationLookup for HttpConfigurationLookup {
    async fn get_configuration_value(
        &self,
        ctx: &RequestContext,
        section: &str,
        subsection: &str,
        name: &str,
        organization_id: i64,
    ) -> DownstreamResult<Option<String>> {
        let url = QueryUrlBuilder::new(&self.value_url)
            .param("section", Some(section))
            .param("subsection", Some(subsection))
            .param("name", Some(name))
            .param(fields::ORGANIZATION_ID, Some(organization_id))
            .build();

        let body = self
            .client
            .get_optional(EndpointKey::ConfigurationGetValue, ctx, &url)
            .await?;

        Ok(body.and_then(|text| parse_configuration_value(&text)))
    }

    async fn get_organization_genealogy(
        &self,
        ctx: &RequestContext,
        organization_id: i64,
    ) -> DownstreamResult<Option<Organization>> {
        let endpoint = EndpointKey::ConfigurationGetOrganization;
        let url = QueryUrlBuilder::new(&self.organization_url)
            .param(fields::ORGANIZATION_ID, Some(organization_id))
            .build();

        let Some(text) = self.client.get_optional(endpoint, ctx, &url).await? else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|e| DownstreamError::InvalidResponse {
                endpoint,
                message: e.to_string(),
            })?;

        let organization = match value {
            Value::Null => return Ok(None),
            Value::Object(mut map) if map.contains_key(RESPONSE_KEY) => {
                map.remove(RESPONSE_KEY).unwrap_or(Value::Null)
            }
            other => other,
        };
        if organization.is_null() {
            return Ok(None);
        }

        serde_json::from_value(organization)
            .map(Some)
            .map_err(|e| DownstreamError::InvalidResponse {
                endpoint,
                message: e.to_string(),
            })
    }
}

/// Extract a configuration value from a response body
///
/// Accepts a `{"response": ...}` envelope, a bare JSON value or plain text.
fn parse_configuration_value(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => map.get(RESPONSE_KEY).and_then(loose_string),
        Ok(value) => loose_string(&value),
        Err(_) => Some(trimmed.to_string()),
    };
    value.filter(|value| !value.is_empty())
}
