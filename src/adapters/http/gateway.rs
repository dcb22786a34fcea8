//! HTTP implementation of [`CihGateway`]

use super::client::HttpClient;
use crate::adapters::traits::{CihGateway, DownstreamResult};
use crate::domain::errors::DownstreamError;
use crate::domain::{EndpointKey, RequestContext, RequestParams};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Gateway talking to the consumer and integration services over HTTP
///
/// The `send_*` operations fetch the patient record from the lookup URL,
/// lay the routed params over it and post the result to the integration URL.
#[derive(Clone)]
pub struct HttpCihGateway {
    client: HttpClient,
}

impl HttpCihGateway {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    async fn forward(
        &self,
        lookup: EndpointKey,
        send: EndpointKey,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()> {
        let text = self.client.get(lookup, ctx, lookup_url).await?;
        let record = parse_record(lookup, &text)?;
        let body = merge_under(record, params);

        self.client
            .post_json(send, ctx, integration_url, &Value::Object(body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CihGateway for HttpCihGateway {
    async fn send_patient(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()> {
        self.forward(
            EndpointKey::ConsumerGetPatient,
            EndpointKey::CihSendPatient,
            ctx,
            lookup_url,
            integration_url,
            params,
        )
        .await
    }

    async fn send_ccda(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()> {
        self.forward(
            EndpointKey::ConsumerGetPatient,
            EndpointKey::CihSendCcda,
            ctx,
            lookup_url,
            integration_url,
            params,
        )
        .await
    }

    async fn send_person_contact_info(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        integration_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<()> {
        self.forward(
            EndpointKey::ConsumerGetContactInfo,
            EndpointKey::CihSendContactInfo,
            ctx,
            lookup_url,
            integration_url,
            params,
        )
        .await
    }

    async fn send_message(
        &self,
        ctx: &RequestContext,
        integration_url: &str,
        request: &RequestParams,
    ) -> DownstreamResult<()> {
        self.client
            .post_json(
                EndpointKey::CihSendMessage,
                ctx,
                integration_url,
                &Value::Object(request.clone()),
            )
            .await?;
        Ok(())
    }

    async fn get_patient_info(
        &self,
        ctx: &RequestContext,
        lookup_url: &str,
        params: &RequestParams,
    ) -> DownstreamResult<Map<String, Value>> {
        let text = self
            .client
            .post_json(
                EndpointKey::ConsumerGetPatient,
                ctx,
                lookup_url,
                &Value::Object(params.clone()),
            )
            .await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(info)) => Ok(info),
            _ => {
                tracing::debug!(
                    correlation_id = ctx.correlation_id(),
                    "Patient info response is not an object, using empty info"
                );
                Ok(Map::new())
            }
        }
    }
}

/// Parse a fetched record; an empty body is an empty record
fn parse_record(endpoint: EndpointKey, text: &str) -> DownstreamResult<Map<String, Value>> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(DownstreamError::InvalidResponse {
            endpoint,
            message: "record is not a JSON object".to_string(),
        }),
        Err(e) => Err(DownstreamError::InvalidResponse {
            endpoint,
            message: e.to_string(),
        }),
    }
}

/// Overlay `params` on `record`; routed params win
fn merge_under(mut record: Map<String, Value>, params: &RequestParams) -> Map<String, Value> {
    for (key, value) in params {
        record.insert(key.clone(), value.clone());
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_prefers_params() {
        let record = json!({"patientId": "from-record", "firstName": "Ada"});
        let params = json!({"patientId": "P1", "appointmentStatus": null});
        let (Value::Object(record), Value::Object(params)) = (record, params) else {
            unreachable!()
        };

        let merged = merge_under(record, &params);
        assert_eq!(merged["patientId"], "P1");
        assert_eq!(merged["firstName"], "Ada");
        assert_eq!(merged["appointmentStatus"], Value::Null);
    }

    #[test]
    fn test_parse_record() {
        let endpoint = EndpointKey::ConsumerGetPatient;
        assert!(parse_record(endpoint, "").unwrap().is_empty());
        assert_eq!(parse_record(endpoint, r#"{"a": 1}"#).unwrap()["a"], 1);
        assert!(matches!(
            parse_record(endpoint, "[1]"),
            Err(DownstreamError::InvalidResponse { .. })
        ));
        assert!(parse_record(endpoint, "oops").is_err());
    }
}
