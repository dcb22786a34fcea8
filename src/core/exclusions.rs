//! Request date, extraction window and exclusion enrichment
//!
//! Applied to generic integration requests before dispatch:
//!
//! - `requestDate` is always today.
//! - `ccdaBeginDate`/`ccdaEndDate` span the last `extractPeriodGeneric` months,
//!   and are only set when that field reads as an integer.
//! - `hasExclusions`/`exclusions` come from the `exclusions` JSON text, and are
//!   only touched when that text is non-empty.

use super::codec::decode;
use crate::domain::event::LooseRead;
use crate::domain::fields;
use crate::domain::RequestParams;
use chrono::{Local, Months, NaiveDate};
use serde_json::Value;

/// Enrich `params` from `source` using today's local date
pub fn enrich<R: LooseRead + ?Sized>(params: RequestParams, source: &R) -> RequestParams {
    enrich_on(params, source, Local::now().date_naive())
}

/// Enrich `params` from `source` as of `today`
pub fn enrich_on<R: LooseRead + ?Sized>(
    mut params: RequestParams,
    source: &R,
    today: NaiveDate,
) -> RequestParams {
    let today_iso = iso_date(today);
    params.insert(
        fields::REQUEST_DATE.to_string(),
        Value::String(today_iso.clone()),
    );

    if let Some(months) = source.get_integer(fields::EXTRACT_PERIOD_GENERIC) {
        match months_before(today, months) {
            Some(begin) => {
                params.insert(
                    fields::CCDA_BEGIN_DATE.to_string(),
                    Value::String(iso_date(begin)),
                );
                params.insert(fields::CCDA_END_DATE.to_string(), Value::String(today_iso));
            }
            None => {
                tracing::warn!(months, "Extraction period out of calendar range, ignoring it");
            }
        }
    }

    if let Some(exclusions) = source.get_non_empty(fields::EXCLUSIONS) {
        tracing::debug!(exclusions = %exclusions, "Resolving exclusions");

        match decode(Some(&exclusions)).filter(|decoded| !decoded.is_empty()) {
            Some(mut decoded) => {
                params.insert(fields::HAS_EXCLUSIONS.to_string(), Value::Bool(true));
                let list = decoded
                    .remove(fields::EXCLUSIONS_ARRAY)
                    .unwrap_or(Value::Null);
                params.insert(fields::EXCLUSIONS.to_string(), list);
            }
            None => {
                params.insert(fields::HAS_EXCLUSIONS.to_string(), Value::Bool(false));
            }
        }
    }

    params
}

/// `today` minus `months`; a negative count moves forward
fn months_before(today: NaiveDate, months: i32) -> Option<NaiveDate> {
    let span = Months::new(months.unsigned_abs());
    if months >= 0 {
        today.checked_sub_months(span)
    } else {
        today.checked_add_months(span)
    }
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatientEvent;
    use serde_json::json;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn source(value: Value) -> PatientEvent {
        PatientEvent::try_from(value).unwrap()
    }

    #[test]
    fn test_request_date_always_set() {
        let params = enrich_on(RequestParams::new(), &source(json!({})), date(2024, 4, 15));
        assert_eq!(params[fields::REQUEST_DATE], "2024-04-15");
        assert!(!params.contains_key(fields::CCDA_BEGIN_DATE));
        assert!(!params.contains_key(fields::CCDA_END_DATE));
        assert!(!params.contains_key(fields::HAS_EXCLUSIONS));
        assert!(!params.contains_key(fields::EXCLUSIONS));
    }

    #[test]
    fn test_extraction_window() {
        let params = enrich_on(
            RequestParams::new(),
            &source(json!({"extractPeriodGeneric": 3})),
            date(2024, 4, 15),
        );
        assert_eq!(params[fields::CCDA_BEGIN_DATE], "2024-01-15");
        assert_eq!(params[fields::CCDA_END_DATE], "2024-04-15");
    }

    #[test_case(json!("6"), date(2024, 4, 15), "2023-10-15" ; "numeric string")]
    #[test_case(json!(1), date(2024, 3, 31), "2024-02-29" ; "clamped to month end")]
    #[test_case(json!(3.0), date(2024, 4, 15), "2024-01-15" ; "integral float")]
    #[test_case(json!(0), date(2024, 4, 15), "2024-04-15" ; "zero months")]
    #[test_case(json!(-2), date(2024, 4, 15), "2024-06-15" ; "negative moves forward")]
    fn test_extraction_window_cases(period: Value, today: NaiveDate, expected_begin: &str) {
        let params = enrich_on(
            RequestParams::new(),
            &source(json!({"extractPeriodGeneric": period})),
            today,
        );
        assert_eq!(params[fields::CCDA_BEGIN_DATE], expected_begin);
    }

    #[test]
    fn test_non_numeric_extraction_period() {
        let params = enrich_on(
            RequestParams::new(),
            &source(json!({"extractPeriodGeneric": "three"})),
            date(2024, 4, 15),
        );
        assert!(!params.contains_key(fields::CCDA_BEGIN_DATE));
        assert!(!params.contains_key(fields::CCDA_END_DATE));
    }

    #[test]
    fn test_exclusions_resolved() {
        let params = enrich_on(
            RequestParams::new(),
            &source(json!({"exclusions": "{\"exclusionsArray\":[\"x\",\"y\"]}"})),
            date(2024, 4, 15),
        );
        assert_eq!(params[fields::HAS_EXCLUSIONS], true);
        assert_eq!(params[fields::EXCLUSIONS], json!(["x", "y"]));
    }

    #[test]
    fn test_exclusions_without_array_key() {
        let params = enrich_on(
            RequestParams::new(),
            &source(json!({"exclusions": "{\"other\": 1}"})),
            date(2024, 4, 15),
        );
        assert_eq!(params[fields::HAS_EXCLUSIONS], true);
        assert_eq!(params[fields::EXCLUSIONS], Value::Null);
    }

    #[test]
    fn test_malformed_exclusions_leave_existing_value() {
        let mut existing = RequestParams::new();
        existing.insert(fields::EXCLUSIONS.to_string(), json!("raw"));

        let params = enrich_on(
            existing,
            &source(json!({"exclusions": "{not json"})),
            date(2024, 4, 15),
        );
        assert_eq!(params[fields::HAS_EXCLUSIONS], false);
        assert_eq!(params[fields::EXCLUSIONS], "raw");
    }

    #[test]
    fn test_empty_exclusions_object() {
        let params = enrich_on(
            RequestParams::new(),
            &source(json!({"exclusions": "{}"})),
            date(2024, 4, 15),
        );
        assert_eq!(params[fields::HAS_EXCLUSIONS], false);
        assert!(!params.contains_key(fields::EXCLUSIONS));
    }

    #[test]
    fn test_empty_exclusions_string_untouched() {
        let params = enrich_on(
            RequestParams::new(),
            &source(json!({"exclusions": ""})),
            date(2024, 4, 15),
        );
        assert!(!params.contains_key(fields::HAS_EXCLUSIONS));
    }

    #[test]
    fn test_enrich_uses_today() {
        let params = enrich(RequestParams::new(), &source(json!({})));
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(params[fields::REQUEST_DATE], today.as_str());
    }
}
