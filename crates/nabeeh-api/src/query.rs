//! Query string parameters shared by the analytics endpoints.

use crate::handlers::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use nabeeh_domain::{IncidentFilter, Severity};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `Query` extractor whose rejections use the JSON error body
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// Window and predicate parameters
///
/// Analytics endpoints need both `from` and `to`; `/api/ports` without
/// either returns the port reference table instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowParams {
    /// Window start, inclusive
    pub from: Option<String>,

    /// Window end, inclusive
    pub to: Option<String>,

    /// Exact violation type
    #[serde(rename = "violationType")]
    pub violation_type: Option<String>,

    /// `LOW`, `MEDIUM` or `HIGH`, case-insensitive
    pub severity: Option<String>,

    /// Port scope
    pub port_id: Option<String>,

    /// Result size for list endpoints
    pub limit: Option<usize>,
}

impl WindowParams {
    /// Build a validated filter
    ///
    /// Rejects unparseable timestamps, unknown severities and inverted
    /// windows before any analytics run.
    pub fn to_filter(&self) -> Result<IncidentFilter, AppError> {
        let from = self
            .from
            .as_deref()
            .ok_or(AppError::MissingParameter("from"))?;
        let to = self.to.as_deref().ok_or(AppError::MissingParameter("to"))?;

        let start =
            parse_timestamp(from).ok_or_else(|| AppError::InvalidDate(from.to_string()))?;
        let end = parse_timestamp(to).ok_or_else(|| AppError::InvalidDate(to.to_string()))?;

        let mut filter = IncidentFilter::between(start, end);
        if let Some(port_id) = &self.port_id {
            filter = filter.with_port(port_id.as_str());
        }
        if let Some(violation_type) = &self.violation_type {
            filter = filter.with_violation_type(violation_type.as_str());
        }
        if let Some(raw) = &self.severity {
            let severity =
                Severity::parse(raw).ok_or_else(|| AppError::InvalidSeverity(raw.clone()))?;
            filter = filter.with_severity(severity);
        }

        nabeeh_analytics::check_range(&filter)?;
        Ok(filter)
    }

    /// Whether either window bound was supplied
    pub fn has_window(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// The `port_id` parameter, required by port-scoped endpoints
    pub fn required_port(&self) -> Result<&str, AppError> {
        self.port_id
            .as_deref()
            .ok_or(AppError::MissingParameter("port_id"))
    }
}

/// Parse an RFC 3339 timestamp, a naive date-time, or a bare date
///
/// Naive values are read as UTC; a bare date means midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(from: &str, to: &str) -> WindowParams {
        WindowParams {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            ..WindowParams::default()
        }
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let midnight = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2026-10-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2026-10-01T03:00:00+03:00"), Some(midnight));
        assert_eq!(parse_timestamp("2026-10-01T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2026-10-01T00:00:00.000"), Some(midnight));
        assert_eq!(parse_timestamp("2026-10-01"), Some(midnight));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2026-13-01"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_to_filter() {
        let mut query = params("2026-10-01", "2026-10-31T23:59:59Z");
        query.port_id = Some("port_01".to_string());
        query.violation_type = Some("smoking".to_string());
        query.severity = Some("high".to_string());

        let filter = query.to_filter().unwrap();
        assert_eq!(filter.port_id.as_deref(), Some("port_01"));
        assert_eq!(filter.violation_type.as_deref(), Some("smoking"));
        assert_eq!(filter.severity, Some(Severity::High));
        assert!(filter.is_well_formed());
    }

    #[test]
    fn test_to_filter_errors() {
        assert!(matches!(
            params("nope", "2026-10-31").to_filter(),
            Err(AppError::InvalidDate(raw)) if raw == "nope"
        ));
        assert!(matches!(
            params("2026-10-31", "2026-10-01").to_filter(),
            Err(AppError::Analytics(_))
        ));

        let mut query = params("2026-10-01", "2026-10-31");
        query.severity = Some("CRITICAL".to_string());
        assert!(matches!(query.to_filter(), Err(AppError::InvalidSeverity(_))));
    }

    #[test]
    fn test_window_bounds_required() {
        let empty = WindowParams::default();
        assert!(!empty.has_window());
        assert!(matches!(
            empty.to_filter(),
            Err(AppError::MissingParameter("from"))
        ));

        let half = WindowParams {
            from: Some("2026-10-01".to_string()),
            ..WindowParams::default()
        };
        assert!(half.has_window());
        assert!(matches!(
            half.to_filter(),
            Err(AppError::MissingParameter("to"))
        ));
    }

    #[test]
    fn test_required_port() {
        let mut query = params("2026-10-01", "2026-10-31");
        assert!(matches!(
            query.required_port(),
            Err(AppError::MissingParameter("port_id"))
        ));
        query.port_id = Some("port_02".to_string());
        assert_eq!(query.required_port().unwrap(), "port_02");
    }
}
