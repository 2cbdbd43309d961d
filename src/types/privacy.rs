use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::date::{format_iso8601, iso8601};
use crate::util::id;

/// A period during which a vehicle's location is not recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Privacy {
    #[serde(default, deserialize_with = "id::lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Privacy {
    /// Started and not yet stopped.
    pub fn is_active(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }
}

/// Filters for listing privacy periods.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use xee::types::PrivacyQuery;
///
/// let query = PrivacyQuery::builder()
///     .from(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
///     .limit(10)
///     .build();
/// assert_eq!(
///     query.to_query(),
///     vec![
///         ("from".to_string(), "2021-01-01T00:00:00.000+00:00".to_string()),
///         ("limit".to_string(), "10".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct PrivacyQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl PrivacyQuery {
    /// Query pairs in `from`, `to`, `limit` order; absent filters are omitted.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = &self.from {
            pairs.push(("from".to_string(), format_iso8601(from)));
        }
        if let Some(to) = &self.to {
            pairs.push(("to".to_string(), format_iso8601(to)));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(PrivacyQuery::default().to_query().is_empty());
    }

    #[test]
    fn full_query_formats_dates() {
        let query = PrivacyQuery::builder()
            .from(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
            .to(Utc.with_ymd_and_hms(2021, 2, 1, 0, 0, 0).unwrap())
            .limit(10)
            .build();
        let pairs = query.to_query();
        assert_eq!(pairs[0].1, "2021-01-01T00:00:00.000+00:00");
        assert_eq!(pairs[1].1, "2021-02-01T00:00:00.000+00:00");
        assert_eq!(pairs[2], ("limit".to_string(), "10".to_string()));
    }

    #[test]
    fn active_privacy_has_no_end() {
        let privacy: Privacy =
            serde_json::from_str(r#"{"id":3,"startedAt":"2021-01-01T00:00:00Z"}"#).unwrap();
        assert!(privacy.is_active());
        assert_eq!(privacy.id.as_deref(), Some("3"));
    }
}
