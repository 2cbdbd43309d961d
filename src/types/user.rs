use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::util::date::{calendar_date, iso8601};
use crate::util::id;

/// The account owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "id::lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, with = "calendar_date", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, with = "calendar_date", skip_serializing_if = "Option::is_none")]
    pub license_delivery_date: Option<NaiveDate>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// "First Last", falling back to the nickname.
    pub fn display_name(&self) -> Option<String> {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.nick_name.clone()
        } else {
            Some(full)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_payload() {
        let user: User = serde_json::from_value(json!({
            "id": 12,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "gender": "FEMALE",
            "birthDate": "1990-04-12",
            "createdAt": "2017-10-03T08:00:00.000+00:00",
            "somethingNew": true
        }))
        .unwrap();
        assert_eq!(user.id.as_deref(), Some("12"));
        assert_eq!(user.display_name().as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.birth_date, NaiveDate::from_ymd_opt(1990, 4, 12));
        assert!(user.updated_at.is_none());
    }

    #[test]
    fn calendar_dates_are_sent_back_unchanged() {
        let payload = json!({"id": "u1", "birthDate": "1990-04-12", "licenseDeliveryDate": "2008-09-30"});
        let user: User = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(serde_json::to_value(&user).unwrap(), payload);
    }

    #[test]
    fn encodes_only_present_fields() {
        let user = User {
            id: Some("7".to_string()),
            nick_name: Some("ada".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()),
            ..User::default()
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "id": "7",
                "nickName": "ada",
                "createdAt": "2021-06-01T12:00:00.000+00:00"
            })
        );
    }
}
