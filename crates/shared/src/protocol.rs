use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Hobby, HobbyId, OneOnOne, User, UserRef};

/// Success flag and optional message carried by most gateway responses.
pub trait Acknowledgement {
    fn accepted(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

macro_rules! acknowledged {
    ($name:ident) => {
        impl Acknowledgement for $name {
            fn accepted(&self) -> bool {
                self.success
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        }
    };
}

/// Listing responses carry no success flag unless the backend failed.
macro_rules! listing {
    ($name:ident) => {
        impl Acknowledgement for $name {
            fn accepted(&self) -> bool {
                self.success.unwrap_or(true)
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        }
    };
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}
acknowledged!(CurrentUserResponse);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateUserResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}
acknowledged!(AggregateUserResponse);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserHobbiesResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<Hobby>,
}
acknowledged!(UserHobbiesResponse);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddHobbyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobby_id: Option<HobbyId>,
}
acknowledged!(AddHobbyResponse);

/// Bare `{success, message?}` answer of the delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
acknowledged!(AckResponse);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularHobbiesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<Hobby>,
    #[serde(default = "first_position")]
    pub start: i64,
    #[serde(default)]
    pub total_pages: u32,
}
listing!(PopularHobbiesResponse);

fn first_position() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneOnOnesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub one_on_ones: Vec<OneOnOne>,
}
listing!(OneOnOnesResponse);

/// Parses the instant encodings the backend is known to emit: RFC 3339, the
/// RFC 2822 / HTTP-date form, and naive ISO-8601 which is taken as UTC.
pub fn parse_utc_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

pub fn deserialize_utc_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc_instant(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised instant: {raw}")))
}
