//! Payloads the suite sends to the backend

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::ipc::protocol::NewToken;

/// Lifetime given to synthesized tokens
const TOKEN_LIFETIME_HOURS: i64 = 1;

/// Configuration written by the round-trip test
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub language: String,
    pub theme: String,
    pub auto_refresh: bool,
    pub refresh_interval: u32,
    pub auto_sync: bool,
    pub sync_interval: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "zh-CN".to_string(),
            theme: "dark".to_string(),
            auto_refresh: true,
            refresh_interval: 30,
            auto_sync: false,
            sync_interval: 10,
        }
    }
}

impl AppConfig {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Email that no earlier run has used
pub fn unique_email(now: DateTime<Utc>) -> String {
    format!("test_{}@example.com", now.timestamp_millis())
}

/// Placeholder token fields expiring an hour after `now`
pub fn placeholder_token(now: DateTime<Utc>) -> NewToken {
    let stamp = now.timestamp_millis();
    let expires_at = now + Duration::hours(TOKEN_LIFETIME_HOURS);
    NewToken {
        access_token: format!("test_access_token_{}", stamp),
        refresh_token: format!("test_refresh_token_{}", stamp),
        expires_at: expires_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_token_expires_an_hour_later() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let token = placeholder_token(now);
        assert_eq!(token.expires_at, "2026-10-18T13:00:00.000Z");
        assert_eq!(
            token.access_token,
            format!("test_access_token_{}", now.timestamp_millis())
        );
    }

    #[test]
    fn test_email_is_stamped() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(unique_email(now), "test_1700000000123@example.com");
    }

    #[test]
    fn test_default_config_payload() {
        assert_eq!(
            AppConfig::default().to_value(),
            json!({
                "language": "zh-CN",
                "theme": "dark",
                "auto_refresh": true,
                "refresh_interval": 30,
                "auto_sync": false,
                "sync_interval": 10
            })
        );
    }
}
