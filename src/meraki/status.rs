use crate::meraki::{requests, MerakiClient};
use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Field spellings the Dashboard API has used across versions, in the order
/// they are tried; first present key wins even when its value is falsy
const TWO_FACTOR_FIELDS: &[&str] = &[
    "twoFactorAuthEnabled",
    "two_factor_auth_enabled",
    "hasTwoFactorAuthEnabled",
];
const API_ACCESS_FIELDS: &[&str] = &["hasApiKey", "apiAccess", "api_access"];
const LAST_ACTIVE_FIELDS: &[&str] = &["lastActive", "last_active", "lastSeen"];

const TWO_FACTOR_AUTH_METHOD: &str = "Two-factor authentication";

const SERIALIZE_FALLBACK: &str = r#"{"two_factor_enabled":"false","has_api_key":"false","last_active":"never","admin_id":"","error":"result serialization failed"}"#;

/// Lookup result in the shape Terraform's external data source consumes.
/// Booleans are string-encoded because the consumer expects "true"/"false",
/// not JSON booleans.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AdminStatus {
    pub two_factor_enabled: String,
    pub has_api_key: String,
    pub last_active: String,
    pub admin_id: String,
    pub error: String,
}

impl Default for AdminStatus {
    fn default() -> Self {
        Self {
            two_factor_enabled: "false".to_string(),
            has_api_key: "false".to_string(),
            last_active: "never".to_string(),
            admin_id: String::new(),
            error: String::new(),
        }
    }
}

impl AdminStatus {
    /// Error result with every other field at its safe default
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| SERIALIZE_FALLBACK.to_string())
    }
}

/// Check 2FA, API access and last activity for one administrator.
/// Never fails: every error path lands in the `error` field.
#[instrument(skip(client))]
pub async fn check_admin_status(
    client: &MerakiClient,
    admin_email: &str,
    org_id: &str,
) -> AdminStatus {
    match lookup(client, admin_email, org_id).await {
        Ok(status) => status,
        Err(error) => AdminStatus::failure(error.to_string()),
    }
}

async fn lookup(client: &MerakiClient, admin_email: &str, org_id: &str) -> Result<AdminStatus> {
    let admins = fetch_admins(client, org_id).await?;

    let wanted = admin_email.to_lowercase();

    // First match in response order wins
    let Some(admin) = admins
        .iter()
        .find(|admin| admin["email"].as_str().unwrap_or_default().to_lowercase() == wanted)
    else {
        return Ok(AdminStatus::failure(format!(
            "Administrator {admin_email} not found in organization {org_id}"
        )));
    };

    let admin_id = admin["id"].as_str().unwrap_or_default().to_string();

    let two_factor_enabled = bool_field(admin, TWO_FACTOR_FIELDS).unwrap_or_else(|| {
        admin["authenticationMethod"].as_str() == Some(TWO_FACTOR_AUTH_METHOD)
    });

    let has_api_key = bool_field(admin, API_ACCESS_FIELDS).unwrap_or(false);

    let mut last_active = match str_field(admin, LAST_ACTIVE_FIELDS) {
        Some(ts) if !ts.is_empty() => ts.to_string(),
        _ => "never".to_string(),
    };

    // API usage data is optional; the record-derived value stands on any failure
    match requests::most_recent_api_request(client, org_id, &admin_id).await {
        Ok(Some(ts)) => last_active = ts,
        Ok(None) => {}
        Err(error) => debug!("skipping API request enrichment: {}", error),
    }

    Ok(AdminStatus {
        two_factor_enabled: two_factor_enabled.to_string(),
        has_api_key: has_api_key.to_string(),
        last_active,
        admin_id,
        error: String::new(),
    })
}

async fn fetch_admins(client: &MerakiClient, org_id: &str) -> Result<Vec<Value>> {
    let response = client
        .get(&format!("/organizations/{org_id}/admins"), &[])
        .await
        .map_err(|error| anyhow!("API request failed: {error}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("API request failed: HTTP {status}"));
    }

    let body = response
        .text()
        .await
        .map_err(|error| anyhow!("API request failed: {error}"))?;

    serde_json::from_str(&body).map_err(|error| anyhow!("Failed to parse JSON response: {error}"))
}

/// First candidate key present in the record, regardless of its value
fn first_present<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| record.get(*key))
}

fn bool_field(record: &Value, keys: &[&str]) -> Option<bool> {
    first_present(record, keys).map(|value| match value {
        Value::Bool(flag) => *flag,
        // some API versions serialize the flag as a string; anything other
        // than "true" stays false so the output keeps its "true"/"false" shape
        Value::String(flag) => flag.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn str_field<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a str> {
    first_present(record, keys).and_then(Value::as_str)
}
