use crate::{
    cli::actions::Action,
    meraki::{
        status::{check_admin_status, AdminStatus},
        MerakiClient,
    },
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::io::{self, AsyncReadExt};

const MISSING_PARAMS: &str = "Missing required parameters: api_key, admin_email, or org_id";

/// Parameters supplied on stdin by Terraform's external data source.
/// Every field is optional at the serde level so that absent and null
/// parameters both land in the missing-parameter result instead of
/// failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub org_id: Option<String>,
}

/// Handle the check action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Check => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).await?;

            // Malformed top-level input is the one failure that bubbles up to
            // a non-zero exit; everything past this point reports through the
            // `error` field and exits 0
            let params: Params = serde_json::from_str(&input)?;

            let result = run(params).await;

            println!("{}", result.to_json_line());
        }
    }

    Ok(())
}

async fn run(params: Params) -> AdminStatus {
    let api_key = match params.api_key {
        Some(key) if !key.expose_secret().is_empty() => key,
        _ => return AdminStatus::failure(MISSING_PARAMS),
    };

    let admin_email = params.admin_email.unwrap_or_default();
    let org_id = params.org_id.unwrap_or_default();

    if admin_email.is_empty() || org_id.is_empty() {
        return AdminStatus::failure(MISSING_PARAMS);
    }

    match MerakiClient::new(api_key) {
        Ok(client) => check_admin_status(&client, &admin_email, &org_id).await,
        Err(error) => AdminStatus::failure(format!("Unexpected error: {error}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn params(api_key: &str, admin_email: &str, org_id: &str) -> Params {
        Params {
            api_key: (!api_key.is_empty()).then(|| SecretString::from(api_key.to_string())),
            admin_email: Some(admin_email.to_string()),
            org_id: Some(org_id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let result = run(params("", "admin@example.com", "123456")).await;

        assert_eq!(result.error, MISSING_PARAMS);
        assert_eq!(result.two_factor_enabled, "false");
        assert_eq!(result.has_api_key, "false");
        assert_eq!(result.last_active, "never");
        assert_eq!(result.admin_id, "");
    }

    #[tokio::test]
    async fn test_missing_admin_email() {
        let result = run(params("0123456789abcdef", "", "123456")).await;

        assert_eq!(result.error, MISSING_PARAMS);
    }

    #[tokio::test]
    async fn test_missing_org_id() {
        let result = run(params("0123456789abcdef", "admin@example.com", "")).await;

        assert_eq!(result.error, MISSING_PARAMS);
    }

    #[test]
    fn test_params_from_stdin_json() {
        let params: Params = serde_json::from_str(
            r#"{"api_key": "0123456789abcdef", "admin_email": "admin@example.com", "org_id": "123456"}"#,
        )
        .unwrap();

        assert_eq!(
            params.api_key.map(|k| k.expose_secret().to_string()),
            Some("0123456789abcdef".to_string())
        );
        assert_eq!(params.admin_email.as_deref(), Some("admin@example.com"));
        assert_eq!(params.org_id.as_deref(), Some("123456"));
    }

    #[test]
    fn test_params_tolerate_absent_fields() {
        let params: Params = serde_json::from_str(r#"{"org_id": "123456"}"#).unwrap();

        assert!(params.api_key.is_none());
        assert!(params.admin_email.is_none());
        assert_eq!(params.org_id.as_deref(), Some("123456"));
    }

    #[tokio::test]
    async fn test_null_parameter_is_missing_not_fatal() {
        // Terraform can emit explicit nulls; they behave like absent fields
        let params: Params = serde_json::from_str(
            r#"{"api_key": "0123456789abcdef", "admin_email": null, "org_id": "123456"}"#,
        )
        .unwrap();

        let result = run(params).await;

        assert_eq!(result.error, MISSING_PARAMS);
        assert_eq!(result.two_factor_enabled, "false");
        assert_eq!(result.admin_id, "");
    }

    #[tokio::test]
    async fn test_all_null_parameters_are_missing() {
        let params: Params = serde_json::from_str(
            r#"{"api_key": null, "admin_email": null, "org_id": null}"#,
        )
        .unwrap();

        let result = run(params).await;

        assert_eq!(result.error, MISSING_PARAMS);
    }

    #[tokio::test]
    async fn test_error_output_keeps_documented_keys() {
        let result = run(Params::default()).await;
        let value: Value = serde_json::from_str(&result.to_json_line()).unwrap();

        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            vec![
                "admin_id",
                "error",
                "has_api_key",
                "last_active",
                "two_factor_enabled"
            ]
        );
    }
}
