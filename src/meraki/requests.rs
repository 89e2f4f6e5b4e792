use crate::meraki::MerakiClient;
use anyhow::{anyhow, Result};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};

/// Log window queried for API activity: 30 days in seconds
const TIMESPAN_SECONDS: u64 = 30 * 24 * 3600;

/// Most recent API request timestamp attributable to `admin_id`, if the
/// organization's request log has one. Best-effort by contract: callers
/// treat `Err` as "no enrichment" and keep whatever they already have.
///
/// "Most recent" is the lexicographically greatest `ts` string; ISO-8601
/// timestamps from a single endpoint are assumed to order lexically.
#[instrument(skip(client))]
pub async fn most_recent_api_request(
    client: &MerakiClient,
    org_id: &str,
    admin_id: &str,
) -> Result<Option<String>> {
    let timespan = TIMESPAN_SECONDS.to_string();

    let response = client
        .get(
            &format!("/organizations/{org_id}/apiRequests"),
            &[("timespan", timespan.as_str()), ("adminId", admin_id)],
        )
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(anyhow!("HTTP {status} from apiRequests"));
    }

    let entries: Vec<Value> = response.json().await?;

    let most_recent = entries
        .iter()
        .filter(|entry| entry["adminId"].as_str() == Some(admin_id))
        .filter_map(|entry| entry["ts"].as_str())
        .filter(|ts| !ts.is_empty())
        .max()
        .map(str::to_string);

    if let Some(ts) = &most_recent {
        debug!("most recent API request at {}", ts);
    }

    Ok(most_recent)
}
