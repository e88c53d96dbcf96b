//! Live update check against a running server.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info};
use upgate_crypto::SigningKey;

use crate::verify_cmd::{Verification, verify_text};

/// Default check endpoint of a locally running server.
pub const DEFAULT_CHECK_URL: &str = "http://localhost:3000/check";

/// Request body sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub app_id: String,
    pub current_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
}

/// Build the HTTP client. Installs the ring TLS provider first, since the
/// workspace builds reqwest without one.
pub fn http_client() -> Result<reqwest::Client> {
    let _ = rustls::crypto::ring::default_provider().install_default();
    reqwest::Client::builder()
        .user_agent(concat!("upgate-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// POST `request` to `url` and verify the signed response.
pub async fn check(
    client: &reqwest::Client,
    url: &str,
    request: &CheckRequest,
    key: &SigningKey,
) -> Result<(serde_json::Value, Verification)> {
    info!(url, app_id = %request.app_id, version = %request.current_version, "Sending update check");

    let resp = client
        .post(url)
        .json(request)
        .send()
        .await
        .with_context(|| format!("Request to {url} failed"))?;
    let status = resp.status();
    let text = resp.text().await.context("Failed to read response body")?;
    debug!(%status, body = %text, "Server responded");

    if !status.is_success() {
        bail!("Server returned {status}: {text}");
    }

    let (_, verification) = verify_text(&text, key)?;
    let pretty = serde_json::from_str(&text).context("Response is not JSON")?;
    Ok((pretty, verification))
}

/// Execute the `check` subcommand. Returns whether the signature is valid.
#[allow(clippy::print_stdout)]
pub async fn run(url: &str, request: CheckRequest, key: &SigningKey) -> Result<bool> {
    let client = http_client()?;
    let (response, verification) = check(&client, url, &request, key).await?;

    println!("Response:");
    println!("{}", serde_json::to_string_pretty(&response)?);
    println!();
    println!("received signature: {}", verification.received);
    println!("computed signature: {}", verification.computed);
    println!(
        "signature: {}",
        if verification.valid { "valid" } else { "INVALID" }
    );
    Ok(verification.valid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_wire_names() {
        let req = CheckRequest {
            app_id: "com.example.android.app".into(),
            current_version: "1.0.0".into(),
            build_number: Some("1".into()),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"appId":"com.example.android.app","currentVersion":"1.0.0","buildNumber":"1"}"#
        );
    }

    #[test]
    fn build_number_omitted_when_absent() {
        let req = CheckRequest {
            app_id: "a".into(),
            current_version: "1".into(),
            build_number: None,
        };
        assert!(!serde_json::to_string(&req).unwrap().contains("buildNumber"));
    }
}
