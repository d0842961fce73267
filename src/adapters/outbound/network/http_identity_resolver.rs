use crate::ports::outbound::{Identity, IdentityResolver};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    account_id: String,
    region: String,
}

/// HttpIdentityResolver adapter asking the scanner service who the caller is
///
/// `GET {base}/v1/identity[?region=...]` returns the account id and the
/// effective region for the configured credentials.
pub struct HttpIdentityResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityResolver {
    const TIMEOUT_SECONDS: u64 = 30;

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let user_agent = format!("cloudscan/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn identity_url(&self, region: Option<&str>) -> String {
        match region {
            Some(region) => format!(
                "{}/v1/identity?region={}",
                self.base_url,
                urlencoding::encode(region)
            ),
            None => format!("{}/v1/identity", self.base_url),
        }
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, region: Option<&str>) -> Result<Identity> {
        let url = self.identity_url(region);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("identity endpoint returned status code {}", response.status());
        }

        let body: IdentityResponse = response.json().await?;
        if body.account_id.trim().is_empty() {
            anyhow::bail!("identity endpoint returned an empty account id");
        }
        if body.region.trim().is_empty() {
            anyhow::bail!("identity endpoint returned an empty region");
        }

        Ok(Identity {
            account_id: body.account_id,
            region: body.region,
        })
    }
}
