use crate::shared::security::validate_path_component;
use crate::shared::Result;
use std::fmt;
use std::path::PathBuf;

/// CacheKey - identifies one cache slot: `(provider, account_id, region)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    provider: String,
    account_id: String,
    region: String,
}

impl CacheKey {
    /// Creates a key, validating that each part is safe to use as a directory name
    pub fn new(
        provider: impl Into<String>,
        account_id: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self> {
        let key = Self {
            provider: provider.into(),
            account_id: account_id.into(),
            region: region.into(),
        };
        validate_path_component(&key.provider, "provider")?;
        validate_path_component(&key.account_id, "account id")?;
        validate_path_component(&key.region, "region")?;
        Ok(key)
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Relative location of the slot under a cache root:
    /// `cloud/<provider>/<account_id>/<region>`
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from("cloud")
            .join(&self.provider)
            .join(&self.account_id)
            .join(&self.region)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.provider, self.account_id, self.region)
    }
}
