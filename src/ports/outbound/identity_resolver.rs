use crate::shared::Result;
use async_trait::async_trait;

/// The account and effective region behind the current credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: String,
    pub region: String,
}

/// IdentityResolver port for discovering who we are scanning as
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolves the account id and effective region
    ///
    /// # Arguments
    /// * `region` - Region override; `None` lets the resolver pick its default
    async fn resolve(&self, region: Option<&str>) -> Result<Identity>;
}
