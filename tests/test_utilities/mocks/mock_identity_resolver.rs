use async_trait::async_trait;
use cloudscan::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock IdentityResolver with a fixed account; the region override wins when given
#[derive(Clone)]
pub struct MockIdentityResolver {
    account_id: String,
    default_region: String,
    calls: Arc<AtomicUsize>,
}

impl MockIdentityResolver {
    pub fn new(account_id: &str, default_region: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            default_region: default_region.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for MockIdentityResolver {
    async fn resolve(&self, region: Option<&str>) -> Result<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Identity {
            account_id: self.account_id.clone(),
            region: region.unwrap_or(&self.default_region).to_string(),
        })
    }
}
