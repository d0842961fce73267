use super::ScanScope;
use crate::shared::error::CloudScanError;
use crate::shared::Result;

/// Services the AWS scanning backend can enumerate, in display order
const AWS_SERVICES: &[&str] = &[
    "api-gateway",
    "athena",
    "cloudfront",
    "cloudtrail",
    "cloudwatch",
    "codebuild",
    "documentdb",
    "dynamodb",
    "ec2",
    "ecr",
    "ecs",
    "efs",
    "eks",
    "elasticache",
    "elasticsearch",
    "elb",
    "emr",
    "iam",
    "kinesis",
    "kms",
    "mq",
    "msk",
    "neptune",
    "rds",
    "redshift",
    "s3",
    "sns",
    "sqs",
    "ssm",
    "workspaces",
];

/// ServiceCatalog - the immutable set of services a provider supports
///
/// The catalog is passed to the use case rather than read from a global,
/// so tests and config files can substitute a smaller one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: Vec<String>,
}

impl ServiceCatalog {
    /// Creates a catalog from an explicit list
    ///
    /// # Errors
    /// Returns an error if the list is empty or contains an empty name
    pub fn new(services: Vec<String>) -> Result<Self> {
        if services.is_empty() {
            return Err(CloudScanError::configuration("service catalog must not be empty").into());
        }
        if services.iter().any(|s| s.trim().is_empty()) {
            return Err(
                CloudScanError::configuration("service catalog contains an empty service name")
                    .into(),
            );
        }
        Ok(Self { services })
    }

    /// The built-in AWS catalog
    pub fn aws_default() -> Self {
        Self {
            services: AWS_SERVICES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn all_supported_services(&self) -> &[String] {
        &self.services
    }

    pub fn supports(&self, service: &str) -> bool {
        self.services.iter().any(|s| s == service)
    }

    /// Fails on the first requested service absent from the catalog
    pub fn validate(&self, requested: &[String]) -> Result<()> {
        if let Some(unsupported) = requested.iter().find(|s| !self.supports(s)) {
            return Err(CloudScanError::UnsupportedService {
                service: unsupported.clone(),
                supported: self.services.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Resolves the scope for an invocation: everything when nothing was
    /// requested, otherwise the validated request
    pub fn resolve_scope(&self, requested: &[String]) -> Result<ScanScope> {
        if requested.is_empty() {
            tracing::debug!("No service(s) specified, scanning all services...");
            return Ok(ScanScope::new(self.services.iter().cloned()));
        }

        tracing::debug!(
            "Specific services were requested: [{}]...",
            requested.join(", ")
        );
        self.validate(requested)?;
        Ok(ScanScope::new(requested.iter().cloned()))
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::aws_default()
    }
}
