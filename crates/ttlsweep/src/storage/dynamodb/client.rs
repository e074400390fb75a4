//! AWS SDK client setup.

use aws_sdk_dynamodb::Client;
use ttlsweep_core::store::{Result, StoreError};

/// AWS client configuration.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Endpoint URL, pointing at local DynamoDB unless overridden.
    pub endpoint_url: String,
    /// AWS region.
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: std::env::var("AWS_ENDPOINT_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-west-2".to_string()),
        }
    }
}

impl AwsConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        format!("DynamoDB at {} (region: {})", self.endpoint_url, self.region)
    }
}

/// Creates a DynamoDB client with the given configuration.
pub async fn create_client(config: &AwsConfig) -> Result<Client> {
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .endpoint_url(&config.endpoint_url)
        .load()
        .await;

    if sdk_config.credentials_provider().is_none() {
        return Err(StoreError::Session(
            "no AWS credentials provider resolved".to_string(),
        ));
    }

    Ok(Client::new(&sdk_config))
}
