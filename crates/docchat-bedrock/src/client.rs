use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::Client;

/// Load the shared AWS config for a region. Every AWS client in the process
/// is built from this one config.
pub async fn load_config(region: &str) -> SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

/// Build a Bedrock Runtime client (Converse API).
pub fn build_runtime_client(config: &SdkConfig) -> Client {
    Client::new(config)
}
