use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_smithy_types::Blob;
use toolsearch_application::{SearchCapability, SearchError};
use toolsearch_domain::{SearchRequest, SearchResponse};
use tracing::{debug, info};

use super::types;
use crate::config::SearchSettings;

/// [`SearchCapability`] backed by a Claude model on Bedrock.
pub struct BedrockToolSearch {
    client: Arc<BedrockClient>,
    model_id: String,
    max_tokens: u32,
}

impl BedrockToolSearch {
    /// Initialize AWS credentials and create a Bedrock Runtime client.
    pub async fn new(settings: &SearchSettings) -> Self {
        let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()));

        if let Some(ref profile) = settings.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        let aws_config = aws_config_loader.load().await;
        info!(region = %settings.region, model = %settings.model_id, "Bedrock tool search initialized");

        Self::with_client(BedrockClient::new(&aws_config), settings)
    }

    pub fn with_client(client: BedrockClient, settings: &SearchSettings) -> Self {
        Self {
            client: Arc::new(client),
            model_id: settings.model_id.clone(),
            max_tokens: settings.max_tokens,
        }
    }
}

#[async_trait]
impl SearchCapability for BedrockToolSearch {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let body = types::build_request_body(request, self.max_tokens);
        let bytes = serde_json::to_vec(&body)
            .map_err(|e| SearchError::RequestFailed(format!("encode request: {}", e)))?;

        debug!(
            model = %self.model_id,
            candidates = request.candidate_count(),
            "Calling Bedrock InvokeModel for tool search"
        );

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(bytes))
            .send()
            .await
            .map_err(|e| types::convert_invoke_error(&e))?;

        SearchResponse::from_slice(response.body().as_ref()).map_err(types::convert_protocol_error)
    }
}
