//! Single-turn calls to the text provider.

use std::sync::Arc;
use std::time::Duration;

use crate::error::GatewayError;
use crate::services::providers::{ChatRequest, GenerationParams, TextProvider};

/// Sampling temperature for every answer.
pub const TEMPERATURE: f32 = 0.7;

/// Sends one instruction + question pair to the provider per call.
///
/// Holds no per-request state; cloning shares the underlying provider.
#[derive(Clone)]
pub struct ModelGateway {
    provider: Arc<dyn TextProvider>,
    timeout: Duration,
}

impl ModelGateway {
    pub fn new(provider: Arc<dyn TextProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    /// Ask `question` with `instruction` as context and return the raw reply.
    ///
    /// Fails without retrying on transport or provider errors, on timeout,
    /// and when the reply holds no non-blank text.
    pub async fn ask(&self, instruction: &str, question: &str) -> Result<String, GatewayError> {
        let request = ChatRequest {
            instruction: instruction.to_string(),
            question: question.to_string(),
        };
        let params = GenerationParams {
            temperature: Some(TEMPERATURE),
        };

        let response = tokio::time::timeout(self.timeout, self.provider.generate(&request, &params))
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))??;

        tracing::info!(
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Provider answered"
        );

        response
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or(GatewayError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::providers::ProviderError;

    fn gateway_for(provider: MockTextProvider) -> (ModelGateway, Arc<MockTextProvider>) {
        let provider = Arc::new(provider);
        let gateway = ModelGateway::new(provider.clone(), Duration::from_secs(5));
        (gateway, provider)
    }

    #[tokio::test]
    async fn test_ask_returns_reply() {
        let (gateway, _) = gateway_for(MockTextProvider::replying("Sim, vendemos!"));
        let reply = gateway.ask("instrução", "Vocês vendem pão?").await.unwrap();
        assert_eq!(reply, "Sim, vendemos!");
    }

    #[tokio::test]
    async fn test_ask_sends_instruction_question_and_temperature() {
        let (gateway, provider) = gateway_for(MockTextProvider::replying("ok"));
        gateway.ask("instrução", "pergunta").await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let (request, params) = &requests[0];
        assert_eq!(request.instruction, "instrução");
        assert_eq!(request.question, "pergunta");
        assert_eq!(params.temperature, Some(0.7));
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_retried() {
        let (gateway, provider) = gateway_for(MockTextProvider::failing("boom"));
        let err = gateway.ask("instrução", "pergunta").await.unwrap_err();

        assert!(matches!(
            err,
            GatewayError::Provider(ProviderError::ApiError(_))
        ));
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let (gateway, _) = gateway_for(MockTextProvider::silent());
        assert!(matches!(
            gateway.ask("instrução", "pergunta").await,
            Err(GatewayError::EmptyReply)
        ));

        let (gateway, _) = gateway_for(MockTextProvider::replying("  \n "));
        assert!(matches!(
            gateway.ask("instrução", "pergunta").await,
            Err(GatewayError::EmptyReply)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let provider = Arc::new(
            MockTextProvider::replying("tarde demais").with_delay(Duration::from_secs(60)),
        );
        let gateway = ModelGateway::new(provider, Duration::from_secs(1));

        assert!(matches!(
            gateway.ask("instrução", "pergunta").await,
            Err(GatewayError::Timeout(d)) if d == Duration::from_secs(1)
        ));
    }
}
