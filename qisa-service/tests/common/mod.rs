#![allow(dead_code)]

use qisa_service::config::{
    GatewaySettings, GeminiSettings, InstructionMode, ObservabilitySettings, QisaConfig,
    DEFAULT_GEMINI_API_BASE,
};
use qisa_service::services::providers::TextProvider;
use qisa_service::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-2.0-flash";

pub fn test_config() -> QisaConfig {
    QisaConfig {
        common: service_core::config::Config { port: 0 }, // Random port
        gemini: GeminiSettings {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            model: TEST_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            instruction_mode: InstructionMode::Native,
        },
        gateway: GatewaySettings { timeout_secs: 5 },
        observability: ObservabilitySettings {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
    }
}

/// The "Padaria Sol" store used across tests.
pub fn padaria_sol() -> Value {
    json!({
        "nome": "Padaria Sol",
        "categoria": "Padaria",
        "descricao": "Pães frescos",
        "endereco": "Rua A, 10",
        "cidade": "SP",
        "estado": "SP",
        "diasFuncionamento": "Seg-Sáb",
        "horarioAbertura": "07:00",
        "horarioFechamento": "19:00",
        "telefone": "1199999999",
        "tiposAtendimento": ["balcão"],
        "metodosPagamento": ["pix", "cartão"]
    })
}

pub fn responder_body(pergunta: &str) -> Value {
    json!({
        "loja": padaria_sol(),
        "produtos": [{ "nome": "Pão francês", "preco": 0.5 }],
        "pergunta": pergunta
    })
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application with an injected provider.
    pub async fn spawn(provider: Arc<dyn TextProvider>) -> Self {
        let app = Application::build_with_provider(test_config(), provider)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    /// Spawn the application with the Gemini provider described by `config`.
    pub async fn spawn_with_config(config: QisaConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if let Ok(response) = client.get(&health_url).send().await {
                if response.status().is_success() {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Self {
            address,
            port,
            client,
        }
    }

    pub async fn post_responder(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/responder", self.address))
            .json(body)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
