#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pizza_admin::{
    client::HttpPizzaClient,
    config::ServerConfig,
    create_app,
    observability::Metrics,
    repositories::InMemoryPizzaRepository,
    services::{DefaultPizzaValidator, PizzaService},
    ui::{DialogPresenter, DialogResult, Notifier, Operation, PanelOptions},
};
use reqwest::Client;
use tokio::net::TcpListener;

pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub pizza_client: HttpPizzaClient,
    pub metrics: Arc<Metrics>,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self::with_server_config(ServerConfig::default()).await
    }

    /// Serve the real router over an in-memory store on an ephemeral port
    pub async fn with_server_config(server: ServerConfig) -> Self {
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let service = Arc::new(PizzaService::new(
            Arc::new(DefaultPizzaValidator::new()),
            Arc::new(InMemoryPizzaRepository::new()),
        ));
        let app = create_app(metrics.clone(), service, &server);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        let pizza_client = HttpPizzaClient::new(base_url.clone(), Duration::from_secs(5))
            .expect("Failed to build pizza client");

        Self {
            client: Client::new(),
            base_url,
            pizza_client,
            metrics,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn seed_test_data(&self) {
        let response = self
            .client
            .post(self.url("/api/admin/seed"))
            .send()
            .await
            .expect("Failed to seed test data");

        assert_eq!(response.status().as_u16(), 200);
    }
}

/// Dialogs that answer from a script and remember what they were shown
#[derive(Default)]
pub struct ScriptedDialogs {
    answers: Mutex<VecDeque<DialogResult>>,
    pub panels: Mutex<Vec<PanelOptions>>,
    pub confirmations: Mutex<Vec<(String, String)>>,
}

impl ScriptedDialogs {
    pub fn answering(answers: Vec<DialogResult>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Default::default()
        }
    }

    fn next_answer(&self) -> DialogResult {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(DialogResult::cancelled)
    }
}

#[async_trait]
impl DialogPresenter for ScriptedDialogs {
    async fn show_panel(&self, options: PanelOptions) -> DialogResult {
        let answer = match self.next_answer() {
            // An accepted panel with no data submits what it was opened with
            DialogResult {
                cancelled: false,
                data: None,
            } => DialogResult::submitted(options.content.clone()),
            answer => answer,
        };
        self.panels.lock().unwrap().push(options);
        answer
    }

    async fn confirm(&self, title: &str, message: &str) -> DialogResult {
        self.confirmations
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        self.next_answer()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Toast {
    Progress(String, Operation),
    Closed(String),
    Success(String, Operation),
    Failure(String, Operation, String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_progress(&self, key: &str, _kind: &str, _name: &str, operation: Operation) {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Progress(key.to_string(), operation));
    }

    fn close_progress(&self, key: &str) {
        self.toasts.lock().unwrap().push(Toast::Closed(key.to_string()));
    }

    fn show_success(&self, _kind: &str, name: &str, operation: Operation) {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Success(name.to_string(), operation));
    }

    fn show_failure(&self, _kind: &str, name: &str, operation: Operation, message: &str) {
        self.toasts.lock().unwrap().push(Toast::Failure(
            name.to_string(),
            operation,
            message.to_string(),
        ));
    }
}
