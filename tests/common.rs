use ecohub::{
    config::ApiConfig,
    frontend::{api::ApiClient, utils::notices::Notices},
};
use std::sync::Mutex;
use wiremock::MockServer;

/// Client for the given mock backend, which serves the api under `/api`.
pub fn client(server: &MockServer) -> ApiClient {
    let config = ApiConfig {
        base_url: format!("{}/api", server.uri()),
        ..Default::default()
    };
    ApiClient::new(&config).expect("valid api config")
}

#[derive(Default)]
pub struct TestNotices {
    pub success: Mutex<Vec<String>>,
    pub error: Mutex<Vec<String>>,
}

impl TestNotices {
    pub fn successes(&self) -> Vec<String> {
        self.success.lock().expect("notices lock").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.error.lock().expect("notices lock").clone()
    }
}

impl Notices for TestNotices {
    fn success(&self, message: &str) {
        self.success
            .lock()
            .expect("notices lock")
            .push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.error
            .lock()
            .expect("notices lock")
            .push(message.to_string());
    }
}
