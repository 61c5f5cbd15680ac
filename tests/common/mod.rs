use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tutorchat::chat::{ChatService, ChatSettings};
use tutorchat::providers::FakeGateway;
use tutorchat::server::{router, AppState};
use tutorchat::session::InMemorySessionStore;

#[allow(dead_code)]
pub const COOKIE_NAME: &str = "tutorchat_session";

#[allow(dead_code)]
pub fn app_with(gateway: Arc<FakeGateway>) -> axum::Router {
    let chat = Arc::new(ChatService::new(
        gateway,
        Arc::new(InMemorySessionStore::new(None)),
        ChatSettings::new("test-model"),
    ));
    router(AppState::new(chat, COOKIE_NAME).expect("failed to build app state"))
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
