use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use memchat::api::HttpBackend;
use memchat::config::ServerConfig;
use memchat::view::{ChatView, RecordingRenderer};
use memchat::ChatClient;

/// Backend pointed at a wiremock server, with a short timeout so a broken
/// test fails instead of hanging.
#[allow(dead_code)]
pub fn backend_for(base_url: &str) -> HttpBackend {
    let config = ServerConfig {
        base_url: base_url.to_string(),
        timeout_seconds: Some(5),
        ..ServerConfig::default()
    };
    HttpBackend::new(&config).expect("failed to build http backend")
}

/// Client over an HTTP backend plus the recorder watching its view.
#[allow(dead_code)]
pub fn client_for(base_url: &str) -> (ChatClient, RecordingRenderer) {
    let recorder = RecordingRenderer::new();
    let client = ChatClient::new(
        Arc::new(backend_for(base_url)),
        ChatView::new(recorder.clone()),
    );
    (client, recorder)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("memchat.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
