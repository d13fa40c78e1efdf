//! Common test utilities for integration tests

#![allow(dead_code)]

use admin_console::{BackendKind, ConsoleConfig, ConsoleServerHandler, ModuleConfig};
use std::path::Path;

/// Handler serving every built-in module from memory with sample data
pub fn get_test_handler() -> ConsoleServerHandler {
    ConsoleServerHandler::builtin().unwrap()
}

/// Config with a single file-backed module stored under `data_dir`
pub fn file_config(module: &str, data_dir: &Path) -> ConsoleConfig {
    let mut module = ModuleConfig::builtin(module);
    module.backend = BackendKind::File;
    ConsoleConfig {
        data_dir: Some(data_dir.to_path_buf()),
        modules: vec![module],
        ..ConsoleConfig::default()
    }
}

/// Config with a single REST-backed module pointing at `base_url`
pub fn rest_config(module: &str, resource: &str, base_url: &str) -> ConsoleConfig {
    let mut module = ModuleConfig::builtin(module);
    module.backend = BackendKind::Rest;
    module.resource = Some(resource.to_string());
    let mut config = ConsoleConfig {
        modules: vec![module],
        ..ConsoleConfig::default()
    };
    config.api.base_url = base_url.to_string();
    config
}

/// Build `field=value` tool arguments
pub fn fields(pairs: &[&str]) -> Vec<String> {
    pairs.iter().map(|p| p.to_string()).collect()
}

/// Extract the record id from a save confirmation
/// Response format: "<Title> #<id> (<label>) created"
pub fn extract_id_from_response(response: &str) -> String {
    response
        .split_whitespace()
        .find_map(|word| word.strip_prefix('#'))
        .unwrap_or("")
        .to_string()
}
