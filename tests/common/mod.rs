//! Common test utilities for Artemis Arrow CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Write a config file into `dir` and return its path.
pub fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A valid YAML config pointing at a loopback collector (no DNS involved).
pub fn valid_yaml() -> &'static str {
    "dest_host: 127.0.0.1\n\
     dest_port: 4789\n\
     control_net: 10.9.0.0/24\n\
     vni: 42\n"
}

/// A valid JSON config using the legacy camelCase key spellings.
pub fn valid_legacy_json() -> &'static str {
    r#"{
        "destHost": "127.0.0.1",
        "destPort": 4789,
        "controlNet": "10.9.0.0/24",
        "vni": 42
    }"#
}

pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_artemis-arrow")
}
