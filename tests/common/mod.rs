//! Common test utilities

use std::path::PathBuf;
use vanguard_sentinel::config::ScanConfig;

/// A port on localhost that nothing listens on.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Creates a ScanConfig pointing to a wiremock server, with no delay between
/// probes and the TLS probe aimed at a closed port.
pub fn test_config(target: &str) -> ScanConfig {
    ScanConfig {
        target_url: target.to_string(),
        timeout_secs: 5,
        delay_ms: 0,
        user_agent: "Sentinel-Test/0.1.0".to_string(),
        tls_port: closed_port(),
        ..ScanConfig::default()
    }
}

/// A scratch directory unique to one test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sentinel-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
