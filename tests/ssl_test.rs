//! TLS inspection against a local server presenting an expired certificate

mod common;

use common::test_config;
use native_tls::{Identity, TlsAcceptor};
use std::io::Read;
use std::net::TcpListener;
use std::thread;
use vanguard_sentinel::config::ScanConfig;
use vanguard_sentinel::core::scanner::ssl_scanner::run_ssl_check;

const EXPIRED_CERT: &[u8] = include_bytes!("fixtures/expired_cert.pem");
const EXPIRED_KEY: &[u8] = include_bytes!("fixtures/expired_key.pem");

/// Serves one TLS handshake with the expired certificate and returns the port.
fn expired_tls_server() -> u16 {
    let identity = Identity::from_pkcs8(EXPIRED_CERT, EXPIRED_KEY).expect("fixture identity");
    let acceptor = TlsAcceptor::new(identity).expect("acceptor");
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            if let Ok(mut tls) = acceptor.accept(stream) {
                // Hold the session open until the client hangs up.
                let mut buf = [0u8; 64];
                let _ = tls.read(&mut buf);
            }
        }
    });
    port
}

#[tokio::test]
async fn expired_certificate_is_inspected_and_flagged() {
    let port = expired_tls_server();
    let config = ScanConfig {
        tls_port: port,
        ..test_config("https://127.0.0.1/")
    };

    let outcome = run_ssl_check(&config).await;

    assert!(
        outcome.text.starts_with("SSL/TLS certificate: Subject=CN=expired.sentinel.test"),
        "got {}",
        outcome.text
    );
    assert!(outcome.text.contains("Validity=2020-02-01 00:00:00 UTC"));
    let codes: Vec<&str> = outcome.findings.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec!["SSL_EXPIRED"]);
    assert!(outcome.is_flagged());
}
