// src/core/scanner/ssl_scanner.rs

use tracing::{debug, error, info};

use crate::config::ScanConfig;
use crate::core::models::{AnalysisFinding, CertificateInfo, ScanResult, Section, SectionOutcome, Severity, SslData};
use chrono::{DateTime, Utc};
use native_tls::TlsConnector;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tokio::task::spawn_blocking;
use x509_parser::prelude::*;

/// Extracts the host the TLS probe should connect to.
pub fn target_host(target_url: &str) -> Result<String, String> {
    let url = url::Url::parse(target_url).map_err(|e| format!("Invalid target URL: {}", e))?;
    url.host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
        .ok_or_else(|| "Target URL has no host".to_string())
}

pub async fn run_ssl_check(config: &ScanConfig) -> SectionOutcome {
    info!(target = %config.target_url, port = config.tls_port, "Starting SSL/TLS inspection.");

    let host = match target_host(&config.target_url) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Cannot derive TLS host.");
            return build_outcome(Err(e));
        }
    };
    let port = config.tls_port;
    let timeout = config.timeout();

    debug!("Spawning blocking task for TLS connection.");
    let scan_result = spawn_blocking(move || perform_tls_scan(&host, port, timeout))
        .await
        .unwrap_or_else(|e| {
            error!(panic = %e, "Blocking SSL scan task panicked!");
            Err(format!("Task panicked: {}", e))
        });

    let outcome = build_outcome(scan_result);
    info!(findings = outcome.findings.len(), "SSL/TLS inspection finished.");
    outcome
}

fn connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, String> {
    let addrs = (host, port).to_socket_addrs().map_err(|e| {
        error!(error = %e, "Address resolution failed");
        format!("DNS Resolution Error: {}", e)
    })?;

    let mut last_error = format!("No addresses found for {}", host);
    for addr in addrs {
        debug!(%addr, "Connecting TCP stream.");
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                stream.set_read_timeout(Some(timeout)).map_err(|e| e.to_string())?;
                stream.set_write_timeout(Some(timeout)).map_err(|e| e.to_string())?;
                return Ok(stream);
            }
            Err(e) => last_error = format!("TCP Connection Error: {}", e),
        }
    }
    error!(error = %last_error, "TCP connection failed");
    Err(last_error)
}

fn perform_tls_scan(host: &str, port: u16, timeout: Duration) -> ScanResult<SslData> {
    debug!(host, port, "Performing TLS connection and handshake.");

    // Untrusted or expired certificates still complete the handshake so they
    // can be inspected; the validity window is checked below.
    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to create TlsConnector");
            format!("TlsConnector Error: {}", e)
        })?;

    let stream = connect(host, port, timeout)?;

    let stream = connector.connect(host, stream).map_err(|e| {
        error!(error = %e, "TLS handshake failed");
        format!("TLS Handshake Error: {}", e)
    })?;

    let cert = match stream.peer_certificate() {
        Ok(Some(c)) => c,
        Ok(None) => {
            debug!("TLS connection successful, but no peer certificate provided.");
            return Ok(None);
        }
        Err(e) => {
            error!(error = %e, "Failed to retrieve peer certificate from stream");
            return Err(format!("Could not get peer certificate: {}", e));
        }
    };

    let cert_der = cert.to_der().map_err(|e| {
        error!(error = %e, "Failed to convert certificate to DER format");
        format!("Could not convert certificate to DER: {}", e)
    })?;

    let (_, x509) = parse_x509_certificate(&cert_der).map_err(|e| {
        error!(error = %e, "Failed to parse X.509 certificate");
        format!("X.509 Parse Error: {}", e)
    })?;

    info!(subject = %x509.subject(), issuer = %x509.issuer(), "Successfully parsed certificate.");

    let validity = x509.validity();
    let not_after = asn1_time_to_chrono_utc(&validity.not_after);
    let not_before = asn1_time_to_chrono_utc(&validity.not_before);
    let now = Utc::now();
    let days_until_expiry = not_after.signed_duration_since(now).num_days();
    let is_valid = now > not_before && now < not_after;

    Ok(Some(SslData {
        is_valid,
        certificate_info: CertificateInfo {
            subject_name: x509.subject().to_string(),
            issuer_name: x509.issuer().to_string(),
            not_before,
            not_after,
            days_until_expiry,
        },
    }))
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}

/// Renders the probe result as report text and attaches its findings.
pub fn build_outcome(scan: ScanResult<SslData>) -> SectionOutcome {
    let findings = analyze_ssl_result(&scan);
    let text = match &scan {
        Ok(Some(data)) => {
            let info = &data.certificate_info;
            format!(
                "SSL/TLS certificate: Subject={}, Issuer={}, Validity={} ({} days left)",
                info.subject_name,
                info.issuer_name,
                info.not_after.format("%Y-%m-%d %H:%M:%S UTC"),
                info.days_until_expiry
            )
        }
        Ok(None) => "SSL/TLS check failed: server presented no certificate".to_string(),
        Err(e) => format!("SSL/TLS check failed: {}", e),
    };
    SectionOutcome::new(Section::SslTls, text, findings)
}

fn analyze_ssl_result(scan: &ScanResult<SslData>) -> Vec<AnalysisFinding> {
    debug!("Analyzing SSL scan results.");
    let mut analyses = Vec::new();

    match scan {
        Err(_) => {
            analyses.push(AnalysisFinding::new(Severity::Critical, "SSL_HANDSHAKE_FAILED"));
        }
        Ok(None) => {
            analyses.push(AnalysisFinding::new(Severity::Warning, "SSL_NO_CERTIFICATE_FOUND"));
        }
        Ok(Some(ssl_data)) => {
            if !ssl_data.is_valid {
                debug!(expiry_date = %ssl_data.certificate_info.not_after, "Certificate is not valid now.");
                analyses.push(AnalysisFinding::new(Severity::Critical, "SSL_EXPIRED"));
            }

            let days_left = ssl_data.certificate_info.days_until_expiry;
            if (0..=30).contains(&days_left) {
                debug!(days_left, "Certificate is expiring soon.");
                analyses.push(AnalysisFinding::new(Severity::Warning, "SSL_EXPIRING_SOON"));
            }
        }
    }

    analyses
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn cert_data(days_left: i64) -> SslData {
        let now = Utc::now();
        SslData {
            is_valid: days_left >= 0,
            certificate_info: CertificateInfo {
                subject_name: "CN=example.com".to_string(),
                issuer_name: "CN=Test CA".to_string(),
                not_before: now - ChronoDuration::days(60),
                not_after: now + ChronoDuration::days(days_left),
                days_until_expiry: days_left,
            },
        }
    }

    #[test]
    fn extracts_host_from_url() {
        assert_eq!(target_host("https://sami.example/path?x=1").unwrap(), "sami.example");
        assert_eq!(target_host("http://127.0.0.1:8080/").unwrap(), "127.0.0.1");
        assert!(target_host("nonsense").is_err());
    }

    #[test]
    fn healthy_certificate_has_no_findings() {
        let outcome = build_outcome(Ok(Some(cert_data(200))));
        assert!(outcome.text.starts_with("SSL/TLS certificate: Subject=CN=example.com"));
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn expiring_and_expired_certificates_are_flagged() {
        let soon = build_outcome(Ok(Some(cert_data(10))));
        assert_eq!(soon.findings[0].code, "SSL_EXPIRING_SOON");

        let expired = build_outcome(Ok(Some(cert_data(-3))));
        assert_eq!(expired.findings[0].code, "SSL_EXPIRED");
        assert!(expired.is_flagged());
    }

    #[test]
    fn failure_is_reported_in_text() {
        let outcome = build_outcome(Err("TCP Connection Error: refused".to_string()));
        assert_eq!(outcome.text, "SSL/TLS check failed: TCP Connection Error: refused");
        assert_eq!(outcome.findings[0].code, "SSL_HANDSHAKE_FAILED");
    }

    #[tokio::test]
    async fn closed_port_fails_without_aborting() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ScanConfig {
            target_url: "https://127.0.0.1/".to_string(),
            tls_port: port,
            timeout_secs: 2,
            ..ScanConfig::default()
        };
        let outcome = run_ssl_check(&config).await;
        assert!(outcome.text.starts_with("SSL/TLS check failed: "));
        assert_eq!(outcome.section, Section::SslTls);
    }
}
