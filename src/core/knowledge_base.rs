//! Static, read-only database of every finding the scanner can raise,
//! with human-readable explanations and remediation steps.
//! The console and the HTML report both look findings up here by code.

use crate::core::models::Severity;
use std::fmt;

/// High-level grouping of findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingCategory {
    Availability,
    Http,
    Content,
    Exposure,
    Injection,
    Ssl,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingCategory::Availability => write!(f, "Availability"),
            FindingCategory::Http => write!(f, "HTTP Security Headers"),
            FindingCategory::Content => write!(f, "Page Content"),
            FindingCategory::Exposure => write!(f, "Sensitive Paths"),
            FindingCategory::Injection => write!(f, "Injection"),
            FindingCategory::Ssl => write!(f, "SSL/TLS Certificate"),
        }
    }
}

/// All the human-readable information about one finding code.
pub struct FindingDetail {
    /// Machine-readable identifier (e.g. "PATH_EXPOSED").
    pub code: &'static str,
    pub title: &'static str,
    pub category: FindingCategory,
    pub severity: Severity,
    pub description: &'static str,
    pub remediation: &'static str,
}

static FINDINGS: &[FindingDetail] = &[
    // --- Availability ---
    FindingDetail {
        code: "STATUS_UNREACHABLE",
        title: "Website Not Reachable",
        category: FindingCategory::Availability,
        severity: Severity::Critical,
        description: "The scanner could not fetch the target URL at all. Every other check depends on this request, so none of them ran.",
        remediation: "Verify that the site is online and reachable from the scanning host. Check DNS, firewalls and whether automated clients are being blocked.",
    },
    FindingDetail {
        code: "STATUS_HTTP_ERROR",
        title: "Homepage Returned an Error Status",
        category: FindingCategory::Availability,
        severity: Severity::Warning,
        description: "The homepage answered with a 4xx or 5xx status code. Header and content checks ran against an error page, not the real site.",
        remediation: "Check the web server and application logs for the cause of the error response and confirm the configured target URL is correct.",
    },

    // --- HTTP Headers ---
    FindingDetail {
        code: "HEADERS_STRICT_TRANSPORT_SECURITY_MISSING",
        title: "HSTS Header Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "The HTTP Strict-Transport-Security (HSTS) header instructs browsers to only communicate with your site over HTTPS. It protects against protocol downgrade attacks and cookie hijacking.",
        remediation: "Add the 'Strict-Transport-Security' header to your web server responses. A strong value is 'max-age=31536000; includeSubDomains; preload'.",
    },
    FindingDetail {
        code: "HEADERS_CONTENT_SECURITY_POLICY_MISSING",
        title: "CSP Header Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "Content-Security-Policy (CSP) helps prevent Cross-Site Scripting (XSS) and data injection by defining which resources a browser is allowed to load.",
        remediation: "Implement a Content-Security-Policy header that defines trusted sources for scripts, styles, and other assets. Start restrictive and open it up as needed.",
    },
    FindingDetail {
        code: "HEADERS_X_FRAME_OPTIONS_MISSING",
        title: "X-Frame-Options Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "This header protects your visitors against clickjacking, where an attacker loads your site in an invisible iframe to trick users into clicking on malicious content.",
        remediation: "Add the 'X-Frame-Options' header and set it to 'DENY' or 'SAMEORIGIN'.",
    },
    FindingDetail {
        code: "HEADERS_X_CONTENT_TYPE_OPTIONS_MISSING",
        title: "X-Content-Type-Options Missing",
        category: FindingCategory::Http,
        severity: Severity::Info,
        description: "This header prevents browsers from guessing the content type of a file (MIME sniffing), which mitigates attacks where a disguised file is executed as a script.",
        remediation: "Add the 'X-Content-Type-Options' header and set its value to 'nosniff'.",
    },
    FindingDetail {
        code: "HEADERS_REFERRER_POLICY_MISSING",
        title: "Referrer-Policy Missing",
        category: FindingCategory::Http,
        severity: Severity::Info,
        description: "Without a Referrer-Policy, browsers may send the full URL of your pages, including query strings, to third-party sites.",
        remediation: "Add 'Referrer-Policy: strict-origin-when-cross-origin' or a stricter value.",
    },
    FindingDetail {
        code: "HEADERS_PERMISSIONS_POLICY_MISSING",
        title: "Permissions-Policy Missing",
        category: FindingCategory::Http,
        severity: Severity::Info,
        description: "Permissions-Policy restricts which browser features (camera, geolocation, microphone) the page and embedded frames may use.",
        remediation: "Add a Permissions-Policy header that disables the features the site does not need, e.g. 'camera=(), microphone=(), geolocation=()'.",
    },

    // --- Content ---
    FindingDetail {
        code: "MALWARE_PATTERN_DETECTED",
        title: "Suspicious Code Pattern in Page",
        category: FindingCategory::Content,
        severity: Severity::Critical,
        description: "The homepage contains a fragment commonly found in injected or obfuscated malicious code, such as dynamic evaluation or shell execution calls.",
        remediation: "Inspect the page source and the files that produce it. Compare against a known-good deployment and remove any code you did not write.",
    },

    // --- Exposure ---
    FindingDetail {
        code: "PATH_EXPOSED",
        title: "Sensitive Path Publicly Accessible",
        category: FindingCategory::Exposure,
        severity: Severity::Critical,
        description: "A path usually reserved for configuration files, backups or admin panels answered with 200 OK to an anonymous request.",
        remediation: "Remove the file from the web root or block the path at the web server. Admin surfaces should require authentication.",
    },

    // --- Injection ---
    FindingDetail {
        code: "INJECTION_SQLI_SUSPECTED",
        title: "Possible SQL Injection",
        category: FindingCategory::Injection,
        severity: Severity::Critical,
        description: "A response to a crafted query parameter mentioned SQL or a syntax error, which often means user input reaches a database query unescaped.",
        remediation: "Use parameterised queries everywhere and never expose database error messages to clients.",
    },
    FindingDetail {
        code: "INJECTION_REFLECTION",
        title: "Payload Reflected in Response",
        category: FindingCategory::Injection,
        severity: Severity::Warning,
        description: "A crafted payload was echoed back verbatim in the page, a typical precondition for cross-site scripting or file inclusion.",
        remediation: "Encode all user-supplied data on output according to its context and validate input against an allow-list.",
    },

    // --- SSL/TLS ---
    FindingDetail {
        code: "SSL_HANDSHAKE_FAILED",
        title: "TLS Handshake Failed",
        category: FindingCategory::Ssl,
        severity: Severity::Critical,
        description: "The scanner could not establish a secure TLS connection with the server. This can be caused by an invalid or missing certificate, unsupported cipher suites, or other server misconfigurations.",
        remediation: "Ensure a valid, trusted SSL/TLS certificate is installed for the correct domain and that port 443 is reachable.",
    },
    FindingDetail {
        code: "SSL_NO_CERTIFICATE_FOUND",
        title: "No Certificate Presented",
        category: FindingCategory::Ssl,
        severity: Severity::Warning,
        description: "The TLS handshake completed but the server did not present a certificate.",
        remediation: "Configure the server to present its certificate chain on every TLS connection.",
    },
    FindingDetail {
        code: "SSL_EXPIRED",
        title: "SSL Certificate Expired",
        category: FindingCategory::Ssl,
        severity: Severity::Critical,
        description: "The website's SSL certificate is expired or not yet valid. Browsers will show prominent warnings and block access.",
        remediation: "Renew the certificate immediately and automate renewals (e.g. via Let's Encrypt / Certbot).",
    },
    FindingDetail {
        code: "SSL_EXPIRING_SOON",
        title: "SSL Certificate Expiring Soon",
        category: FindingCategory::Ssl,
        severity: Severity::Warning,
        description: "The SSL certificate will expire in less than 30 days.",
        remediation: "Renew the certificate before it expires. If renewals are automated, verify the job is running.",
    },
];

/// Looks up the detail for a finding code.
pub fn get_finding_detail(code: &str) -> Option<&'static FindingDetail> {
    FINDINGS.iter().find(|f| f.code == code)
}

/// Knowledge-base code for a missing security header, e.g.
/// `X-Frame-Options` becomes `HEADERS_X_FRAME_OPTIONS_MISSING`.
pub fn missing_header_code(header: &str) -> String {
    format!("HEADERS_{}_MISSING", header.to_uppercase().replace('-', "_"))
}
