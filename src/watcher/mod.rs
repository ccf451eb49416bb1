//! Log watcher: polls a server log and re-runs the scan when a new line
//! looks like an attack.
//!
//! The file is read from a byte-offset cursor so each physical line is
//! consumed exactly once. The cursor goes back to 0 when the file shrinks or
//! is replaced by a different file. Repeated line contents are also skipped
//! while they are still in a bounded ring of recently seen lines.

mod recent;

pub use recent::RecentLines;

use crate::config::{ScanConfig, WatcherConfig};
use crate::core::scanner::run_and_report;
use crate::error::{Result, SentinelError};
use regex::Regex;
use std::fs::{File, Metadata};
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, error, info, warn};

/// A compiled, named suspicious-activity pattern.
#[derive(Debug, Clone)]
pub struct SuspiciousPattern {
    pub name: String,
    pub regex: Regex,
}

/// A new log line that matched one of the patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub pattern: String,
    pub line: String,
}

/// Device and inode of the file the cursor refers to.
type FileIdentity = (u64, u64);

#[cfg(unix)]
fn file_identity(metadata: &Metadata) -> Option<FileIdentity> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn file_identity(_metadata: &Metadata) -> Option<FileIdentity> {
    None
}

pub struct LogWatcher {
    config: WatcherConfig,
    patterns: Vec<SuspiciousPattern>,
    cursor: u64,
    identity: Option<FileIdentity>,
    seen: RecentLines,
}

impl LogWatcher {
    pub fn new(config: WatcherConfig) -> Result<Self> {
        config.validate()?;
        let patterns = config
            .patterns
            .iter()
            .map(|p| {
                Regex::new(&p.regex)
                    .map(|regex| SuspiciousPattern { name: p.name.clone(), regex })
                    .map_err(|e| SentinelError::Config(format!("watch pattern '{}': {}", p.name, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let seen = RecentLines::new(config.dedup_capacity);
        Ok(Self { config, patterns, cursor: 0, identity: None, seen })
    }

    /// Byte offset of the first unread byte.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Returns the name of the first pattern `line` matches.
    pub fn classify(&self, line: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(line))
            .map(|p| p.name.as_str())
    }

    /// Reads complete lines appended since the last poll and returns those
    /// that match a pattern. A missing file counts as empty.
    pub fn poll(&mut self) -> Result<Vec<Detection>> {
        let path = &self.config.log_path;
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Watched log does not exist yet.");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata()?;
        let len = metadata.len();
        let identity = file_identity(&metadata);
        if self.identity.is_some() && identity != self.identity {
            info!(path = %path.display(), "Watched log was replaced, reading from the start.");
            self.cursor = 0;
        } else if len < self.cursor {
            info!(path = %path.display(), "Watched log shrank, reading from the start.");
            self.cursor = 0;
        }
        self.identity = identity;
        if len == self.cursor {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.cursor))?;
        let mut buf = Vec::with_capacity((len - self.cursor) as usize);
        file.read_to_end(&mut buf)?;

        // Only consume up to the last newline; a partial line waits for the next poll.
        let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
            return Ok(Vec::new());
        };
        let complete = &buf[..=last_newline];
        self.cursor += complete.len() as u64;

        let mut detections = Vec::new();
        for raw in complete.split(|&b| b == b'\n') {
            let line = String::from_utf8_lossy(raw);
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || !self.seen.insert(line) {
                continue;
            }
            if let Some(name) = self.classify(line) {
                detections.push(Detection { pattern: name.to_string(), line: line.to_string() });
            }
        }
        Ok(detections)
    }

    /// Polls forever, running a full scan synchronously for every detection.
    pub async fn run(mut self, scan_config: &ScanConfig) -> Result<()> {
        info!(
            path = %self.config.log_path.display(),
            interval_secs = self.config.poll_interval_secs,
            patterns = self.patterns.len(),
            "Watching log for suspicious activity."
        );

        loop {
            if let Err(e) = self.poll_and_scan(scan_config).await {
                error!(error = %e, "Failed to read watched log.");
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    /// One watch step: polls the log and runs a full scan for each detection,
    /// one after another. Returns how many scans were started.
    pub async fn poll_and_scan(&mut self, scan_config: &ScanConfig) -> Result<usize> {
        let detections = self.poll()?;
        for detection in &detections {
            warn!(pattern = %detection.pattern, line = %detection.line, "Suspicious activity detected, running scan.");
            if let Err(e) = run_and_report(scan_config).await {
                error!(error = %e, "Triggered scan failed.");
            }
        }
        Ok(detections.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_log(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sentinel-watch-{}-{}.log", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn append(path: &PathBuf, text: &str) {
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    fn watcher_for(path: &PathBuf) -> LogWatcher {
        LogWatcher::new(WatcherConfig { log_path: path.clone(), ..WatcherConfig::default() }).unwrap()
    }

    #[test]
    fn classifies_with_first_matching_pattern() {
        let watcher = watcher_for(&temp_log("classify"));
        assert_eq!(watcher.classify("GET /search?q=1 UNION SELECT password"), Some("sql-injection"));
        assert_eq!(watcher.classify("GET /?q=<script>alert(1)</script>"), Some("xss"));
        assert_eq!(watcher.classify("GET /../../etc/passwd"), Some("path-traversal"));
        assert_eq!(watcher.classify("GET /.env HTTP/1.1"), Some("scanner-probe"));
        assert_eq!(watcher.classify("GET /index.html HTTP/1.1 200"), None);
    }

    #[test]
    fn lines_are_never_processed_twice() {
        let path = temp_log("twice");
        let mut watcher = watcher_for(&path);

        append(&path, "GET /index.html 200\nGET /.env 404\n");
        let first = watcher.poll().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].pattern, "scanner-probe");

        assert!(watcher.poll().unwrap().is_empty());
        assert!(watcher.poll().unwrap().is_empty());

        append(&path, "GET /?q=<script> 200\n");
        let second = watcher.poll().unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].pattern, "xss");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn repeated_content_is_deduplicated() {
        let path = temp_log("dedup");
        let mut watcher = watcher_for(&path);

        append(&path, "GET /.env 404\n");
        assert_eq!(watcher.poll().unwrap().len(), 1);
        append(&path, "GET /.env 404\n");
        assert!(watcher.poll().unwrap().is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn partial_line_waits_for_newline() {
        let path = temp_log("partial");
        let mut watcher = watcher_for(&path);

        append(&path, "GET /wp-config.php");
        assert!(watcher.poll().unwrap().is_empty());
        assert_eq!(watcher.cursor(), 0);

        append(&path, " 404\n");
        let detections = watcher.poll().unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].line, "GET /wp-config.php 404");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn truncated_log_is_reread_from_start() {
        let path = temp_log("truncate");
        let mut watcher = watcher_for(&path);

        append(&path, "GET /index.html 200\nGET /about.html 200\n");
        assert!(watcher.poll().unwrap().is_empty());

        std::fs::write(&path, "GET /phpmyadmin 403\n").unwrap();
        let detections = watcher.poll().unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].pattern, "scanner-probe");

        std::fs::remove_file(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn replaced_log_is_reread_even_when_longer() {
        let path = temp_log("rotate");
        let mut watcher = watcher_for(&path);

        append(&path, "GET /index.html 200\n");
        assert!(watcher.poll().unwrap().is_empty());
        assert_eq!(watcher.cursor(), 20);

        let rotated = path.with_extension("new");
        std::fs::write(&rotated, "GET /.env 404 from 10.0.0.1\nGET /home.html 200 ok ok\n").unwrap();
        std::fs::rename(&rotated, &path).unwrap();

        let detections = watcher.poll().unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].line, "GET /.env 404 from 10.0.0.1");
        assert_eq!(watcher.cursor(), std::fs::metadata(&path).unwrap().len());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_empty() {
        let mut watcher = watcher_for(&temp_log("missing"));
        assert!(watcher.poll().unwrap().is_empty());
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let config = WatcherConfig {
            patterns: vec![crate::config::PatternConfig { name: "bad".to_string(), regex: "(".to_string() }],
            ..WatcherConfig::default()
        };
        assert!(matches!(LogWatcher::new(config), Err(SentinelError::Config(_))));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let config = WatcherConfig { poll_interval_secs: 0, ..WatcherConfig::default() };
        assert!(matches!(LogWatcher::new(config), Err(SentinelError::Config(_))));
    }
}
