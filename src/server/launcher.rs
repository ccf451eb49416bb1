// src/server/launcher.rs

use crate::config::ScanConfig;
use crate::core::scanner::run_and_report;
use crate::error::{Result, SentinelError};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info};

/// Starts a scan without waiting for it.
pub trait ScanLauncher: Send + Sync {
    fn launch(&self) -> Result<()>;
}

/// Runs the scan as a tokio task. A second task awaits it and logs how it
/// ended; nothing is reported back to whoever triggered it.
pub struct BackgroundScanLauncher {
    config: Arc<ScanConfig>,
}

impl BackgroundScanLauncher {
    pub fn new(config: ScanConfig) -> Self {
        Self { config: Arc::new(config) }
    }
}

impl ScanLauncher for BackgroundScanLauncher {
    fn launch(&self) -> Result<()> {
        let runtime = Handle::try_current().map_err(|e| SentinelError::Launch(e.to_string()))?;

        let config = Arc::clone(&self.config);
        let report_path = config.html_report.clone();
        let scan = runtime.spawn(async move { run_and_report(&config).await });

        runtime.spawn(async move {
            match scan.await {
                Ok(Ok(report)) => info!(
                    target = %report.target,
                    sections = report.sections.len(),
                    report = %report_path.display(),
                    "Background scan completed."
                ),
                Ok(Err(e)) => error!(error = %e, "Background scan failed."),
                Err(e) => error!(error = %e, "Background scan task panicked or was cancelled."),
            }
        });

        info!("Background scan launched.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_outside_a_runtime_fails() {
        let launcher = BackgroundScanLauncher::new(ScanConfig::default());
        assert!(matches!(launcher.launch(), Err(SentinelError::Launch(_))));
    }
}
