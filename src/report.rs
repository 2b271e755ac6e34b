use std::fmt;
use std::path;

/// Collects what happened during one build.
///
/// Every message is forwarded to the `log` facade; warnings and written files
/// are also kept so callers can inspect them afterwards.
#[derive(Debug, Clone, Default)]
pub struct Report {
    warnings: Vec<String>,
    written: Vec<path::PathBuf>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl fmt::Display) {
        log::info!("{message}");
    }

    pub fn debug(&mut self, message: impl fmt::Display) {
        log::debug!("{message}");
    }

    pub fn warn(&mut self, message: impl fmt::Display) {
        let message = message.to_string();
        log::warn!("{message}");
        self.warnings.push(message);
    }

    /// Record an output file.
    pub fn wrote(&mut self, dest: &path::Path, written: makesite_core::Written) {
        match written {
            makesite_core::Written::Created => {
                self.debug(format_args!("Wrote {}", dest.display()));
            }
            makesite_core::Written::Overwrote => {
                self.warn(format_args!("Overwrote existing file {}", dest.display()));
            }
        }
        self.written.push(dest.to_owned());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn written(&self) -> &[path::PathBuf] {
        &self.written
    }
}
