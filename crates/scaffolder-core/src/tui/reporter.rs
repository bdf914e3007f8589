//! Terminal rendering of pipeline progress and notices

use crate::report::{Level, Notice, Reporter, Stage};

/// Shows stages through a spinner and notices through `cliclack::log`
///
/// Notices that arrive while the spinner runs are held back until it stops,
/// so log lines never tear through the spinner line.
pub struct TerminalReporter {
    spinner: Option<cliclack::ProgressBar>,
    held: Vec<Notice>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            spinner: None,
            held: Vec::new(),
        }
    }

    fn print(notice: &Notice) {
        let _ = match notice.level {
            Level::Info => cliclack::log::info(&notice.message),
            Level::Success => cliclack::log::success(&notice.message),
            Level::Warning => cliclack::log::warning(&notice.message),
        };
    }

    fn stop_spinner(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        }
        for notice in std::mem::take(&mut self.held) {
            Self::print(&notice);
        }
    }

    /// Stop a running spinner as failed
    pub fn fail(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error("Failed");
        }
        let _ = console::Term::stderr().show_cursor();
        for notice in std::mem::take(&mut self.held) {
            Self::print(&notice);
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn stage(&mut self, stage: Stage) {
        match stage {
            Stage::Resolved => {
                let spinner = cliclack::spinner();
                spinner.start("Fetching template...");
                self.spinner = Some(spinner);
            }
            Stage::Fetched => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message("Extracting files...");
                }
            }
            Stage::Extracted => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message("Replacing placeholders...");
                }
            }
            Stage::Substituted => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message("Updating manifests...");
                }
            }
            Stage::Patched => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message("Copying resources...");
                }
            }
            Stage::ResourcesInstalled => self.stop_spinner("Project files created"),
            Stage::Start | Stage::HooksRun | Stage::Done => {}
        }
    }

    fn notice(&mut self, notice: Notice) {
        if self.spinner.is_some() {
            self.held.push(notice);
        } else {
            Self::print(&notice);
        }
    }
}
