//! Notices and stage transitions emitted by the pipeline
//!
//! Stages never write to the terminal themselves. They hand `Notice`s and
//! `Stage` changes to a `Reporter`; the front end decides how to show them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
}

/// A non-fatal message produced by a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }
}

/// Pipeline progress: `Start -> Resolved -> ... -> Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Resolved,
    Fetched,
    Extracted,
    Substituted,
    Patched,
    ResourcesInstalled,
    HooksRun,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Start => "starting",
            Stage::Resolved => "template resolved",
            Stage::Fetched => "template fetched",
            Stage::Extracted => "files extracted",
            Stage::Substituted => "placeholders replaced",
            Stage::Patched => "manifests updated",
            Stage::ResourcesInstalled => "resources installed",
            Stage::HooksRun => "hooks finished",
            Stage::Done => "done",
        };
        f.write_str(label)
    }
}

/// Sink for pipeline output
pub trait Reporter {
    /// Called each time the pipeline reaches `stage`
    fn stage(&mut self, stage: Stage);

    fn notice(&mut self, notice: Notice);
}

/// Reporter that keeps everything in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub stages: Vec<Stage>,
    pub notices: Vec<Notice>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.notices
            .iter()
            .filter(|n| n.level == Level::Warning)
            .map(|n| n.message.as_str())
    }
}

impl Reporter for RecordingReporter {
    fn stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
