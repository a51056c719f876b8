use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Which stage of its lifecycle the application is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStatus {
    /// Waiting for a log to be pasted or uploaded
    PendingLog,
    /// A log is being read
    ProcessingLog,
    /// A log is loaded and can be browsed
    Idle,
}

impl AppStatus {
    pub const ALL: [AppStatus; 3] = [
        AppStatus::PendingLog,
        AppStatus::ProcessingLog,
        AppStatus::Idle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppStatus::PendingLog => "PENDING_LOG",
            AppStatus::ProcessingLog => "PROCESSING_LOG",
            AppStatus::Idle => "IDLE",
        }
    }

    /// Label shown to the user, e.g. `status: IDLE`
    pub fn status_label(self) -> String {
        format!("status: {}", self.as_str())
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An effective status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// `None` only for the very first transition
    pub old: Option<AppStatus>,
    pub new: AppStatus,
}

/// Holds the current status and reports effective transitions
///
/// Setting the status it already has is a no-op, so entry actions driven
/// by the returned [`StatusChange`] fire once per transition.
#[derive(Debug, Default)]
pub struct StatusMachine {
    status: Option<AppStatus>,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<AppStatus> {
        self.status
    }

    pub fn set_status(&mut self, new: AppStatus) -> Option<StatusChange> {
        if self.status == Some(new) {
            return None;
        }

        let old = self.status.replace(new);
        tracing::debug!(
            old = old.map(AppStatus::as_str).unwrap_or("-"),
            new = new.as_str(),
            "status changed"
        );
        Some(StatusChange { old, new })
    }
}

/// Identifier of a UI region whose visibility depends on the status
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which UI regions are visible in each status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRegions {
    regions: BTreeMap<AppStatus, BTreeSet<RegionId>>,
}

impl Default for StatusRegions {
    fn default() -> Self {
        Self::empty()
            .with(
                AppStatus::PendingLog,
                ["paste-log", "upload-log", "teaser"],
            )
            .with(AppStatus::ProcessingLog, ["processing", "teaser"])
            .with(
                AppStatus::Idle,
                [
                    "close-log",
                    "date-settings",
                    "filters",
                    "log-container",
                    "line-count",
                    "copy-log",
                    "teaser",
                ],
            )
    }
}

impl StatusRegions {
    /// A mapping with no regions at all
    pub fn empty() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    /// Replace the regions shown for `status`
    pub fn with<I, R>(mut self, status: AppStatus, regions: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RegionId>,
    {
        self.regions
            .insert(status, regions.into_iter().map(Into::into).collect());
        self
    }

    /// Regions shown while in `status`
    pub fn shown_in(&self, status: AppStatus) -> impl Iterator<Item = &RegionId> {
        self.regions.get(&status).into_iter().flatten()
    }

    /// Every region known to the mapping, deduplicated
    pub fn all_regions(&self) -> BTreeSet<&RegionId> {
        self.regions.values().flatten().collect()
    }

    /// Each known region paired with whether it is visible in `status`
    pub fn visibility(&self, status: AppStatus) -> Vec<(RegionId, bool)> {
        let shown = self.regions.get(&status);
        self.all_regions()
            .into_iter()
            .map(|region| {
                let visible = shown.is_some_and(|set| set.contains(region));
                (region.clone(), visible)
            })
            .collect()
    }
}
