//! Derived views over the full robot list: the filtered table and the summary
//! cards shown on the monitoring dashboard.

use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{prelude::AlertKind, robot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Resolved,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(StatusFilter::All),
            "true" => Some(StatusFilter::Active),
            "false" => Some(StatusFilter::Resolved),
            _ => None,
        }
    }

    fn matches(&self, status: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status,
            StatusFilter::Resolved => !status,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlertFilter {
    #[default]
    All,
    /// Robots without an alert.
    NoAlert,
    Kind(AlertKind),
}

impl AlertFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(AlertFilter::All),
            "none" => Some(AlertFilter::NoAlert),
            other => AlertKind::parse(other).map(AlertFilter::Kind),
        }
    }

    fn matches(&self, alert: Option<AlertKind>) -> bool {
        match self {
            AlertFilter::All => true,
            AlertFilter::NoAlert => alert.is_none(),
            AlertFilter::Kind(kind) => alert == Some(*kind),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending id, the order of the robots table.
    #[default]
    Id,
    /// Most recently updated first.
    Recent,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(SortOrder::Id),
            "recent" => Some(SortOrder::Recent),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RobotFilter {
    /// Lowercased; empty matches every name.
    pub search: String,
    pub status: StatusFilter,
    pub alert: AlertFilter,
}

impl RobotFilter {
    pub fn new(search: &str, status: StatusFilter, alert: AlertFilter) -> Self {
        Self {
            search: search.to_lowercase(),
            status,
            alert,
        }
    }

    pub fn matches(&self, robot: &robot::Model) -> bool {
        robot.name.to_lowercase().contains(&self.search)
            && self.status.matches(robot.status)
            && self.alert.matches(robot.alert)
    }

    pub fn apply<'a>(&self, robots: &'a [robot::Model]) -> Vec<&'a robot::Model> {
        robots.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub total: u64,
    pub system_exception: u64,
    pub scheduled_start_failure: u64,
    pub runtime_exceeded: u64,
    pub terminated: u64,
}

impl AlertStats {
    pub fn count(&self, kind: AlertKind) -> u64 {
        match kind {
            AlertKind::SystemException => self.system_exception,
            AlertKind::ScheduledStartFailure => self.scheduled_start_failure,
            AlertKind::RuntimeExceeded => self.runtime_exceeded,
            AlertKind::Terminated => self.terminated,
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: AlertKind) -> &mut u64 {
        match kind {
            AlertKind::SystemException => &mut self.system_exception,
            AlertKind::ScheduledStartFailure => &mut self.scheduled_start_failure,
            AlertKind::RuntimeExceeded => &mut self.runtime_exceeded,
            AlertKind::Terminated => &mut self.terminated,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: u64,
    pub active: u64,
    pub resolved: u64,
    pub alerts: AlertStats,
}

impl DashboardStats {
    pub fn from_robots(robots: &[robot::Model]) -> Self {
        let mut stats = DashboardStats::default();
        for robot in robots {
            stats.total += 1;
            if robot.status {
                stats.active += 1;
            } else {
                stats.resolved += 1;
            }
            if let Some(kind) = robot.alert {
                stats.alerts.total += 1;
                *stats.alerts.slot_mut(kind) += 1;
            }
        }
        stats
    }
}
