use crate::theme::Tone;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One funding opportunity - immutable once it leaves the data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub organization: String,
    /// Display string only, e.g. "€2.5M - €15M". Never parsed.
    pub amount: String,
    pub deadline: NaiveDate,
    pub region: String,
    pub category: String,
    pub priority: Priority,
    pub status: Status,
    pub description: String,
    pub tags: Vec<String>,
}

/// Untyped shape of an opportunity as it arrives from a source
///
/// Closed-set fields and the deadline are plain strings here so that a bad
/// value surfaces as a precise error instead of a generic serde message.
#[derive(Debug, Clone, Deserialize)]
pub struct OpportunityRecord {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub amount: String,
    pub deadline: String,
    pub region: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<OpportunityRecord> for Opportunity {
    type Error = Error;

    fn try_from(record: OpportunityRecord) -> Result<Self> {
        let deadline = NaiveDate::parse_from_str(record.deadline.trim(), "%Y-%m-%d").map_err(
            |_| Error::InvalidDeadline {
                id: record.id.clone(),
                value: record.deadline.clone(),
            },
        )?;

        Ok(Self {
            priority: record.priority.parse()?,
            status: record.status.parse()?,
            id: record.id,
            title: record.title,
            organization: record.organization,
            amount: record.amount,
            deadline,
            region: record.region,
            category: record.category,
            description: record.description,
            tags: record.tags,
        })
    }
}

/// Visual urgency of an opportunity, independent of its status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Label shown next to the priority marker
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Baja",
            Priority::Medium => "Media",
            Priority::High => "Alta",
            Priority::Urgent => "Urgente",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Priority::Low => Tone::Muted,
            Priority::Medium => Tone::Warning,
            Priority::High => Tone::Secondary,
            Priority::Urgent => Tone::Danger,
        }
    }

    /// Clock for the calm priorities, warning triangle for the pressing ones
    pub fn symbol(&self) -> &'static str {
        match self {
            Priority::Low | Priority::Medium => "◷",
            Priority::High | Priority::Urgent => "⚠",
        }
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(Error::InvalidPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Workflow stage an opportunity sits in
///
/// The wire values are the labels the fixture data uses (`nueva`,
/// `evaluando`, ...). Parsing also accepts the English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "nueva")]
    New,
    #[serde(rename = "evaluando")]
    Evaluating,
    #[serde(rename = "preparando")]
    Preparing,
    #[serde(rename = "presentada")]
    Submitted,
}

impl Status {
    /// Tab order on the status selector
    pub const ALL: [Status; 4] = [
        Status::New,
        Status::Evaluating,
        Status::Preparing,
        Status::Submitted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "nueva",
            Status::Evaluating => "evaluando",
            Status::Preparing => "preparando",
            Status::Submitted => "presentada",
        }
    }

    /// Badge label on a card
    pub fn label(&self) -> &'static str {
        match self {
            Status::New => "Nueva",
            Status::Evaluating => "En Evaluación",
            Status::Preparing => "Preparando",
            Status::Submitted => "Presentada",
        }
    }

    /// Label on the status selector tab
    pub fn tab_label(&self) -> &'static str {
        match self {
            Status::New => "Nuevas",
            Status::Evaluating => "En Evaluación",
            Status::Preparing => "Preparando",
            Status::Submitted => "Presentadas",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Status::New => Tone::Primary,
            Status::Evaluating => Tone::Warning,
            Status::Preparing => Tone::Secondary,
            Status::Submitted => Tone::Muted,
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nueva" | "new" => Ok(Status::New),
            "evaluando" | "evaluating" => Ok(Status::Evaluating),
            "preparando" | "preparing" => Ok(Status::Preparing),
            "presentada" | "submitted" => Ok(Status::Submitted),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status selector state: either every status or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    /// Selector tabs in display order, "all" first
    pub const TABS: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Only(Status::New),
        StatusFilter::Only(Status::Evaluating),
        StatusFilter::Only(Status::Preparing),
        StatusFilter::Only(Status::Submitted),
    ];

    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "Todas",
            StatusFilter::Only(status) => status.tab_label(),
        }
    }

    /// Next tab, wrapping around after the last one
    pub fn next(&self) -> Self {
        let idx = self.tab_index();
        Self::TABS[(idx + 1) % Self::TABS.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = self.tab_index();
        Self::TABS[(idx + Self::TABS.len() - 1) % Self::TABS.len()]
    }

    pub fn tab_index(&self) -> usize {
        match self {
            StatusFilter::All => 0,
            StatusFilter::Only(Status::New) => 1,
            StatusFilter::Only(Status::Evaluating) => 2,
            StatusFilter::Only(Status::Preparing) => 3,
            StatusFilter::Only(Status::Submitted) => 4,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todas" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        StatusFilter::Only(status)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
