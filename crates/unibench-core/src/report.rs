//! Narrative research output shipped alongside the measurements: key findings,
//! recommendations, cited sources, and the planned next phase.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::DatasetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Critical,
    Warning,
    Opportunity,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            FindingKind::Critical => "critical",
            FindingKind::Warning => "warning",
            FindingKind::Opportunity => "opportunity",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        })
    }
}

/// A finding metric is either a count or a free-text placeholder such as
/// `"TBD"` or `"2-3 per week"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingMetric {
    pub current: MetricValue,
    pub target: MetricValue,
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFinding {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    /// 1 is most urgent.
    pub priority: u8,
    pub metric: Option<FindingMetric>,
}

/// Declared most-urgent first, so the derived `Ord` sorts by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    Immediate,
    High,
    Medium,
    Low,
}

impl RecommendationPriority {
    pub const ALL: [RecommendationPriority; 4] = [
        RecommendationPriority::Immediate,
        RecommendationPriority::High,
        RecommendationPriority::Medium,
        RecommendationPriority::Low,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationPriority::Immediate => "immediate",
            RecommendationPriority::High => "high",
            RecommendationPriority::Medium => "medium",
            RecommendationPriority::Low => "low",
        }
    }
}

impl std::fmt::Display for RecommendationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for RecommendationPriority {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| {
                DatasetError::InvariantViolation(format!(
                    "unknown recommendation priority '{s}'; expected immediate, high, medium, or low"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: u32,
    pub priority: RecommendationPriority,
    pub category: String,
    pub action: String,
    pub rationale: String,
    #[serde(default)]
    pub implementation: Vec<String>,
    pub expected_impact: String,
    pub timeframe: String,
    pub resources: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Primary,
    Secondary,
}

/// A cited source. Primary sources list the profiles that were read;
/// secondary sources are published reports with a single URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub name: String,
    pub title: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub urls: Vec<String>,
    pub url: Option<String>,
}

impl Source {
    /// Every URL the source cites.
    pub fn all_urls(&self) -> impl Iterator<Item = &str> {
        self.url.as_deref().into_iter().chain(self.urls.iter().map(String::as_str))
    }
}

/// Platform coverage of the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformGaps {
    /// `None` until the subject's active platforms are counted.
    pub active: Option<u32>,
    pub recommended: u32,
    #[serde(default)]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPhase {
    #[serde(default)]
    pub tasks: Vec<String>,
    pub timeline: String,
    pub deliverable: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchReport {
    pub key_findings: Vec<KeyFinding>,
    pub recommendations: Vec<Recommendation>,
    pub sources: Vec<Source>,
    pub platform_gaps: Option<PlatformGaps>,
    pub next_phase: Option<NextPhase>,
}

impl ResearchReport {
    /// Recommendations at or above `priority`, most urgent first. The sort is
    /// stable, so ties keep dataset order.
    #[must_use]
    pub fn recommendations_at_least(
        &self,
        priority: RecommendationPriority,
    ) -> Vec<&Recommendation> {
        let mut selected: Vec<&Recommendation> = self
            .recommendations
            .iter()
            .filter(|r| r.priority <= priority)
            .collect();
        selected.sort_by_key(|r| r.priority);
        selected
    }

    /// Findings ordered by priority number, dataset order within a priority.
    #[must_use]
    pub fn findings_by_priority(&self) -> Vec<&KeyFinding> {
        let mut sorted: Vec<&KeyFinding> = self.key_findings.iter().collect();
        sorted.sort_by_key(|f| f.priority);
        sorted
    }

    pub(crate) fn validate(&self) -> Result<(), DatasetError> {
        let violation =
            |msg: String| -> Result<(), DatasetError> { Err(DatasetError::InvariantViolation(msg)) };

        let mut seen = HashSet::new();
        for finding in &self.key_findings {
            if !seen.insert(finding.id) {
                return violation(format!("duplicate key finding id {}", finding.id));
            }
            if finding.title.trim().is_empty() {
                return violation(format!("key finding {} has an empty title", finding.id));
            }
            if finding.priority == 0 {
                return violation(format!(
                    "key finding {} priority must be at least 1",
                    finding.id
                ));
            }
        }

        let mut seen = HashSet::new();
        for rec in &self.recommendations {
            if !seen.insert(rec.id) {
                return violation(format!("duplicate recommendation id {}", rec.id));
            }
            if rec.action.trim().is_empty() {
                return violation(format!("recommendation {} has an empty action", rec.id));
            }
        }

        for source in &self.sources {
            if source.name.trim().is_empty() {
                return violation("source with an empty name".to_string());
            }
            if source.all_urls().next().is_none() {
                return violation(format!("source '{}' cites no url", source.name));
            }
            if let Some(bad) = source
                .all_urls()
                .find(|u| !(u.starts_with("https://") || u.starts_with("http://")))
            {
                return violation(format!(
                    "source '{}' has a non-http url '{bad}'",
                    source.name
                ));
            }
        }

        Ok(())
    }
}
