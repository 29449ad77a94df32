use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::task::{ParseTokenError, Priority, Task};
use crate::text_matcher::TextMatcher;

/// Priority filter: either every priority or exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriorityFilter {
    /// No filtering.
    #[default]
    All,
    /// Only tasks with this priority.
    Only(Priority),
}

impl PriorityFilter {
    /// Options in the order a picker cycles through them.
    pub const CYCLE: [Self; 4] = [
        Self::All,
        Self::Only(Priority::Low),
        Self::Only(Priority::Medium),
        Self::Only(Priority::High),
    ];

    /// Persisted identifier (`all`, `low`, `medium`, `high`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(priority) => priority.as_str(),
        }
    }

    /// Returns true when `priority` passes the filter.
    #[must_use]
    pub fn accepts(self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == priority,
        }
    }

    /// Next option in [`CYCLE`](Self::CYCLE) order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let position = Self::CYCLE.iter().position(|option| *option == self).unwrap_or(0);
        Self::CYCLE[(position + 1) % Self::CYCLE.len()]
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Priority>()
            .map(Self::Only)
            .map_err(|_| ParseTokenError::new("priority filter", s))
    }
}

impl Serialize for PriorityFilter {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PriorityFilter {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Search and priority criteria applied when deriving the visible set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Free-text query matched against title and description.
    pub query: String,
    /// Priority criterion.
    pub priority: PriorityFilter,
}

impl TaskFilter {
    /// Construct from both criteria.
    #[must_use]
    pub fn new(query: impl Into<String>, priority: PriorityFilter) -> Self {
        Self {
            query: query.into(),
            priority,
        }
    }

    /// Returns true when the filter lets every task through.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.priority == PriorityFilter::All
    }

    /// Compile the filter into a reusable predicate.
    #[must_use]
    pub fn compile(&self) -> CompiledFilter {
        CompiledFilter {
            matcher: TextMatcher::new(&self.query),
            priority: self.priority,
        }
    }

    /// Evaluate the filter against a single task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.compile().matches(task)
    }
}

/// [`TaskFilter`] with the query lowercased once.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    matcher: Option<TextMatcher>,
    priority: PriorityFilter,
}

impl CompiledFilter {
    /// Both predicates must hold.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.priority.accepts(task.priority)
            && self.matcher.as_ref().is_none_or(|matcher| matcher.matches(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use crate::task::TaskDraft;
    use time::OffsetDateTime;

    fn task(title: &str, priority: Priority) -> Task {
        Task::from_draft(
            TaskId::new(),
            OffsetDateTime::UNIX_EPOCH,
            TaskDraft::new(title).with_priority(priority),
        )
    }

    #[test]
    fn priority_filter_tokens() {
        assert_eq!("all".parse::<PriorityFilter>(), Ok(PriorityFilter::All));
        assert_eq!(
            " High ".parse::<PriorityFilter>(),
            Ok(PriorityFilter::Only(Priority::High))
        );
        assert!("urgent".parse::<PriorityFilter>().is_err());
    }

    #[test]
    fn priority_filter_serializes_as_plain_string() {
        let json = serde_json::to_string(&PriorityFilter::Only(Priority::Low))
            .unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(json, "\"low\"");
        let parsed: PriorityFilter =
            serde_json::from_str("\"all\"").unwrap_or_else(|err| panic!("deserialize: {err}"));
        assert_eq!(parsed, PriorityFilter::All);
    }

    #[test]
    fn cycle_wraps_back_to_all() {
        let mut filter = PriorityFilter::All;
        for _ in 0..PriorityFilter::CYCLE.len() {
            filter = filter.next();
        }
        assert_eq!(filter, PriorityFilter::All);
        assert_eq!(PriorityFilter::All.next(), PriorityFilter::Only(Priority::Low));
    }

    #[test]
    fn both_predicates_must_hold() {
        let filter = TaskFilter::new("spec", PriorityFilter::Only(Priority::High));
        assert!(filter.matches(&task("Write spec", Priority::High)));
        assert!(!filter.matches(&task("Write spec", Priority::Low)));
        assert!(!filter.matches(&task("Write docs", Priority::High)));
    }

    #[test]
    fn empty_filter_passes_everything() {
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&task("anything", Priority::Low)));
    }
}
