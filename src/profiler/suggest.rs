//! Fixed rule set turning a window of samples into improvement hints.
//!
//! Rules are independent and additive. Output order follows rule order, and
//! overlapping hints are kept as they are.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::analyzer::mean_duration;
use super::recorder::WINDOW_SIZE;
use super::sample::{Phase, Sample};

/// Updates in a full window above which re-render churn is flagged.
pub const UPDATE_CHURN_LIMIT: usize = 5;
/// Base render time above `threshold * BASE_DURATION_FACTOR` suggests splitting.
pub const BASE_DURATION_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suggestion {
    MemoizeComponent,
    ReviewExpensiveComputation,
    ReviewHookDependencies,
    MemoizeComputation,
    MemoizeEventHandlers,
    SplitOrLazyLoad,
}

impl Suggestion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suggestion::MemoizeComponent => {
                "Consider memoizing the component (e.g. React.memo) to prevent unnecessary re-renders"
            }
            Suggestion::ReviewExpensiveComputation => {
                "Review and optimize expensive computations within the component"
            }
            Suggestion::ReviewHookDependencies => {
                "High update frequency detected - review dependency arrays in useEffect and useMemo hooks"
            }
            Suggestion::MemoizeComputation => "Consider useMemo for expensive computations",
            Suggestion::MemoizeEventHandlers => {
                "Check if useCallback would help prevent recreation of event handlers"
            }
            Suggestion::SplitOrLazyLoad => {
                "Component has high base render time - consider code splitting or lazy loading"
            }
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure: the same window and threshold always give the same list.
pub fn suggest(window: &[&Sample], threshold_ms: f64) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let Some(average) = mean_duration(window) else {
        return suggestions;
    };

    if average > threshold_ms {
        suggestions.push(Suggestion::MemoizeComponent);
        suggestions.push(Suggestion::ReviewExpensiveComputation);
    }

    let updates = window.iter().filter(|s| s.phase == Phase::Update).count();
    if updates > UPDATE_CHURN_LIMIT && window.len() >= WINDOW_SIZE {
        suggestions.push(Suggestion::ReviewHookDependencies);
        suggestions.push(Suggestion::MemoizeComputation);
        suggestions.push(Suggestion::MemoizeEventHandlers);
    }

    if window
        .iter()
        .any(|s| s.base_duration > threshold_ms * BASE_DURATION_FACTOR)
    {
        suggestions.push(Suggestion::SplitOrLazyLoad);
    }

    suggestions
}
