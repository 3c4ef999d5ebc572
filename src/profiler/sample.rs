use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SampleError;

/// Which kind of render produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// First render of a component instance.
    #[serde(alias = "initial")]
    Mount,
    /// Any re-render after the first.
    #[serde(alias = "subsequent")]
    Update,
}

/// Host-provided interaction set attached to a render event.
///
/// The profiler carries it along with the sample and never looks inside.
#[derive(Clone, Default)]
pub struct Interactions(Option<Arc<dyn Any + Send + Sync>>);

impl Interactions {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn wrap<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for Interactions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Interactions(..)"),
            None => f.write_str("Interactions(none)"),
        }
    }
}

/// One timing measurement of a single render. Durations are milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub key: String,
    pub phase: Phase,
    pub actual_duration: f64,
    pub base_duration: f64,
    pub start_time: f64,
    pub commit_time: f64,
    #[serde(skip)]
    pub interactions: Interactions,
}

impl Sample {
    pub fn new(key: impl Into<String>, phase: Phase, actual_duration: f64, base_duration: f64) -> Self {
        Self {
            key: key.into(),
            phase,
            actual_duration,
            base_duration,
            start_time: 0.0,
            commit_time: 0.0,
            interactions: Interactions::none(),
        }
    }

    pub fn with_timing(mut self, start_time: f64, commit_time: f64) -> Self {
        self.start_time = start_time;
        self.commit_time = commit_time;
        self
    }

    pub fn with_interactions(mut self, interactions: Interactions) -> Self {
        self.interactions = interactions;
        self
    }

    /// Checks the fields the analyzer depends on. Timestamps are passed through as-is.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.key.trim().is_empty() {
            return Err(SampleError::MissingKey);
        }
        check_duration("actual_duration", self.actual_duration)?;
        check_duration("base_duration", self.base_duration)?;
        Ok(())
    }
}

fn check_duration(field: &'static str, value: f64) -> Result<(), SampleError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SampleError::InvalidDuration { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_key() {
        let sample = Sample::new("  ", Phase::Mount, 1.0, 1.0);
        assert!(matches!(sample.validate(), Err(SampleError::MissingKey)));
    }

    #[test]
    fn rejects_non_finite_durations() {
        let nan = Sample::new("a", Phase::Update, f64::NAN, 1.0);
        assert!(matches!(
            nan.validate(),
            Err(SampleError::InvalidDuration { field: "actual_duration", .. })
        ));

        let inf = Sample::new("a", Phase::Update, 1.0, f64::INFINITY);
        assert!(matches!(
            inf.validate(),
            Err(SampleError::InvalidDuration { field: "base_duration", .. })
        ));
    }

    #[test]
    fn phase_accepts_both_spellings() {
        let mount: Phase = serde_json::from_str("\"initial\"").unwrap();
        let update: Phase = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(mount, Phase::Mount);
        assert_eq!(update, Phase::Update);
    }

    #[test]
    fn interactions_are_opaque() {
        let tagged = Interactions::wrap(vec![1u32, 2, 3]);
        assert!(tagged.is_present());
        assert_eq!(format!("{:?}", tagged), "Interactions(..)");
        assert!(!Interactions::none().is_present());

        let sample = Sample::new("a", Phase::Mount, 1.0, 1.0).with_interactions(tagged);
        assert!(sample.validate().is_ok());
        assert!(sample.interactions.is_present());
    }
}
