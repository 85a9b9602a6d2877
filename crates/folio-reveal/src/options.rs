use crate::error::RevealError;
use serde::{Deserialize, Serialize};

/// How much of an element must be visible, and whether the reveal sticks.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealOptions {
    /// Fraction of the element's area that must intersect the viewport.
    pub threshold: f64,
    /// Stop observing once the element has been revealed.
    pub trigger_once: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            trigger_once: true,
        }
    }
}

impl RevealOptions {
    pub fn new(threshold: f64, trigger_once: bool) -> Result<Self, RevealError> {
        let options = Self {
            threshold,
            trigger_once,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), RevealError> {
        if (0.0..=1.0).contains(&self.threshold) {
            Ok(())
        } else {
            Err(RevealError::InvalidThreshold(self.threshold))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults() {
        let options = RevealOptions::default();
        assert_eq!(options.threshold, 0.1);
        assert!(options.trigger_once);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn accepts_thresholds_in_range(#[case] threshold: f64) {
        assert!(RevealOptions::new(threshold, false).is_ok());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn rejects_thresholds_out_of_range(#[case] threshold: f64) {
        assert!(matches!(
            RevealOptions::new(threshold, true),
            Err(RevealError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn deserializes_with_defaults() {
        let options: RevealOptions = serde_json::from_str(r#"{ "triggerOnce": false }"#).unwrap();
        assert_eq!(options.threshold, 0.1);
        assert!(!options.trigger_once);
    }
}
