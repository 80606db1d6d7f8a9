use std::fmt;
use std::str::FromStr;

use crate::error::{SplitError, SplitResult};

use super::DatasetSplit;

const TRAIN_VAL: [DatasetSplit; 2] = [DatasetSplit::Train, DatasetSplit::Val];
const TRAIN_VAL_TEST: [DatasetSplit; 3] =
    [DatasetSplit::Train, DatasetSplit::Val, DatasetSplit::Test];

/// Relative split proportions parsed from `train:val[:test]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRatio {
    pub train: u32,
    pub val: u32,
    pub test: Option<u32>,
}

impl SplitRatio {
    pub fn parse(spec: &str) -> SplitResult<Self> {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(SplitError::invalid_ratio(
                spec,
                format!("expected 2 or 3 parts, got {}", parts.len()),
            ));
        }

        let mut sizes = Vec::with_capacity(parts.len());
        for part in parts {
            let size = part.trim().parse::<u32>().map_err(|_| {
                SplitError::invalid_ratio(spec, format!("{:?} is not a positive integer", part))
            })?;
            if size == 0 {
                return Err(SplitError::invalid_ratio(spec, "ratio parts must be positive"));
            }
            sizes.push(size);
        }

        Ok(Self {
            train: sizes[0],
            val: sizes[1],
            test: sizes.get(2).copied(),
        })
    }

    /// Split names implied by the number of ratio parts
    pub fn splits(&self) -> &'static [DatasetSplit] {
        if self.test.is_some() {
            &TRAIN_VAL_TEST
        } else {
            &TRAIN_VAL
        }
    }

    pub fn total(&self) -> u64 {
        self.train as u64 + self.val as u64 + self.test.unwrap_or(0) as u64
    }

    /// Train + val, the denominator of the second splitting pass
    pub fn train_val_total(&self) -> u64 {
        self.train as u64 + self.val as u64
    }
}

impl FromStr for SplitRatio {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SplitRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.test {
            Some(test) => write!(f, "{}:{}:{}", self.train, self.val, test),
            None => write!(f, "{}:{}", self.train, self.val),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_way() {
        let ratio = SplitRatio::parse("8:2").unwrap();
        assert_eq!(ratio, SplitRatio { train: 8, val: 2, test: None });
        assert_eq!(ratio.splits(), &[DatasetSplit::Train, DatasetSplit::Val]);
        assert_eq!(ratio.total(), 10);
    }

    #[test]
    fn test_parse_three_way() {
        let ratio: SplitRatio = "7:2:1".parse().unwrap();
        assert_eq!(ratio.test, Some(1));
        assert_eq!(ratio.splits().len(), 3);
        assert_eq!(ratio.train_val_total(), 9);
        assert_eq!(ratio.to_string(), "7:2:1");
    }

    #[test]
    fn test_rejects_wrong_arity() {
        for spec in ["7", "7:2:1:0", ""] {
            let err = SplitRatio::parse(spec).unwrap_err();
            assert!(matches!(err, SplitError::InvalidRatio { .. }), "{spec}");
        }
    }

    #[test]
    fn test_rejects_non_integer_and_non_positive() {
        for spec in ["a:b", "7.5:2.5", "7:-2", "8:0", "8:"] {
            let err = SplitRatio::parse(spec).unwrap_err();
            assert!(matches!(err, SplitError::InvalidRatio { .. }), "{spec}");
        }
    }
}
