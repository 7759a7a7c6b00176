//! Layer sort rules.

use std::fmt;
use std::str::FromStr;

/// Where to place a moved layer relative to its reference layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertPosition::Before => write!(f, "before"),
            InsertPosition::After => write!(f, "after"),
        }
    }
}

impl FromStr for InsertPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(InsertPosition::Before),
            "after" => Ok(InsertPosition::After),
            other => Err(format!("'{}' is not a position (before, after)", other)),
        }
    }
}

/// Re-orders one already-inserted layer relative to another.
///
/// Applied after all layers are committed; naming a layer that was never
/// committed is a build error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRule {
    /// Layer to reposition.
    pub move_layer_name: String,

    /// Layer the move is relative to.
    pub ref_layer_name: String,

    /// Placement relative to the reference layer.
    pub insert_position: InsertPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_str() {
        assert_eq!("before".parse::<InsertPosition>(), Ok(InsertPosition::Before));
        assert_eq!("AFTER".parse::<InsertPosition>(), Ok(InsertPosition::After));
        assert_eq!(" Before ".parse::<InsertPosition>(), Ok(InsertPosition::Before));
    }

    #[test]
    fn test_position_from_str_invalid() {
        assert!("above".parse::<InsertPosition>().is_err());
        assert!("".parse::<InsertPosition>().is_err());
    }

    #[test]
    fn test_position_display() {
        assert_eq!(InsertPosition::Before.to_string(), "before");
        assert_eq!(InsertPosition::After.to_string(), "after");
    }
}
