//! Price alert records and threshold direction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which side of the target price an alert is waiting for.
///
/// The direction is derived once when the alert is created, from the price
/// observed at that moment, and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

/// Error returned when decoding a direction from its stored text form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown direction: {0}")]
pub struct ParseDirectionError(pub String);

impl Direction {
    /// Derive the direction for a new alert: waiting for the price to rise
    /// if the target is at or above the current price, to fall otherwise.
    pub fn for_target(target: f64, current_price: f64) -> Self {
        if target >= current_price {
            Direction::Above
        } else {
            Direction::Below
        }
    }

    /// Stored/displayed text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "above" => Ok(Direction::Above),
            "below" => Ok(Direction::Below),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// A pending price alert.
///
/// Immutable once stored: the only lifecycle transitions are owner deletion
/// and removal by the evaluator after the threshold is crossed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Surrogate key, also the handle users reference for deletion.
    pub id: i64,
    /// User that created the alert; scopes list/delete operations.
    pub owner_id: String,
    /// Chat the notification is delivered to. May differ from `owner_id`
    /// when the alert was created in a group.
    pub chat_id: String,
    /// Normalized ticker symbol (upper-case, trimmed).
    pub symbol: String,
    /// Target price in USD.
    pub target: f64,
    /// Side of the target being waited for.
    pub direction: Direction,
    /// Creation time, used only for ordering in listings.
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Whether an observed price satisfies this alert.
    /// Comparisons are inclusive: a price exactly at the target counts.
    pub fn is_hit(&self, price: f64) -> bool {
        match self.direction {
            Direction::Above => price >= self.target,
            Direction::Below => price <= self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(direction: Direction, target: f64) -> Alert {
        Alert {
            id: 1,
            owner_id: "7".to_string(),
            chat_id: "7".to_string(),
            symbol: "BTC".to_string(),
            target,
            direction,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_direction_for_target() {
        assert_eq!(Direction::for_target(50000.0, 49000.0), Direction::Above);
        assert_eq!(Direction::for_target(40000.0, 49000.0), Direction::Below);
        // Target equal to the current price waits for a rise.
        assert_eq!(Direction::for_target(49000.0, 49000.0), Direction::Above);
    }

    #[test]
    fn test_direction_round_trip() {
        assert_eq!("above".parse::<Direction>().unwrap(), Direction::Above);
        assert_eq!("below".parse::<Direction>().unwrap(), Direction::Below);
        assert_eq!(Direction::Above.as_str(), "above");
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_hit_is_inclusive() {
        let up = alert(Direction::Above, 50000.0);
        assert!(!up.is_hit(49999.99));
        assert!(up.is_hit(50000.0));
        assert!(up.is_hit(50123.45));

        let down = alert(Direction::Below, 2000.0);
        assert!(!down.is_hit(2500.0));
        assert!(down.is_hit(2000.0));
        assert!(down.is_hit(1999.99));
    }
}
