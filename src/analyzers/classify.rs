use serde::Serialize;
use std::fmt;

/// Score above which a normalized rating counts as above average.
pub const ABOVE_AVERAGE: f64 = 1.0;
/// Score below which a normalized rating counts as below average.
pub const BELOW_AVERAGE: f64 = 0.75;
/// Per-dimension standard deviation above which a group is flagged.
pub const HIGH_SPREAD: f64 = 0.2;
/// Combined Dev + Report standard deviation above which a group is flagged.
pub const HIGH_TOTAL_SPREAD: f64 = 0.4;

/// Where a normalized score sits relative to the expected share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreClass {
    AboveAverage,
    Typical,
    BelowAverage,
}

impl fmt::Display for ScoreClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreClass::AboveAverage => "above average",
            ScoreClass::Typical => "typical",
            ScoreClass::BelowAverage => "below average",
        })
    }
}

/// Whether a group's ratings disagree more than usual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Spread {
    High,
    Normal,
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Spread::High => "high variance",
            Spread::Normal => "normal",
        })
    }
}

/// Classifies a normalized score.
///
/// | Range        | Class         |
/// |--------------|---------------|
/// | > 1.0        | above average |
/// | < 0.75       | below average |
/// | otherwise    | typical       |
pub fn classify_score(v: f64) -> ScoreClass {
    match v {
        v if v > ABOVE_AVERAGE => ScoreClass::AboveAverage,
        v if v < BELOW_AVERAGE => ScoreClass::BelowAverage,
        _ => ScoreClass::Typical,
    }
}

/// Classifies the standard deviation of one dimension within a group.
pub fn classify_spread(std: f64) -> Spread {
    if std > HIGH_SPREAD { Spread::High } else { Spread::Normal }
}

/// Classifies `dev_std + report_std` of a group.
pub fn classify_total_spread(total: f64) -> Spread {
    if total > HIGH_TOTAL_SPREAD { Spread::High } else { Spread::Normal }
}
