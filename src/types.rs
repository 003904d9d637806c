//! Core types for the odds capture pipeline.

use serde::{Deserialize, Serialize};

/// One of the three odds columns displayed per match.
///
/// The listing page tags them with opaque css classes; on the zucai page
/// they are the home-win, draw and away-win odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreType {
    Win,
    Draw,
    Loss,
}

impl ScoreType {
    /// All variants in page column order.
    pub const ALL: [ScoreType; 3] = [ScoreType::Win, ScoreType::Draw, ScoreType::Loss];

    pub fn label(&self) -> &'static str {
        match self {
            ScoreType::Win => "win",
            ScoreType::Draw => "draw",
            ScoreType::Loss => "loss",
        }
    }
}

impl std::fmt::Display for ScoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One match as displayed on the listing page.
///
/// Odds cells are kept as the page's text: they are usually numeric but can
/// be empty or a placeholder before the market opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRow {
    pub home_team: String,
    pub away_team: String,
    pub win: String,
    pub draw: String,
    pub loss: String,
}

impl MatchRow {
    /// The odds cell for one score type.
    pub fn value(&self, score_type: ScoreType) -> &str {
        match score_type {
            ScoreType::Win => &self.win,
            ScoreType::Draw => &self.draw,
            ScoreType::Loss => &self.loss,
        }
    }
}

/// The outcome of one successful page capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeResult {
    /// Identifier of the betting round currently listed (e.g. "2024015").
    pub period: String,
    /// Matches in page display order.
    pub rows: Vec<MatchRow>,
}

/// Long-format expansion of a match row: one odds value for one score type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongRecord {
    pub home_team: String,
    pub away_team: String,
    pub score_type: ScoreType,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_type_labels() {
        assert_eq!(ScoreType::Win.label(), "win");
        assert_eq!(ScoreType::Draw.label(), "draw");
        assert_eq!(ScoreType::Loss.label(), "loss");
    }

    #[test]
    fn test_match_row_value_by_score_type() {
        let row = MatchRow {
            home_team: "拜仁慕尼黑".to_string(),
            away_team: "多特蒙德".to_string(),
            win: "1.85".to_string(),
            draw: "3.40".to_string(),
            loss: "4.10".to_string(),
        };
        assert_eq!(row.value(ScoreType::Win), "1.85");
        assert_eq!(row.value(ScoreType::Draw), "3.40");
        assert_eq!(row.value(ScoreType::Loss), "4.10");
    }
}
