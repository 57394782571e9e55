//! Surface and court-type buckets.
//!
//! Raw tournament strings are matched by case-insensitive substring in a
//! fixed priority order; the first hit wins. Anything else is "unknown" and
//! belongs to no bucket.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Carpet,
}

impl Surface {
    /// Priority order used by [`Surface::classify`]
    pub const ALL: [Surface; 4] = [Surface::Hard, Surface::Clay, Surface::Grass, Surface::Carpet];

    pub fn classify(raw: Option<&str>) -> Option<Self> {
        let lower = raw?.to_lowercase();
        Self::ALL.into_iter().find(|s| lower.contains(s.as_str()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Hard => "hard",
            Surface::Clay => "clay",
            Surface::Grass => "grass",
            Surface::Carpet => "carpet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtType {
    Indoor,
    Outdoor,
}

impl CourtType {
    pub const ALL: [CourtType; 2] = [CourtType::Indoor, CourtType::Outdoor];

    pub fn classify(raw: Option<&str>) -> Option<Self> {
        let lower = raw?.to_lowercase();
        Self::ALL.into_iter().find(|c| lower.contains(c.as_str()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CourtType::Indoor => "indoor",
            CourtType::Outdoor => "outdoor",
        }
    }
}

/// Any of the six rating buckets, or the overall rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBucket {
    Overall,
    Surface(Surface),
    Court(CourtType),
}

impl RatingBucket {
    /// Surfaces are tried before court types; unrecognised input is `Overall`
    pub fn from_query(raw: Option<&str>) -> Self {
        if let Some(surface) = Surface::classify(raw) {
            return RatingBucket::Surface(surface);
        }
        if let Some(court) = CourtType::classify(raw) {
            return RatingBucket::Court(court);
        }
        RatingBucket::Overall
    }

    /// Column in `player_ratings` holding this bucket
    pub fn column(&self) -> &'static str {
        match self {
            RatingBucket::Overall => "elo_rating",
            RatingBucket::Surface(Surface::Hard) => "hard_court_elo",
            RatingBucket::Surface(Surface::Clay) => "clay_court_elo",
            RatingBucket::Surface(Surface::Grass) => "grass_court_elo",
            RatingBucket::Surface(Surface::Carpet) => "carpet_court_elo",
            RatingBucket::Court(CourtType::Indoor) => "indoor_elo",
            RatingBucket::Court(CourtType::Outdoor) => "outdoor_elo",
        }
    }
}
