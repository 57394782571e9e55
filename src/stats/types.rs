use serde::{Deserialize, Serialize};

use super::classification::{CourtType, Surface};
use crate::rating::{PlayerId, TournamentId};

/// One recorded match together with its tournament's surface and court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    pub tournament_id: TournamentId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub winner_id: PlayerId,
    pub surface: Option<String>,
    pub court: Option<String>,
}

impl MatchRecord {
    /// Two distinct players and a winner that is one of them
    pub fn is_well_formed(&self) -> bool {
        self.player1_id != self.player2_id
            && (self.winner_id == self.player1_id || self.winner_id == self.player2_id)
    }

    pub fn pair(&self) -> Option<PlayerPair> {
        PlayerPair::new(self.player1_id, self.player2_id)
    }

    pub fn surface(&self) -> Option<Surface> {
        Surface::classify(self.surface.as_deref())
    }

    pub fn court_type(&self) -> Option<CourtType> {
        CourtType::classify(self.court.as_deref())
    }
}

/// Unordered pair of players stored with the lower id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerPair {
    low: PlayerId,
    high: PlayerId,
}

impl PlayerPair {
    pub fn new(a: PlayerId, b: PlayerId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> PlayerId {
        self.low
    }

    pub fn high(&self) -> PlayerId {
        self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerTournamentKey {
    pub player_id: PlayerId,
    pub tournament_id: TournamentId,
}

impl PlayerTournamentKey {
    pub fn new(player_id: PlayerId, tournament_id: TournamentId) -> Self {
        Self {
            player_id,
            tournament_id,
        }
    }
}

/// Matches and wins inside one bucket, from the record's player order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitCounts {
    pub total: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
}

impl SplitCounts {
    fn record(&mut self, player1_won: bool) {
        self.total += 1;
        if player1_won {
            self.player1_wins += 1;
        } else {
            self.player2_wins += 1;
        }
    }

    pub fn swapped(self) -> Self {
        Self {
            total: self.total,
            player1_wins: self.player2_wins,
            player2_wins: self.player1_wins,
        }
    }
}

/// Head-to-head record for a canonical pair: `player1_id < player2_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub total_matches: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub hard_court: SplitCounts,
    pub clay_court: SplitCounts,
    pub grass_court: SplitCounts,
    pub carpet_court: SplitCounts,
    pub indoor: SplitCounts,
    pub outdoor: SplitCounts,
}

impl HeadToHead {
    pub fn empty(pair: PlayerPair) -> Self {
        Self {
            player1_id: pair.low(),
            player2_id: pair.high(),
            total_matches: 0,
            player1_wins: 0,
            player2_wins: 0,
            hard_court: SplitCounts::default(),
            clay_court: SplitCounts::default(),
            grass_court: SplitCounts::default(),
            carpet_court: SplitCounts::default(),
            indoor: SplitCounts::default(),
            outdoor: SplitCounts::default(),
        }
    }

    pub(crate) fn record(
        &mut self,
        player1_won: bool,
        surface: Option<Surface>,
        court: Option<CourtType>,
    ) {
        self.total_matches += 1;
        if player1_won {
            self.player1_wins += 1;
        } else {
            self.player2_wins += 1;
        }

        if let Some(surface) = surface {
            let split = match surface {
                Surface::Hard => &mut self.hard_court,
                Surface::Clay => &mut self.clay_court,
                Surface::Grass => &mut self.grass_court,
                Surface::Carpet => &mut self.carpet_court,
            };
            split.record(player1_won);
        }

        if let Some(court) = court {
            let split = match court {
                CourtType::Indoor => &mut self.indoor,
                CourtType::Outdoor => &mut self.outdoor,
            };
            split.record(player1_won);
        }
    }

    /// The same record seen from `first_player`'s side. Records that do not
    /// involve `first_player` are returned unchanged.
    pub fn oriented_to(&self, first_player: PlayerId) -> Self {
        if first_player != self.player2_id {
            return self.clone();
        }
        Self {
            player1_id: self.player2_id,
            player2_id: self.player1_id,
            total_matches: self.total_matches,
            player1_wins: self.player2_wins,
            player2_wins: self.player1_wins,
            hard_court: self.hard_court.swapped(),
            clay_court: self.clay_court.swapped(),
            grass_court: self.grass_court.swapped(),
            carpet_court: self.carpet_court.swapped(),
            indoor: self.indoor.swapped(),
            outdoor: self.outdoor.swapped(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTournamentStats {
    pub player_id: PlayerId,
    pub tournament_id: TournamentId,
    pub appearances: u32,
    pub wins: u32,
    pub losses: u32,
    pub hard_court_wins: u32,
    pub clay_court_wins: u32,
    pub grass_court_wins: u32,
    pub carpet_court_wins: u32,
    pub indoor_wins: u32,
    pub outdoor_wins: u32,
    /// Performance rating for this tournament, filled in by the aggregator
    pub elo_rating: f64,
}

impl PlayerTournamentStats {
    pub fn empty(key: PlayerTournamentKey, default_rating: f64) -> Self {
        Self {
            player_id: key.player_id,
            tournament_id: key.tournament_id,
            appearances: 0,
            wins: 0,
            losses: 0,
            hard_court_wins: 0,
            clay_court_wins: 0,
            grass_court_wins: 0,
            carpet_court_wins: 0,
            indoor_wins: 0,
            outdoor_wins: 0,
            elo_rating: default_rating,
        }
    }

    pub(crate) fn record_win(&mut self, surface: Option<Surface>, court: Option<CourtType>) {
        self.wins += 1;
        match surface {
            Some(Surface::Hard) => self.hard_court_wins += 1,
            Some(Surface::Clay) => self.clay_court_wins += 1,
            Some(Surface::Grass) => self.grass_court_wins += 1,
            Some(Surface::Carpet) => self.carpet_court_wins += 1,
            None => {}
        }
        match court {
            Some(CourtType::Indoor) => self.indoor_wins += 1,
            Some(CourtType::Outdoor) => self.outdoor_wins += 1,
            None => {}
        }
    }

    /// Wins as a percentage of appearances, 0 when there are none
    pub fn win_percentage(&self) -> f64 {
        win_percentage(self.wins, self.appearances)
    }
}

pub fn win_percentage(wins: u32, appearances: u32) -> f64 {
    if appearances == 0 {
        return 0.0;
    }
    f64::from(wins) / f64::from(appearances) * 100.0
}
