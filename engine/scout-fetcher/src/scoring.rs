use crate::config::ScoringConfig;
use crate::models::{scout_keys, PlayerSnapshot};
use tracing::debug;

pub const LABEL_GOOD_AVERAGE: &str = "Good Average";
pub const LABEL_TOP_SCORER: &str = "Top Scorer";
pub const LABEL_REGULAR: &str = "Regular Option";

/// Score and rationale computed for one player
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub score: f64,
    pub rationale: String,
}

/// Heuristic value score for market players
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    config: ScoringConfig,
}

impl ScoreCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Weighted scout output before the average bonus and dampening
    pub fn base_score(&self, player: &PlayerSnapshot) -> f64 {
        let scout = &player.scout;
        scout.get(scout_keys::GOALS) * self.config.goal_weight
            + scout.get(scout_keys::ASSISTS) * self.config.assist_weight
            + scout.get(scout_keys::SHOTS_ON_TARGET) * self.config.shot_on_target_weight
            + scout.get(scout_keys::SHOTS_OFF_TARGET) * self.config.shot_off_target_weight
            + scout.get(scout_keys::TACKLES) * self.config.tackle_weight
    }

    /// Small samples are penalized
    pub fn dampening(&self, player: &PlayerSnapshot) -> f64 {
        if player.games_played < self.config.min_games {
            self.config.small_sample_factor
        } else {
            1.0
        }
    }

    /// `(base + average * w) * dampening`, plus the labels that apply
    pub fn score(&self, player: &PlayerSnapshot) -> ScoreCard {
        let base = self.base_score(player);
        let score = (base + player.average * self.config.average_weight) * self.dampening(player);

        let mut labels = Vec::new();
        if player.average > self.config.good_average_threshold {
            labels.push(LABEL_GOOD_AVERAGE);
        }
        if player.scout.get(scout_keys::GOALS) > self.config.top_scorer_goals {
            labels.push(LABEL_TOP_SCORER);
        }

        let rationale =
            if labels.is_empty() { LABEL_REGULAR.to_string() } else { labels.join(", ") };

        debug!(
            "Scored player {}: {:.2} (base: {:.2}, average: {:.2}, games: {})",
            player.player_id, score, base, player.average, player.games_played
        );

        ScoreCard { score, rationale }
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
