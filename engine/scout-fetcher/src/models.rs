use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Cartola status id for a probable starter
pub const PROBABLE_STATUS_ID: i64 = 7;

/// Scout counter keys used by the scoring engine
pub mod scout_keys {
    pub const GOALS: &str = "G";
    pub const ASSISTS: &str = "A";
    pub const SHOTS_ON_TARGET: &str = "FD";
    pub const SHOTS_OFF_TARGET: &str = "FF";
    pub const TACKLES: &str = "DS";
}

/// Treat an explicit JSON `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Market document returned by `GET /atletas/mercado`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MarketSnapshot {
    #[serde(rename = "atletas", default, deserialize_with = "null_as_default")]
    pub players: Vec<PlayerSnapshot>,
}

/// One player entry of the market feed
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayerSnapshot {
    #[serde(rename = "atleta_id")]
    pub player_id: i64,

    #[serde(rename = "apelido", default, deserialize_with = "null_as_default")]
    pub nickname: String,

    #[serde(rename = "clube_id", default, deserialize_with = "null_as_default")]
    pub club_id: i64,

    #[serde(rename = "posicao_id", default, deserialize_with = "null_as_default")]
    pub position_id: i64,

    #[serde(rename = "preco_num", default, deserialize_with = "null_as_default")]
    pub price: f64,

    #[serde(rename = "media_num", default, deserialize_with = "null_as_default")]
    pub average: f64,

    #[serde(rename = "jogos_num", default, deserialize_with = "null_as_default")]
    pub games_played: i64,

    #[serde(rename = "status_id", default, deserialize_with = "null_as_default")]
    pub status_id: i64,

    /// Photo URL with a size placeholder, e.g. `.../FORMATO.png`
    #[serde(rename = "foto", default, deserialize_with = "null_as_default")]
    pub photo_template: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub scout: Scout,
}

/// Named statistical counters of a player
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Scout(HashMap<String, Option<f64>>);

impl Scout {
    /// Counter value; missing or null counters read as zero
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().flatten().unwrap_or(0.0)
    }

    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.0.insert(key.to_string(), Some(value));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Scout {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), Some(v))).collect())
    }
}

impl PlayerSnapshot {
    /// Feed photo with the size placeholder replaced; empty when the feed has none
    pub fn fallback_photo_url(&self, size_token: &str, size: &str) -> String {
        self.photo_template.replace(size_token, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_market_snapshot() {
        let json = r#"{
            "atletas": [{
                "atleta_id": 38909,
                "apelido": "Arrascaeta",
                "clube_id": 262,
                "posicao_id": 4,
                "preco_num": 18.42,
                "media_num": 7.1,
                "jogos_num": 12,
                "status_id": 7,
                "foto": "https://s.sde.globo.com/media/organizations/2024/04/11/FORMATO.png",
                "scout": {"G": 4, "A": 6, "DS": 9}
            }],
            "clubes": {},
            "status": {}
        }"#;

        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.players.len(), 1);

        let player = &snapshot.players[0];
        assert_eq!(player.player_id, 38909);
        assert_eq!(player.nickname, "Arrascaeta");
        assert_eq!(player.club_id, 262);
        assert_eq!(player.games_played, 12);
        assert_eq!(player.status_id, PROBABLE_STATUS_ID);
        assert_eq!(player.scout.get(scout_keys::GOALS), 4.0);
        assert_eq!(player.scout.get(scout_keys::SHOTS_ON_TARGET), 0.0);
        assert_eq!(
            player.fallback_photo_url("FORMATO", "220x220"),
            "https://s.sde.globo.com/media/organizations/2024/04/11/220x220.png"
        );
    }

    #[test]
    fn test_nulls_and_missing_fields_default() {
        let json = r#"{"atletas": [{
            "atleta_id": 1,
            "apelido": "Fulano",
            "media_num": null,
            "foto": null,
            "scout": null
        }]}"#;

        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        let player = &snapshot.players[0];
        assert_eq!(player.average, 0.0);
        assert_eq!(player.games_played, 0);
        assert_eq!(player.status_id, 0);
        assert!(player.scout.is_empty());
        assert_eq!(player.fallback_photo_url("FORMATO", "220x220"), "");
    }

    #[test]
    fn test_null_scout_counter_reads_zero() {
        let scout: Scout = serde_json::from_str(r#"{"G": null, "A": 2}"#).unwrap();
        assert_eq!(scout.get("G"), 0.0);
        assert_eq!(scout.get("A"), 2.0);
        assert_eq!(scout.len(), 2);
    }

    #[test]
    fn test_missing_player_list() {
        let snapshot: MarketSnapshot = serde_json::from_str(r#"{"atletas": null}"#).unwrap();
        assert!(snapshot.players.is_empty());

        let snapshot: MarketSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.players.is_empty());
    }

    #[test]
    fn test_missing_player_id_is_malformed() {
        let result = serde_json::from_str::<MarketSnapshot>(r#"{"atletas": [{"apelido": "X"}]}"#);
        assert!(result.is_err());
    }
}
