use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub type HeroId = u32;

/// Players at indices below this value play for Radiant.
pub const RADIANT_SLOTS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct HeroRecord {
    pub id: HeroId,
    pub localized_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerSlot {
    pub hero_id: Option<HeroId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchRecord {
    pub match_id: u64,
    #[serde(default, deserialize_with = "lenient_players")]
    pub players: Option<Vec<PlayerSlot>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: i64,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radiant_win: bool,
    #[serde(default)]
    pub radiant_score: Option<u32>,
    #[serde(default)]
    pub dire_score: Option<u32>,
}

impl MatchRecord {
    pub fn has_player_data(&self) -> bool {
        self.players.as_ref().is_some_and(|players| !players.is_empty())
    }

    pub fn winner(&self) -> Side {
        if self.radiant_win {
            Side::Radiant
        } else {
            Side::Dire
        }
    }

    pub fn team_split(&self) -> TeamSplit {
        let mut split = TeamSplit::default();
        let Some(players) = self.players.as_ref() else {
            return split;
        };

        for (index, player) in players.iter().enumerate() {
            let Some(hero_id) = player.hero_id.filter(|id| *id != 0) else {
                continue;
            };
            if index < RADIANT_SLOTS {
                split.radiant.push(hero_id);
            } else {
                split.dire.push(hero_id);
            }
        }
        split
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Non-array `players` become `None`; slots without an integer `hero_id`
/// keep their position with no hero.
fn lenient_players<'de, D>(deserializer: D) -> Result<Option<Vec<PlayerSlot>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let slots = items
        .iter()
        .map(|item| PlayerSlot {
            hero_id: item
                .get("hero_id")
                .and_then(Value::as_u64)
                .and_then(|id| HeroId::try_from(id).ok()),
        })
        .collect();
    Ok(Some(slots))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSplit {
    pub radiant: Vec<HeroId>,
    pub dire: Vec<HeroId>,
}

impl TeamSplit {
    pub fn contains(&self, hero_id: HeroId) -> bool {
        self.radiant.contains(&hero_id) || self.dire.contains(&hero_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Radiant,
    Dire,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Radiant => f.write_str("Radiant"),
            Side::Dire => f.write_str("Dire"),
        }
    }
}
