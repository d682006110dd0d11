use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::game::Winner;

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub Uuid);

impl Id {
    pub fn new() -> Self {
        Id(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Backend wire types. Field names follow the backend's JSON.

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChoiceEntry {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutcomeEntry {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateOutcomeRequest {
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct NewRoundRecord {
    #[serde(rename = "id_opcion_usuario")]
    pub user_choice_id: u32,
    #[serde(rename = "id_opcion_cpu")]
    pub cpu_choice_id: u32,
    #[serde(rename = "id_resultado")]
    pub result_id: u32,
}

/// Round result as the backend labels it, from the player's side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundVerdict {
    #[serde(rename = "Victoria")]
    Victory,
    #[serde(rename = "Derrota")]
    Defeat,
    #[serde(rename = "Empate")]
    Tie,
}

impl From<Winner> for RoundVerdict {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Player => RoundVerdict::Victory,
            Winner::Cpu => RoundVerdict::Defeat,
            Winner::Draw => RoundVerdict::Tie,
        }
    }
}

impl From<RoundVerdict> for Winner {
    fn from(verdict: RoundVerdict) -> Self {
        match verdict {
            RoundVerdict::Victory => Winner::Player,
            RoundVerdict::Defeat => Winner::Cpu,
            RoundVerdict::Tie => Winner::Draw,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub id: u64,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "eleccion_usuario")]
    pub user_choice: String,
    #[serde(rename = "eleccion_cpu")]
    pub cpu_choice: String,
    #[serde(rename = "resultado")]
    pub verdict: RoundVerdict,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ClassifyRequest {
    #[serde(rename = "idUsuario")]
    pub user_choice_id: u32,
    #[serde(rename = "idCpu")]
    pub cpu_choice_id: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub id: u32,
}

/// Filter over the remote round log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundFilter {
    #[default]
    All,
    Only(Winner),
}

impl RoundFilter {
    pub fn matches(&self, record: &RoundRecord) -> bool {
        match self {
            RoundFilter::All => true,
            RoundFilter::Only(winner) => Winner::from(record.verdict) == *winner,
        }
    }

    pub fn apply<'a>(&self, records: &'a [RoundRecord]) -> Vec<&'a RoundRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u64, verdict: RoundVerdict) -> RoundRecord {
        RoundRecord {
            id,
            date: "2025-01-01T00:00:00Z".to_owned(),
            user_choice: "Piedra".to_owned(),
            cpu_choice: "Tijera".to_owned(),
            verdict,
        }
    }

    #[test]
    fn round_record_uses_backend_field_names() {
        let value = json!({
            "id": 7,
            "fecha": "2025-01-01T00:00:00Z",
            "eleccion_usuario": "Piedra",
            "eleccion_cpu": "Papel",
            "resultado": "Derrota"
        });
        let parsed: RoundRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.id, 7);
        assert_eq!(parsed.verdict, RoundVerdict::Defeat);
        assert_eq!(Winner::from(parsed.verdict), Winner::Cpu);
    }

    #[test]
    fn new_round_record_serializes_backend_keys() {
        let body = serde_json::to_value(NewRoundRecord {
            user_choice_id: 1,
            cpu_choice_id: 3,
            result_id: 1,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"id_opcion_usuario": 1, "id_opcion_cpu": 3, "id_resultado": 1})
        );
        let body = serde_json::to_value(ClassifyRequest {
            user_choice_id: 2,
            cpu_choice_id: 1,
        })
        .unwrap();
        assert_eq!(body, json!({"idUsuario": 2, "idCpu": 1}));
    }

    #[test]
    fn filter_keeps_matching_verdicts() {
        let records = vec![
            record(1, RoundVerdict::Victory),
            record(2, RoundVerdict::Defeat),
            record(3, RoundVerdict::Tie),
            record(4, RoundVerdict::Victory),
        ];
        assert_eq!(RoundFilter::All.apply(&records).len(), 4);
        let wins: Vec<u64> = RoundFilter::Only(Winner::Player)
            .apply(&records)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(wins, vec![1, 4]);
        assert_eq!(RoundFilter::Only(Winner::Draw).apply(&records)[0].id, 3);
    }
}
