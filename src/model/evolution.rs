use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Directed edge: `id_pokemon_base` evolves into `id_pokemon_evolucion`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionEdge {
    pub id_pokemon_base: Id,
    pub id_pokemon_evolucion: Id,
    /// Level (or numeric condition) at which the evolution happens
    pub nivel_evolucion: Option<i32>,
}

impl EvolutionEdge {
    pub fn new(base: Id, evolucion: Id, nivel: Option<i32>) -> Self {
        Self {
            id_pokemon_base: base,
            id_pokemon_evolucion: evolucion,
            nivel_evolucion: nivel,
        }
    }
}

/// One member of an evolution chain as returned by `GET /pokemon/:id/evolutions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionEntry {
    pub id: Id,
    pub nombre: String,
    pub nro_pokedex: i32,
    pub imagen: Option<String>,
    pub nivel_evolucion: Option<i32>,
}
