use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Elemental type (`Tipo`) referenced by a Pokémon's primary and secondary slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tipo {
    pub id: Id,
    pub nombre: String,
}

/// Ability (`Habilidad`) referenced by up to three slots of a Pokémon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habilidad {
    pub id: Id,
    pub nombre: String,
}
