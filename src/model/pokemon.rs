use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Full `Pokemon` row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    pub id: Id,
    pub nombre: String,
    pub nro_pokedex: i32,
    pub id_tipo1: Option<Id>,
    pub id_tipo2: Option<Id>,
    pub id_habilidad1: Option<Id>,
    pub id_habilidad2: Option<Id>,
    pub id_habilidad3: Option<Id>,
    pub descripcion: Option<String>,
    pub hp: Option<i32>,
    pub attack: Option<i32>,
    pub defense: Option<i32>,
    pub spattack: Option<i32>,
    pub spdefense: Option<i32>,
    pub speed: Option<i32>,
    pub nivel_evolucion: Option<i32>,
    /// Generated filename inside the upload directory, never a path
    pub imagen: Option<String>,
}

impl Pokemon {
    pub fn from_new(id: Id, new: NewPokemon) -> Self {
        Self {
            id,
            nombre: new.nombre,
            nro_pokedex: new.nro_pokedex,
            id_tipo1: new.id_tipo1,
            id_tipo2: new.id_tipo2,
            id_habilidad1: new.id_habilidad1,
            id_habilidad2: new.id_habilidad2,
            id_habilidad3: new.id_habilidad3,
            descripcion: new.descripcion,
            hp: new.hp,
            attack: new.attack,
            defense: new.defense,
            spattack: new.spattack,
            spdefense: new.spdefense,
            speed: new.speed,
            nivel_evolucion: new.nivel_evolucion,
            imagen: new.imagen,
        }
    }

    pub fn type_ids(&self) -> impl Iterator<Item = Id> {
        [self.id_tipo1, self.id_tipo2].into_iter().flatten()
    }

    pub fn ability_ids(&self) -> impl Iterator<Item = Id> {
        [self.id_habilidad1, self.id_habilidad2, self.id_habilidad3]
            .into_iter()
            .flatten()
    }

    pub fn summary(&self) -> PokemonSummary {
        PokemonSummary {
            id: self.id,
            nombre: self.nombre.clone(),
            nro_pokedex: self.nro_pokedex,
            imagen: self.imagen.clone(),
        }
    }
}

/// Projection returned by search and used to build evolution chains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonSummary {
    pub id: Id,
    pub nombre: String,
    pub nro_pokedex: i32,
    pub imagen: Option<String>,
}

/// Detail view: the row plus comma-joined, deduplicated type and ability names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
    #[serde(flatten)]
    pub pokemon: Pokemon,
    pub tipos: Option<String>,
    pub habilidades: Option<String>,
}

/// Write payload shared by create and full-replace update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPokemon {
    pub nombre: String,
    pub nro_pokedex: i32,
    pub id_tipo1: Option<Id>,
    pub id_tipo2: Option<Id>,
    pub id_habilidad1: Option<Id>,
    pub id_habilidad2: Option<Id>,
    pub id_habilidad3: Option<Id>,
    pub descripcion: Option<String>,
    pub hp: Option<i32>,
    pub attack: Option<i32>,
    pub defense: Option<i32>,
    pub spattack: Option<i32>,
    pub spdefense: Option<i32>,
    pub speed: Option<i32>,
    pub nivel_evolucion: Option<i32>,
    pub imagen: Option<String>,
}

impl NewPokemon {
    pub fn new(nombre: &str, nro_pokedex: i32) -> Self {
        Self {
            nombre: nombre.to_string(),
            nro_pokedex,
            ..Default::default()
        }
    }

    pub fn with_types(mut self, primary: Option<Id>, secondary: Option<Id>) -> Self {
        self.id_tipo1 = primary;
        self.id_tipo2 = secondary;
        self
    }

    pub fn with_abilities(mut self, abilities: [Option<Id>; 3]) -> Self {
        let [first, second, third] = abilities;
        self.id_habilidad1 = first;
        self.id_habilidad2 = second;
        self.id_habilidad3 = third;
        self
    }

    /// Base stats in display order: hp, attack, defense, spattack, spdefense, speed
    pub fn with_stats(mut self, stats: [i32; 6]) -> Self {
        let [hp, attack, defense, spattack, spdefense, speed] = stats.map(Some);
        self.hp = hp;
        self.attack = attack;
        self.defense = defense;
        self.spattack = spattack;
        self.spdefense = spdefense;
        self.speed = speed;
        self
    }

    pub fn with_description(mut self, descripcion: &str) -> Self {
        self.descripcion = Some(descripcion.to_string());
        self
    }

    /// Stat fields paired with their form names, for validation
    pub fn stats(&self) -> [(&'static str, Option<i32>); 6] {
        [
            ("hp", self.hp),
            ("attack", self.attack),
            ("defense", self.defense),
            ("spattack", self.spattack),
            ("spdefense", self.spdefense),
            ("speed", self.speed),
        ]
    }

    pub fn type_ids(&self) -> impl Iterator<Item = Id> {
        [self.id_tipo1, self.id_tipo2].into_iter().flatten()
    }

    pub fn ability_ids(&self) -> impl Iterator<Item = Id> {
        [self.id_habilidad1, self.id_habilidad2, self.id_habilidad3]
            .into_iter()
            .flatten()
    }
}
