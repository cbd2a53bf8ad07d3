use crate::model::{
    EvolutionEdge, Habilidad, Id, NewPokemon, Pokemon, PokemonDetail, PokemonFilter,
    PokemonSummary, Tipo,
};
use anyhow::Result;

#[async_trait::async_trait]
pub trait PokemonStore: Send + Sync {
    /// All rows ordered by catalog number
    async fn list_pokemons(&self) -> Result<Vec<Pokemon>>;
    /// Filtered projection ordered by catalog number; an empty filter matches every row
    async fn search_pokemons(&self, filter: &PokemonFilter) -> Result<Vec<PokemonSummary>>;
    /// Row plus deduplicated type and ability names
    async fn get_pokemon_detail(&self, id: Id) -> Result<Option<PokemonDetail>>;
    /// Projection for a set of ids, in no particular order; unknown ids are skipped
    async fn get_pokemon_summaries(&self, ids: &[Id]) -> Result<Vec<PokemonSummary>>;
    async fn create_pokemon(&self, pokemon: NewPokemon) -> Result<Id>;
    /// Full replace of every column; returns false when the id does not exist
    async fn update_pokemon(&self, id: Id, pokemon: NewPokemon) -> Result<bool>;
    async fn delete_pokemon(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_tipos(&self) -> Result<Vec<Tipo>>;
    async fn list_habilidades(&self) -> Result<Vec<Habilidad>>;
    async fn create_tipo(&self, nombre: &str) -> Result<Id>;
    async fn create_habilidad(&self, nombre: &str) -> Result<Id>;
}

#[async_trait::async_trait]
pub trait EvolutionStore: Send + Sync {
    /// Edges whose evolved form is one of `ids`
    async fn evolutions_into(&self, ids: &[Id]) -> Result<Vec<EvolutionEdge>>;
    /// Edges whose base form is one of `ids`
    async fn evolutions_from(&self, ids: &[Id]) -> Result<Vec<EvolutionEdge>>;
    async fn create_evolution(&self, edge: EvolutionEdge) -> Result<()>;
}

pub trait Store: PokemonStore + CatalogStore + EvolutionStore + Send + Sync {}
