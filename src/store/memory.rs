use crate::model::{
    EvolutionEdge, Habilidad, Id, NewPokemon, Pokemon, PokemonDetail, PokemonFilter,
    PokemonSummary, Tipo,
};
use crate::store::traits::{CatalogStore, EvolutionStore, PokemonStore, Store};
use anyhow::{bail, Result};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    pokemon: BTreeMap<Id, Pokemon>,
    tipos: BTreeMap<Id, Tipo>,
    habilidades: BTreeMap<Id, Habilidad>,
    evolutions: Vec<EvolutionEdge>,
    sequences: Sequences,
}

/// One id sequence per table, like a SERIAL column
#[derive(Debug, Default)]
struct Sequences {
    pokemon: Id,
    tipo: Id,
    habilidad: Id,
}

fn next_value(sequence: &mut Id) -> Id {
    *sequence += 1;
    *sequence
}

impl Tables {

    /// Reference checks standing in for the relational foreign keys
    fn check_references(&self, pokemon: &NewPokemon) -> Result<()> {
        if let Some(id) = pokemon.type_ids().find(|id| !self.tipos.contains_key(id)) {
            bail!("Tipo {} does not exist", id);
        }
        if let Some(id) = pokemon
            .ability_ids()
            .find(|id| !self.habilidades.contains_key(id))
        {
            bail!("Habilidad {} does not exist", id);
        }
        Ok(())
    }

    fn type_names(&self, pokemon: &Pokemon) -> Vec<&str> {
        pokemon
            .type_ids()
            .filter_map(|id| self.tipos.get(&id))
            .map(|tipo| tipo.nombre.as_str())
            .collect()
    }

    fn sorted_by_catalog_number(&self) -> Vec<&Pokemon> {
        self.pokemon
            .values()
            .sorted_by_key(|p| (p.nro_pokedex, p.id))
            .collect()
    }
}

/// Join distinct names in alphabetical order, `None` when there are none
fn aggregate_names<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let joined = names.sorted().dedup().join(",");
    (!joined.is_empty()).then_some(joined)
}

/// In-process store with the same observable behavior as [`crate::store::PostgresStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PokemonStore for MemoryStore {
    async fn list_pokemons(&self) -> Result<Vec<Pokemon>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sorted_by_catalog_number()
            .into_iter()
            .cloned()
            .collect())
    }

    async fn search_pokemons(&self, filter: &PokemonFilter) -> Result<Vec<PokemonSummary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sorted_by_catalog_number()
            .into_iter()
            .filter(|p| filter.matches_name(&p.nombre))
            .filter(|p| filter.matches_number(p.nro_pokedex))
            .filter(|p| filter.matches_types(tables.type_names(p)))
            .map(Pokemon::summary)
            .collect())
    }

    async fn get_pokemon_detail(&self, id: Id) -> Result<Option<PokemonDetail>> {
        let tables = self.tables.read().await;
        let Some(pokemon) = tables.pokemon.get(&id) else {
            return Ok(None);
        };

        let tipos = aggregate_names(
            pokemon
                .type_ids()
                .filter_map(|id| tables.tipos.get(&id))
                .map(|t| t.nombre.as_str()),
        );
        let habilidades = aggregate_names(
            pokemon
                .ability_ids()
                .filter_map(|id| tables.habilidades.get(&id))
                .map(|h| h.nombre.as_str()),
        );

        Ok(Some(PokemonDetail {
            pokemon: pokemon.clone(),
            tipos,
            habilidades,
        }))
    }

    async fn get_pokemon_summaries(&self, ids: &[Id]) -> Result<Vec<PokemonSummary>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .unique()
            .filter_map(|id| tables.pokemon.get(id))
            .map(Pokemon::summary)
            .collect())
    }

    async fn create_pokemon(&self, pokemon: NewPokemon) -> Result<Id> {
        let mut tables = self.tables.write().await;
        tables.check_references(&pokemon)?;
        let id = next_value(&mut tables.sequences.pokemon);
        tables.pokemon.insert(id, Pokemon::from_new(id, pokemon));
        Ok(id)
    }

    async fn update_pokemon(&self, id: Id, pokemon: NewPokemon) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.check_references(&pokemon)?;
        match tables.pokemon.get_mut(&id) {
            Some(row) => {
                *row = Pokemon::from_new(id, pokemon);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_pokemon(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.pokemon.remove(&id).is_some();
        // Edges go with their endpoints, as with ON DELETE CASCADE
        tables
            .evolutions
            .retain(|e| e.id_pokemon_base != id && e.id_pokemon_evolucion != id);
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn list_tipos(&self) -> Result<Vec<Tipo>> {
        Ok(self.tables.read().await.tipos.values().cloned().collect())
    }

    async fn list_habilidades(&self) -> Result<Vec<Habilidad>> {
        Ok(self.tables.read().await.habilidades.values().cloned().collect())
    }

    async fn create_tipo(&self, nombre: &str) -> Result<Id> {
        let mut tables = self.tables.write().await;
        let id = next_value(&mut tables.sequences.tipo);
        tables.tipos.insert(
            id,
            Tipo {
                id,
                nombre: nombre.to_string(),
            },
        );
        Ok(id)
    }

    async fn create_habilidad(&self, nombre: &str) -> Result<Id> {
        let mut tables = self.tables.write().await;
        let id = next_value(&mut tables.sequences.habilidad);
        tables.habilidades.insert(
            id,
            Habilidad {
                id,
                nombre: nombre.to_string(),
            },
        );
        Ok(id)
    }
}

#[async_trait::async_trait]
impl EvolutionStore for MemoryStore {
    async fn evolutions_into(&self, ids: &[Id]) -> Result<Vec<EvolutionEdge>> {
        let tables = self.tables.read().await;
        Ok(tables
            .evolutions
            .iter()
            .filter(|e| ids.contains(&e.id_pokemon_evolucion))
            .cloned()
            .collect())
    }

    async fn evolutions_from(&self, ids: &[Id]) -> Result<Vec<EvolutionEdge>> {
        let tables = self.tables.read().await;
        Ok(tables
            .evolutions
            .iter()
            .filter(|e| ids.contains(&e.id_pokemon_base))
            .cloned()
            .collect())
    }

    async fn create_evolution(&self, edge: EvolutionEdge) -> Result<()> {
        let mut tables = self.tables.write().await;
        for id in [edge.id_pokemon_base, edge.id_pokemon_evolucion] {
            if !tables.pokemon.contains_key(&id) {
                bail!("Pokemon {} does not exist", id);
            }
        }
        tables.evolutions.push(edge);
        Ok(())
    }
}

impl Store for MemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_starters() -> (MemoryStore, Vec<Id>) {
        let store = MemoryStore::new();
        let fuego = store.create_tipo("Fuego").await.unwrap();
        let volador = store.create_tipo("Volador").await.unwrap();
        let agua = store.create_tipo("Agua").await.unwrap();

        let charizard = store
            .create_pokemon(NewPokemon::new("Charizard", 6).with_types(Some(fuego), Some(volador)))
            .await
            .unwrap();
        let squirtle = store
            .create_pokemon(NewPokemon::new("Squirtle", 7).with_types(Some(agua), None))
            .await
            .unwrap();
        let charmander = store
            .create_pokemon(NewPokemon::new("Charmander", 4).with_types(Some(fuego), None))
            .await
            .unwrap();

        (store, vec![charmander, charizard, squirtle])
    }

    #[tokio::test]
    async fn list_is_ordered_by_catalog_number() {
        let (store, _) = store_with_starters().await;
        let numbers: Vec<i32> = store
            .list_pokemons()
            .await
            .unwrap()
            .iter()
            .map(|p| p.nro_pokedex)
            .collect();
        assert_eq!(numbers, vec![4, 6, 7]);
    }

    #[tokio::test]
    async fn empty_search_matches_list() {
        let (store, _) = store_with_starters().await;
        let listed: Vec<PokemonSummary> = store
            .list_pokemons()
            .await
            .unwrap()
            .iter()
            .map(Pokemon::summary)
            .collect();
        let searched = store
            .search_pokemons(&PokemonFilter::default())
            .await
            .unwrap();
        assert_eq!(listed, searched);
    }

    #[tokio::test]
    async fn search_by_type_checks_both_slots() {
        let (store, ids) = store_with_starters().await;

        let filter = PokemonFilter {
            type_name: Some("VOLA".to_string()),
            ..Default::default()
        };
        let found = store.search_pokemons(&filter).await.unwrap();
        assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[1]]);

        let filter = PokemonFilter {
            type_name: Some("fuego".to_string()),
            ..Default::default()
        };
        let found = store.search_pokemons(&filter).await.unwrap();
        assert_eq!(
            found.iter().map(|p| p.nombre.as_str()).collect::<Vec<_>>(),
            vec!["Charmander", "Charizard"]
        );
    }

    #[tokio::test]
    async fn search_combines_name_and_number() {
        let (store, _) = store_with_starters().await;
        let filter = PokemonFilter {
            name: Some("char".to_string()),
            number: Some(6),
            type_name: None,
        };
        let found = store.search_pokemons(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].nombre, "Charizard");
    }

    #[tokio::test]
    async fn detail_deduplicates_repeated_slots() {
        let store = MemoryStore::new();
        let planta = store.create_tipo("Planta").await.unwrap();
        let espesura = store.create_habilidad("Espesura").await.unwrap();
        let clorofila = store.create_habilidad("Clorofila").await.unwrap();
        let id = store
            .create_pokemon(
                NewPokemon::new("Oddish", 43)
                    .with_types(Some(planta), Some(planta))
                    .with_abilities([Some(espesura), Some(clorofila), Some(espesura)]),
            )
            .await
            .unwrap();

        let detail = store.get_pokemon_detail(id).await.unwrap().unwrap();
        assert_eq!(detail.tipos.as_deref(), Some("Planta"));
        assert_eq!(detail.habilidades.as_deref(), Some("Clorofila,Espesura"));
    }

    #[tokio::test]
    async fn unknown_references_are_rejected() {
        let store = MemoryStore::new();
        let result = store
            .create_pokemon(NewPokemon::new("Missingno", 0).with_types(Some(99), None))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn delete_removes_row_and_its_edges() {
        let (store, ids) = store_with_starters().await;
        store
            .create_evolution(EvolutionEdge::new(ids[0], ids[1], Some(36)))
            .await
            .unwrap();

        assert!(store.delete_pokemon(ids[1]).await.unwrap());
        assert!(store.get_pokemon_detail(ids[1]).await.unwrap().is_none());
        assert!(store.evolutions_from(&ids).await.unwrap().is_empty());
        assert!(store.evolutions_into(&ids).await.unwrap().is_empty());
        assert!(!store.delete_pokemon(ids[1]).await.unwrap());
    }

    #[tokio::test]
    async fn each_table_numbers_its_own_rows() {
        let store = MemoryStore::new();
        let fuego = store.create_tipo("Fuego").await.unwrap();
        let mar_llamas = store.create_habilidad("Mar Llamas").await.unwrap();
        let charmander = store
            .create_pokemon(
                NewPokemon::new("Charmander", 4)
                    .with_types(Some(fuego), None)
                    .with_abilities([Some(mar_llamas), None, None]),
            )
            .await
            .unwrap();
        assert_eq!((fuego, mar_llamas, charmander), (1, 1, 1));

        let agua = store.create_tipo("Agua").await.unwrap();
        let squirtle = store
            .create_pokemon(NewPokemon::new("Squirtle", 7).with_types(Some(agua), None))
            .await
            .unwrap();
        assert_eq!((agua, squirtle), (2, 2));
    }
}
