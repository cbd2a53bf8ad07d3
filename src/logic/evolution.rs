use anyhow::Result;
use std::collections::{HashMap, HashSet};

use crate::model::{EvolutionEdge, EvolutionEntry, Id};
use crate::store::traits::{EvolutionStore, PokemonStore};

/// Which way a walk follows the evolution edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Target to base: pre-evolutions
    Ancestors,
    /// Base to target: evolutions
    Descendants,
}

impl Direction {
    /// The endpoint of `edge` reached by walking in this direction
    fn next(self, edge: &EvolutionEdge) -> Id {
        match self {
            Direction::Ancestors => edge.id_pokemon_base,
            Direction::Descendants => edge.id_pokemon_evolucion,
        }
    }
}

/// Nodes discovered by one directional walk, each with the level of the edge that reached it
#[derive(Debug, Default)]
struct Walk {
    levels: HashMap<Id, Option<i32>>,
}

impl Walk {
    fn record(&mut self, id: Id, level: Option<i32>) {
        let slot = self.levels.entry(id).or_insert(None);
        if slot.is_none() {
            *slot = level;
        }
    }

    fn level(&self, id: Id) -> Option<i32> {
        self.levels.get(&id).copied().flatten()
    }

    fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.levels.keys().copied()
    }
}

/// Computes the full evolution chain around a Pokémon.
///
/// The chain is the transitive closure of evolution edges in both directions
/// from the queried id. Each direction is walked breadth-first, one storage
/// round trip per frontier, and stops once a frontier discovers no unvisited
/// node, so chains of any length terminate, cyclic data included.
pub struct EvolutionChainResolver;

impl EvolutionChainResolver {
    /// Every Pokémon connected to `id` through evolution edges, `id` included,
    /// ordered by catalog number. Empty when `id` takes part in no edge.
    ///
    /// `nivel_evolucion` is the level of the ancestor edge whose base is the
    /// member, falling back to the level of the descendant edge whose target
    /// is the member.
    pub async fn resolve<S>(store: &S, id: Id) -> Result<Vec<EvolutionEntry>>
    where
        S: PokemonStore + EvolutionStore + ?Sized,
    {
        let ancestors = Self::walk(store, id, Direction::Ancestors).await?;
        let descendants = Self::walk(store, id, Direction::Descendants).await?;

        if ancestors.levels.is_empty() && descendants.levels.is_empty() {
            return Ok(Vec::new());
        }

        let members: HashSet<Id> = std::iter::once(id)
            .chain(ancestors.ids())
            .chain(descendants.ids())
            .collect();
        let member_ids: Vec<Id> = members.into_iter().collect();

        let mut chain: Vec<EvolutionEntry> = store
            .get_pokemon_summaries(&member_ids)
            .await?
            .into_iter()
            .map(|summary| EvolutionEntry {
                nivel_evolucion: ancestors
                    .level(summary.id)
                    .or_else(|| descendants.level(summary.id)),
                id: summary.id,
                nombre: summary.nombre,
                nro_pokedex: summary.nro_pokedex,
                imagen: summary.imagen,
            })
            .collect();

        chain.sort_by_key(|entry| (entry.nro_pokedex, entry.id));

        log::debug!(
            "Evolution chain for {}: {} members ({} ancestors, {} descendants)",
            id,
            chain.len(),
            ancestors.levels.len(),
            descendants.levels.len()
        );

        Ok(chain)
    }

    async fn walk<S>(store: &S, start: Id, direction: Direction) -> Result<Walk>
    where
        S: EvolutionStore + ?Sized,
    {
        let mut walk = Walk::default();
        let mut visited: HashSet<Id> = HashSet::from([start]);
        let mut frontier = vec![start];

        while !frontier.is_empty() {
            let edges = match direction {
                Direction::Ancestors => store.evolutions_into(&frontier).await?,
                Direction::Descendants => store.evolutions_from(&frontier).await?,
            };

            let mut next_frontier = Vec::new();
            for edge in &edges {
                let reached = direction.next(edge);
                walk.record(reached, edge.nivel_evolucion);
                if visited.insert(reached) {
                    next_frontier.push(reached);
                }
            }
            frontier = next_frontier;
        }

        Ok(walk)
    }
}
