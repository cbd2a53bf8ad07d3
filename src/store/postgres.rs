use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, Executor, PgPool, Row};

use crate::model::{
    like_pattern, EvolutionEdge, Habilidad, Id, NewPokemon, Pokemon, PokemonDetail,
    PokemonFilter, PokemonSummary, Tipo,
};
use crate::store::traits::{CatalogStore, EvolutionStore, PokemonStore, Store};

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

const POKEMON_COLUMNS: &str = "p.id, p.nombre, p.nro_pokedex, p.id_tipo1, p.id_tipo2, \
    p.id_habilidad1, p.id_habilidad2, p.id_habilidad3, p.descripcion, p.hp, p.attack, \
    p.defense, p.spattack, p.spdefense, p.speed, p.nivel_evolucion, p.imagen";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the catalog tables when they do not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        // Unprepared execution so the multi-statement script runs in one round trip
        self.pool
            .execute(SCHEMA_SQL)
            .await
            .context("Failed to create catalog schema")?;
        Ok(())
    }
}

fn pokemon_from_row(row: &PgRow) -> Pokemon {
    Pokemon {
        id: row.get("id"),
        nombre: row.get("nombre"),
        nro_pokedex: row.get("nro_pokedex"),
        id_tipo1: row.get("id_tipo1"),
        id_tipo2: row.get("id_tipo2"),
        id_habilidad1: row.get("id_habilidad1"),
        id_habilidad2: row.get("id_habilidad2"),
        id_habilidad3: row.get("id_habilidad3"),
        descripcion: row.get("descripcion"),
        hp: row.get("hp"),
        attack: row.get("attack"),
        defense: row.get("defense"),
        spattack: row.get("spattack"),
        spdefense: row.get("spdefense"),
        speed: row.get("speed"),
        nivel_evolucion: row.get("nivel_evolucion"),
        imagen: row.get("imagen"),
    }
}

fn summary_from_row(row: &PgRow) -> PokemonSummary {
    PokemonSummary {
        id: row.get("id"),
        nombre: row.get("nombre"),
        nro_pokedex: row.get("nro_pokedex"),
        imagen: row.get("imagen"),
    }
}

fn edge_from_row(row: &PgRow) -> EvolutionEdge {
    EvolutionEdge {
        id_pokemon_base: row.get("id_pokemon_base"),
        id_pokemon_evolucion: row.get("id_pokemon_evolucion"),
        nivel_evolucion: row.get("nivel_evolucion"),
    }
}

#[async_trait::async_trait]
impl PokemonStore for PostgresStore {
    async fn list_pokemons(&self) -> Result<Vec<Pokemon>> {
        let query = format!("SELECT {POKEMON_COLUMNS} FROM pokemon p ORDER BY p.nro_pokedex, p.id");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list pokemons")?;

        Ok(rows.iter().map(pokemon_from_row).collect())
    }

    async fn search_pokemons(&self, filter: &PokemonFilter) -> Result<Vec<PokemonSummary>> {
        // A NULL parameter short-circuits its predicate
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.nombre, p.nro_pokedex, p.imagen
            FROM pokemon p
            LEFT JOIN tipo t1 ON p.id_tipo1 = t1.id
            LEFT JOIN tipo t2 ON p.id_tipo2 = t2.id
            WHERE ($1::text IS NULL OR p.nombre ILIKE $1)
              AND ($2::int IS NULL OR p.nro_pokedex = $2)
              AND ($3::text IS NULL OR t1.nombre ILIKE $3 OR t2.nombre ILIKE $3)
            ORDER BY p.nro_pokedex, p.id
            "#,
        )
        .bind(filter.name.as_deref().map(like_pattern))
        .bind(filter.number)
        .bind(filter.type_name.as_deref().map(like_pattern))
        .fetch_all(&self.pool)
        .await
        .context("Failed to search pokemons")?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    async fn get_pokemon_detail(&self, id: Id) -> Result<Option<PokemonDetail>> {
        let query = format!(
            r#"
            SELECT {POKEMON_COLUMNS},
                (SELECT STRING_AGG(DISTINCT t.nombre, ',' ORDER BY t.nombre)
                 FROM tipo t WHERE t.id IN (p.id_tipo1, p.id_tipo2)) AS tipos,
                (SELECT STRING_AGG(DISTINCT h.nombre, ',' ORDER BY h.nombre)
                 FROM habilidad h WHERE h.id IN (p.id_habilidad1, p.id_habilidad2, p.id_habilidad3)) AS habilidades
            FROM pokemon p
            WHERE p.id = $1
            "#
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch pokemon detail")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(PokemonDetail {
            pokemon: pokemon_from_row(&row),
            tipos: row.get("tipos"),
            habilidades: row.get("habilidades"),
        }))
    }

    async fn get_pokemon_summaries(&self, ids: &[Id]) -> Result<Vec<PokemonSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT id, nombre, nro_pokedex, imagen FROM pokemon WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch pokemon summaries")?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    async fn create_pokemon(&self, pokemon: NewPokemon) -> Result<Id> {
        let row = sqlx::query(
            r#"
            INSERT INTO pokemon
                (nombre, nro_pokedex, id_habilidad1, id_habilidad2, id_habilidad3, id_tipo1, id_tipo2,
                 descripcion, hp, attack, defense, spattack, spdefense, speed, nivel_evolucion, imagen)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(&pokemon.nombre)
        .bind(pokemon.nro_pokedex)
        .bind(pokemon.id_habilidad1)
        .bind(pokemon.id_habilidad2)
        .bind(pokemon.id_habilidad3)
        .bind(pokemon.id_tipo1)
        .bind(pokemon.id_tipo2)
        .bind(&pokemon.descripcion)
        .bind(pokemon.hp)
        .bind(pokemon.attack)
        .bind(pokemon.defense)
        .bind(pokemon.spattack)
        .bind(pokemon.spdefense)
        .bind(pokemon.speed)
        .bind(pokemon.nivel_evolucion)
        .bind(&pokemon.imagen)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert pokemon")?;

        Ok(row.get("id"))
    }

    async fn update_pokemon(&self, id: Id, pokemon: NewPokemon) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE pokemon
            SET nombre = $1, nro_pokedex = $2, id_habilidad1 = $3, id_habilidad2 = $4, id_habilidad3 = $5,
                id_tipo1 = $6, id_tipo2 = $7, descripcion = $8, hp = $9, attack = $10, defense = $11,
                spattack = $12, spdefense = $13, speed = $14, nivel_evolucion = $15, imagen = $16
            WHERE id = $17
            "#,
        )
        .bind(&pokemon.nombre)
        .bind(pokemon.nro_pokedex)
        .bind(pokemon.id_habilidad1)
        .bind(pokemon.id_habilidad2)
        .bind(pokemon.id_habilidad3)
        .bind(pokemon.id_tipo1)
        .bind(pokemon.id_tipo2)
        .bind(&pokemon.descripcion)
        .bind(pokemon.hp)
        .bind(pokemon.attack)
        .bind(pokemon.defense)
        .bind(pokemon.spattack)
        .bind(pokemon.spdefense)
        .bind(pokemon.speed)
        .bind(pokemon.nivel_evolucion)
        .bind(&pokemon.imagen)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update pokemon")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_pokemon(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pokemon WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete pokemon")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresStore {
    async fn list_tipos(&self) -> Result<Vec<Tipo>> {
        let rows = sqlx::query("SELECT id, nombre FROM tipo ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tipos")?;

        Ok(rows
            .into_iter()
            .map(|row| Tipo {
                id: row.get("id"),
                nombre: row.get("nombre"),
            })
            .collect())
    }

    async fn list_habilidades(&self) -> Result<Vec<Habilidad>> {
        let rows = sqlx::query("SELECT id, nombre FROM habilidad ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list habilidades")?;

        Ok(rows
            .into_iter()
            .map(|row| Habilidad {
                id: row.get("id"),
                nombre: row.get("nombre"),
            })
            .collect())
    }

    async fn create_tipo(&self, nombre: &str) -> Result<Id> {
        let row = sqlx::query("INSERT INTO tipo (nombre) VALUES ($1) RETURNING id")
            .bind(nombre)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert tipo")?;

        Ok(row.get("id"))
    }

    async fn create_habilidad(&self, nombre: &str) -> Result<Id> {
        let row = sqlx::query("INSERT INTO habilidad (nombre) VALUES ($1) RETURNING id")
            .bind(nombre)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert habilidad")?;

        Ok(row.get("id"))
    }
}

#[async_trait::async_trait]
impl EvolutionStore for PostgresStore {
    async fn evolutions_into(&self, ids: &[Id]) -> Result<Vec<EvolutionEdge>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id_pokemon_base, id_pokemon_evolucion, nivel_evolucion
            FROM evolucion
            WHERE id_pokemon_evolucion = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch pre-evolutions")?;

        Ok(rows.iter().map(edge_from_row).collect())
    }

    async fn evolutions_from(&self, ids: &[Id]) -> Result<Vec<EvolutionEdge>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id_pokemon_base, id_pokemon_evolucion, nivel_evolucion
            FROM evolucion
            WHERE id_pokemon_base = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch evolutions")?;

        Ok(rows.iter().map(edge_from_row).collect())
    }

    async fn create_evolution(&self, edge: EvolutionEdge) -> Result<()> {
        sqlx::query(
            "INSERT INTO evolucion (id_pokemon_base, id_pokemon_evolucion, nivel_evolucion) VALUES ($1, $2, $3)",
        )
        .bind(edge.id_pokemon_base)
        .bind(edge.id_pokemon_evolucion)
        .bind(edge.nivel_evolucion)
        .execute(&self.pool)
        .await
        .context("Failed to insert evolution")?;

        Ok(())
    }
}

impl Store for PostgresStore {}
