use axum::{
    routing::{get, put},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Pokémon collection
        .route(
            "/pokemons",
            get(handlers::list_pokemons::<S>).post(handlers::create_pokemon::<S>),
        )
        .route("/pokemons/search", get(handlers::search_pokemons::<S>))
        .route(
            "/pokemons/:id",
            put(handlers::update_pokemon::<S>).delete(handlers::delete_pokemon::<S>),
        )
        // Single Pokémon reads
        .route("/pokemon/:id", get(handlers::get_pokemon::<S>))
        .route(
            "/pokemon/:id/evolutions",
            get(handlers::get_pokemon_evolutions::<S>),
        )
        // Catalog
        .route("/habilidades", get(handlers::list_habilidades::<S>))
        .route("/tipos", get(handlers::list_tipos::<S>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::upload::ImageStorage;
    use crate::model::{EvolutionEdge, NewPokemon};
    use crate::store::traits::{EvolutionStore, PokemonStore};
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(store: Arc<MemoryStore>) -> Router {
        create_router::<MemoryStore>().with_state(AppState::new(
            store,
            ImageStorage::new(std::env::temp_dir().join("pokedex-route-tests")),
        ))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    #[tokio::test]
    async fn unknown_pokemon_is_not_found() {
        let (status, body) = get(app(Arc::new(MemoryStore::new())), "/pokemon/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Pokémon no encontrado");
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let (status, _) = get(app(Arc::new(MemoryStore::new())), "/pokemon/pikachu").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn evolutions_route_returns_ordered_chain() {
        let store = Arc::new(MemoryStore::new());
        let raichu = store
            .create_pokemon(NewPokemon::new("Raichu", 26))
            .await
            .unwrap();
        let pichu = store
            .create_pokemon(NewPokemon::new("Pichu", 172))
            .await
            .unwrap();
        let pikachu = store
            .create_pokemon(NewPokemon::new("Pikachu", 25))
            .await
            .unwrap();
        store
            .create_evolution(EvolutionEdge::new(pichu, pikachu, None))
            .await
            .unwrap();
        store
            .create_evolution(EvolutionEdge::new(pikachu, raichu, None))
            .await
            .unwrap();

        let (status, body) = get(app(store), &format!("/pokemon/{}/evolutions", pichu)).await;
        assert_eq!(status, StatusCode::OK);
        let numbers: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["nroPokedex"].as_i64().unwrap())
            .collect();
        // Catalog order, not evolution order
        assert_eq!(numbers, vec![25, 26, 172]);
    }

    #[tokio::test]
    async fn evolutions_of_isolated_pokemon_is_empty_array() {
        let store = Arc::new(MemoryStore::new());
        let ditto = store
            .create_pokemon(NewPokemon::new("Ditto", 132))
            .await
            .unwrap();

        let (status, body) = get(app(store), &format!("/pokemon/{}/evolutions", ditto)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}
