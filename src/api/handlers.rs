use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::upload::{parse_optional_int, FormError, ImageStorage, PokemonForm};
use crate::logic::EvolutionChainResolver;
use crate::model::{
    EvolutionEntry, Habilidad, Id, MessageResponse, Pokemon, PokemonDetail, PokemonFilter,
    PokemonSummary, Tipo,
};
use crate::store::traits::Store;

/// Shared handler state: the store plus where uploaded images live
pub struct AppState<S> {
    pub store: Arc<S>,
    pub images: ImageStorage,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, images: ImageStorage) -> Self {
        Self { store, images }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            images: self.images.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Log the underlying failure and answer with a generic 500
fn storage_error(message: &str, err: anyhow::Error) -> ApiError {
    log::error!("{}: {:#}", message, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
}

fn bad_request(err: FormError) -> ApiError {
    log::warn!("Rejected request: {}", err);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(&err.to_string())),
    )
}

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Pokémon no encontrado")),
    )
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Raw `GET /pokemons/search` parameters; blank values disable a filter
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
}

impl SearchQuery {
    pub fn into_filter(self) -> Result<PokemonFilter, FormError> {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let number = non_blank(self.number);
        Ok(PokemonFilter {
            name: non_blank(self.name),
            number: parse_optional_int("number", number.as_deref())?,
            type_name: non_blank(self.type_name),
        })
    }
}

// Pokémon reads

pub async fn list_pokemons<S: Store>(State(state): State<AppState<S>>) -> ApiResult<Vec<Pokemon>> {
    state
        .store
        .list_pokemons()
        .await
        .map(Json)
        .map_err(|e| storage_error("Error al listar los Pokémon", e))
}

pub async fn search_pokemons<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<PokemonSummary>> {
    let filter = query.into_filter().map_err(bad_request)?;

    state
        .store
        .search_pokemons(&filter)
        .await
        .map(Json)
        .map_err(|e| storage_error("Database query error", e))
}

pub async fn get_pokemon<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<PokemonDetail> {
    match state.store.get_pokemon_detail(id).await {
        Ok(Some(detail)) => Ok(Json(detail)),
        Ok(None) => Err(not_found()),
        Err(e) => Err(storage_error("Database query error", e)),
    }
}

pub async fn get_pokemon_evolutions<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<Vec<EvolutionEntry>> {
    EvolutionChainResolver::resolve(state.store.as_ref(), id)
        .await
        .map(Json)
        .map_err(|e| storage_error("Database query error", e))
}

// Pokémon writes

pub async fn create_pokemon<S: Store>(
    State(state): State<AppState<S>>,
    multipart: Multipart,
) -> ApiResult<MessageResponse> {
    const FAILURE: &str = "Error al agregar el Pokémon";

    let form = PokemonForm::read(multipart).await.map_err(bad_request)?;
    let mut pokemon = form.to_new_pokemon().map_err(bad_request)?;

    let stored_image = match form.image() {
        Some(image) => Some(
            state
                .images
                .save(image)
                .await
                .map_err(|e| storage_error(FAILURE, e))?,
        ),
        None => None,
    };
    pokemon.imagen = stored_image.clone();

    let nombre = pokemon.nombre.clone();
    match state.store.create_pokemon(pokemon).await {
        Ok(id) => {
            log::info!("Created pokemon {} ({})", id, nombre);
            Ok(Json(MessageResponse::new("Pokémon agregado exitosamente")))
        }
        Err(e) => {
            if let Some(filename) = &stored_image {
                state.images.discard(filename).await;
            }
            Err(storage_error(FAILURE, e))
        }
    }
}

pub async fn update_pokemon<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Id>,
    multipart: Multipart,
) -> ApiResult<MessageResponse> {
    const FAILURE: &str = "Error al editar el Pokémon";

    let form = PokemonForm::read(multipart).await.map_err(bad_request)?;
    let mut pokemon = form.to_new_pokemon().map_err(bad_request)?;

    let new_image = match form.image() {
        Some(image) => Some(
            state
                .images
                .save(image)
                .await
                .map_err(|e| storage_error(FAILURE, e))?,
        ),
        None => None,
    };
    // Full replace: without a new file the client must resend the current filename
    pokemon.imagen = new_image.clone().or_else(|| form.existing_image());

    match state.store.update_pokemon(id, pokemon).await {
        Ok(updated) => {
            if updated {
                log::info!("Updated pokemon {}", id);
            } else {
                log::warn!("Update for unknown pokemon {} matched no row", id);
                if let Some(filename) = &new_image {
                    state.images.discard(filename).await;
                }
            }
            Ok(Json(MessageResponse::new("Pokémon editado exitosamente")))
        }
        Err(e) => {
            if let Some(filename) = &new_image {
                state.images.discard(filename).await;
            }
            Err(storage_error(FAILURE, e))
        }
    }
}

pub async fn delete_pokemon<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<MessageResponse> {
    match state.store.delete_pokemon(id).await {
        Ok(deleted) => {
            if deleted {
                log::info!("Deleted pokemon {}", id);
            }
            Ok(Json(MessageResponse::new("Pokémon eliminado exitosamente")))
        }
        Err(e) => Err(storage_error("Error al eliminar el Pokémon", e)),
    }
}

// Catalog

pub async fn list_habilidades<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<Habilidad>> {
    state
        .store
        .list_habilidades()
        .await
        .map(Json)
        .map_err(|e| storage_error("Error al obtener habilidades", e))
}

pub async fn list_tipos<S: Store>(State(state): State<AppState<S>>) -> ApiResult<Vec<Tipo>> {
    state
        .store
        .list_tipos()
        .await
        .map(Json)
        .map_err(|e| storage_error("Error al obtener tipos", e))
}
