use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::NewPokemon;

/// Multipart field carrying the image file
pub const IMAGE_FIELD: &str = "imagen";
/// Text field naming the image to keep when an edit sends no new file
pub const EXISTING_IMAGE_FIELD: &str = "existingImagen";

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    #[error("Field '{field}' must be an integer, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },
    #[error("Field '{0}' must not be negative")]
    Negative(&'static str),
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

/// File part of the form, buffered until the rest of the form has been validated
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Decoded multipart body of `POST /pokemons` and `PUT /pokemons/:id`
#[derive(Debug, Default)]
pub struct PokemonForm {
    fields: HashMap<String, String>,
    image: Option<UploadedImage>,
}

impl PokemonForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, FormError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                if let Some(file_name) = field.file_name().map(str::to_string) {
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was picked
                    if !file_name.is_empty() && !bytes.is_empty() {
                        form.image = Some(UploadedImage { file_name, bytes });
                    }
                    continue;
                }
            }

            let value = field.text().await?;
            form.fields.insert(name, value);
        }

        Ok(form)
    }

    pub fn from_fields<K: Into<String>, V: Into<String>>(
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            image: None,
        }
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    /// Filename the client wants to keep, if any
    pub fn existing_image(&self) -> Option<String> {
        self.text(EXISTING_IMAGE_FIELD)
    }

    /// Build the write payload. `imagen` is left empty; the handler decides it.
    pub fn to_new_pokemon(&self) -> Result<NewPokemon, FormError> {
        let pokemon = NewPokemon {
            nombre: self
                .text("nombre")
                .ok_or(FormError::MissingField("nombre"))?,
            nro_pokedex: self
                .integer("nroPokedex")?
                .ok_or(FormError::MissingField("nroPokedex"))?,
            id_tipo1: self.integer("idTipo1")?,
            id_tipo2: self.integer("idTipo2")?,
            id_habilidad1: self.integer("idHabilidad1")?,
            id_habilidad2: self.integer("idHabilidad2")?,
            id_habilidad3: self.integer("idHabilidad3")?,
            descripcion: self.text("descripcion"),
            hp: self.integer("hp")?,
            attack: self.integer("attack")?,
            defense: self.integer("defense")?,
            spattack: self.integer("spattack")?,
            spdefense: self.integer("spdefense")?,
            speed: self.integer("speed")?,
            nivel_evolucion: self.integer("nivelEvolucion")?,
            imagen: None,
        };

        if let Some((field, _)) = pokemon
            .stats()
            .into_iter()
            .find(|(_, value)| value.is_some_and(|v| v < 0))
        {
            return Err(FormError::Negative(field));
        }

        Ok(pokemon)
    }

    /// Trimmed text value; blank counts as absent
    fn text(&self, field: &str) -> Option<String> {
        self.fields
            .get(field)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn integer(&self, field: &'static str) -> Result<Option<i32>, FormError> {
        parse_optional_int(field, self.text(field).as_deref())
    }
}

/// `None` for an absent value, an error for anything that is not an `i32`
pub fn parse_optional_int(field: &'static str, value: Option<&str>) -> Result<Option<i32>, FormError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| FormError::NotAnInteger {
                field,
                value: raw.to_string(),
            }),
    }
}

/// Public image directory; rows only ever record the generated filename
#[derive(Debug, Clone)]
pub struct ImageStorage {
    dir: PathBuf,
}

impl ImageStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the image under a fresh unique name and return that name
    pub async fn save(&self, image: &UploadedImage) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create image directory {}", self.dir.display()))?;

        let suffix = (uuid::Uuid::new_v4().as_u128() % 1_000_000_000) as u32;
        let filename = generate_filename(
            &image.file_name,
            chrono::Utc::now().timestamp_millis(),
            suffix,
        );
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("Failed to write image {}", path.display()))?;

        log::info!("Stored image {} ({} bytes)", filename, image.bytes.len());
        Ok(filename)
    }

    /// Best-effort cleanup of an image whose row could not be written
    pub async fn discard(&self, filename: &str) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(filename)).await {
            log::warn!("Failed to remove orphaned image {}: {}", filename, e);
        }
    }
}

/// `<timestamp>-<suffix>.<ext>`, keeping the extension of the uploaded file
pub fn generate_filename(original_name: &str, timestamp_millis: i64, suffix: u32) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!("{timestamp_millis}-{suffix}{extension}")
}
