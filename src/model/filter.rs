/// Decoded `GET /pokemons/search` filters. `None` disables a filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PokemonFilter {
    /// Case-insensitive substring of the Pokémon name
    pub name: Option<String>,
    /// Exact catalog number
    pub number: Option<i32>,
    /// Case-insensitive substring of the primary or secondary type name
    pub type_name: Option<String>,
}

impl PokemonFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.number.is_none() && self.type_name.is_none()
    }

    pub fn matches_name(&self, nombre: &str) -> bool {
        match &self.name {
            Some(needle) => contains_ignore_case(nombre, needle),
            None => true,
        }
    }

    pub fn matches_number(&self, nro_pokedex: i32) -> bool {
        self.number.map_or(true, |n| n == nro_pokedex)
    }

    /// `type_names` holds the resolved names of both type slots
    pub fn matches_types<'a>(&self, type_names: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.type_name {
            Some(needle) => type_names
                .into_iter()
                .any(|name| contains_ignore_case(name, needle)),
            None => true,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Turn a raw search term into an `ILIKE` pattern, escaping `%`, `_` and `\`
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
