use crate::model::{EvolutionEdge, Id, NewPokemon};
use crate::store::traits::Store;
use anyhow::{Context, Result};
use std::collections::HashMap;

const TIPOS: &[&str] = &[
    "Planta", "Veneno", "Fuego", "Volador", "Agua", "Eléctrico", "Normal",
];

const HABILIDADES: &[&str] = &[
    "Espesura",
    "Clorofila",
    "Mar Llamas",
    "Poder Solar",
    "Torrente",
    "Cura Lluvia",
    "Fuga",
    "Adaptable",
    "Absorbe Agua",
    "Absorbe Elec",
    "Absorbe Fuego",
];

/// Seed Pokémon: name, catalog number, types, abilities, stats, description
struct SeedPokemon {
    nombre: &'static str,
    nro: i32,
    tipos: [Option<&'static str>; 2],
    habilidades: [Option<&'static str>; 3],
    stats: [i32; 6],
    descripcion: &'static str,
}

const POKEMON: &[SeedPokemon] = &[
    SeedPokemon {
        nombre: "Bulbasaur",
        nro: 1,
        tipos: [Some("Planta"), Some("Veneno")],
        habilidades: [Some("Espesura"), Some("Clorofila"), None],
        stats: [45, 49, 49, 65, 65, 45],
        descripcion: "Lleva una semilla en el lomo desde que nace.",
    },
    SeedPokemon {
        nombre: "Ivysaur",
        nro: 2,
        tipos: [Some("Planta"), Some("Veneno")],
        habilidades: [Some("Espesura"), Some("Clorofila"), None],
        stats: [60, 62, 63, 80, 80, 60],
        descripcion: "El bulbo de su lomo crece al absorber nutrientes.",
    },
    SeedPokemon {
        nombre: "Venusaur",
        nro: 3,
        tipos: [Some("Planta"), Some("Veneno")],
        habilidades: [Some("Espesura"), Some("Clorofila"), None],
        stats: [80, 82, 83, 100, 100, 80],
        descripcion: "Su flor desprende un aroma que calma a quien lo huele.",
    },
    SeedPokemon {
        nombre: "Charmander",
        nro: 4,
        tipos: [Some("Fuego"), None],
        habilidades: [Some("Mar Llamas"), Some("Poder Solar"), None],
        stats: [39, 52, 43, 60, 50, 65],
        descripcion: "La llama de su cola indica su energía vital.",
    },
    SeedPokemon {
        nombre: "Charmeleon",
        nro: 5,
        tipos: [Some("Fuego"), None],
        habilidades: [Some("Mar Llamas"), Some("Poder Solar"), None],
        stats: [58, 64, 58, 80, 65, 80],
        descripcion: "Sus garras afiladas no muestran piedad.",
    },
    SeedPokemon {
        nombre: "Charizard",
        nro: 6,
        tipos: [Some("Fuego"), Some("Volador")],
        habilidades: [Some("Mar Llamas"), Some("Poder Solar"), None],
        stats: [78, 84, 78, 109, 85, 100],
        descripcion: "Escupe fuego tan caliente que funde las rocas.",
    },
    SeedPokemon {
        nombre: "Squirtle",
        nro: 7,
        tipos: [Some("Agua"), None],
        habilidades: [Some("Torrente"), Some("Cura Lluvia"), None],
        stats: [44, 48, 65, 50, 64, 43],
        descripcion: "Se refugia en su caparazón y contraataca con agua.",
    },
    SeedPokemon {
        nombre: "Wartortle",
        nro: 8,
        tipos: [Some("Agua"), None],
        habilidades: [Some("Torrente"), Some("Cura Lluvia"), None],
        stats: [59, 63, 80, 65, 80, 58],
        descripcion: "Su cola peluda es símbolo de longevidad.",
    },
    SeedPokemon {
        nombre: "Blastoise",
        nro: 9,
        tipos: [Some("Agua"), None],
        habilidades: [Some("Torrente"), Some("Cura Lluvia"), None],
        stats: [79, 83, 100, 85, 105, 78],
        descripcion: "Los cañones de su caparazón disparan agua a presión.",
    },
    SeedPokemon {
        nombre: "Pikachu",
        nro: 25,
        tipos: [Some("Eléctrico"), None],
        habilidades: [None, None, None],
        stats: [35, 55, 40, 50, 50, 90],
        descripcion: "Almacena electricidad en las bolsas de sus mejillas.",
    },
    SeedPokemon {
        nombre: "Eevee",
        nro: 133,
        tipos: [Some("Normal"), None],
        habilidades: [Some("Fuga"), Some("Adaptable"), None],
        stats: [55, 55, 50, 45, 65, 55],
        descripcion: "Su código genético inestable le permite evolucionar de muchas formas.",
    },
    SeedPokemon {
        nombre: "Vaporeon",
        nro: 134,
        tipos: [Some("Agua"), None],
        habilidades: [Some("Absorbe Agua"), None, None],
        stats: [130, 65, 60, 110, 95, 65],
        descripcion: "Puede disolverse en el agua y volverse invisible.",
    },
    SeedPokemon {
        nombre: "Jolteon",
        nro: 135,
        tipos: [Some("Eléctrico"), None],
        habilidades: [Some("Absorbe Elec"), None, None],
        stats: [65, 65, 60, 110, 95, 130],
        descripcion: "Eriza su pelaje para lanzar agujas cargadas.",
    },
    SeedPokemon {
        nombre: "Flareon",
        nro: 136,
        tipos: [Some("Fuego"), None],
        habilidades: [Some("Absorbe Fuego"), None, None],
        stats: [65, 130, 60, 95, 110, 65],
        descripcion: "Almacena calor en su cuerpo hasta superar los 800 grados.",
    },
];

/// Base, evolved form, level (`None` for stone evolutions)
const EVOLUTIONS: &[(&str, &str, Option<i32>)] = &[
    ("Bulbasaur", "Ivysaur", Some(16)),
    ("Ivysaur", "Venusaur", Some(32)),
    ("Charmander", "Charmeleon", Some(16)),
    ("Charmeleon", "Charizard", Some(36)),
    ("Squirtle", "Wartortle", Some(16)),
    ("Wartortle", "Blastoise", Some(36)),
    ("Eevee", "Vaporeon", None),
    ("Eevee", "Jolteon", None),
    ("Eevee", "Flareon", None),
];

fn resolve(table: &HashMap<&str, Id>, name: &str) -> Result<Id> {
    table
        .get(name)
        .copied()
        .with_context(|| format!("Unknown seed reference '{}'", name))
}

fn lookup(table: &HashMap<&str, Id>, name: Option<&str>) -> Result<Option<Id>> {
    name.map(|n| resolve(table, n)).transpose()
}

/// Load the demonstration catalog. Does nothing when types already exist.
pub async fn load_seed_data<S: Store + ?Sized>(store: &S) -> Result<()> {
    if !store.list_tipos().await?.is_empty() {
        log::info!("Catalog already populated, skipping seed data");
        return Ok(());
    }

    let mut tipos = HashMap::new();
    for nombre in TIPOS {
        tipos.insert(*nombre, store.create_tipo(nombre).await?);
    }

    let mut habilidades = HashMap::new();
    for nombre in HABILIDADES {
        habilidades.insert(*nombre, store.create_habilidad(nombre).await?);
    }

    let mut pokemon_ids = HashMap::new();
    for seed in POKEMON {
        let [tipo1, tipo2] = seed.tipos;
        let [hab1, hab2, hab3] = seed.habilidades;
        let pokemon = NewPokemon::new(seed.nombre, seed.nro)
            .with_types(lookup(&tipos, tipo1)?, lookup(&tipos, tipo2)?)
            .with_abilities([
                lookup(&habilidades, hab1)?,
                lookup(&habilidades, hab2)?,
                lookup(&habilidades, hab3)?,
            ])
            .with_stats(seed.stats)
            .with_description(seed.descripcion);
        pokemon_ids.insert(seed.nombre, store.create_pokemon(pokemon).await?);
    }

    for &(base, evolucion, nivel) in EVOLUTIONS {
        let base_id = resolve(&pokemon_ids, base)?;
        let evolucion_id = resolve(&pokemon_ids, evolucion)?;
        store
            .create_evolution(EvolutionEdge::new(base_id, evolucion_id, nivel))
            .await?;
    }

    log::info!(
        "Seeded {} tipos, {} habilidades, {} pokemon, {} evolutions",
        TIPOS.len(),
        HABILIDADES.len(),
        POKEMON.len(),
        EVOLUTIONS.len()
    );

    Ok(())
}
