//! Where fresh Pokémon data comes from.

use pokescout_core::{PokeApi, PokemonData};

/// An external source of Pokémon data. `None` means "not fetchable", whatever
/// the underlying reason.
pub trait PokemonSource: Send + Sync {
    fn fetch(&self, name: &str) -> Option<PokemonData>;
}

impl PokemonSource for PokeApi {
    fn fetch(&self, name: &str) -> Option<PokemonData> {
        self.get_pokemon(name)
    }
}
