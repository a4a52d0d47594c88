//! Static word data: the date-seeded daily bank, the theme list, and the
//! pre-vetted fallback pool used when the remote generator is unavailable.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Minimum accepted target-word length.
pub const MIN_WORD_LEN: usize = 4;
/// Maximum accepted target-word length.
pub const MAX_WORD_LEN: usize = 12;

/// A candidate target word together with its theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub theme: String,
}

impl WordEntry {
    /// Construct an entry from owned parts.
    #[must_use]
    pub fn new(word: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            theme: theme.into(),
        }
    }

    /// Construct an entry from a static bank pair.
    #[must_use]
    pub fn from_static(pair: (&str, &str)) -> Self {
        Self::new(pair.0, pair.1)
    }
}

/// Whether a word satisfies the target invariant: lowercase ASCII letters
/// only, length within `[MIN_WORD_LEN, MAX_WORD_LEN]`.
#[must_use]
pub fn is_valid_word(word: &str) -> bool {
    (MIN_WORD_LEN..=MAX_WORD_LEN).contains(&word.len())
        && !word.is_empty()
        && word.bytes().all(|b| b.is_ascii_lowercase())
}

/// Sanitize a candidate coming from the generator: first whitespace token,
/// normalized, non-letters dropped. Returns `None` when the survivor violates
/// the target invariant.
#[must_use]
pub fn sanitize_candidate(raw: &str) -> Option<String> {
    let token = raw.split_whitespace().next()?;
    let word: String = normalize(token)
        .chars()
        .filter(char::is_ascii_lowercase)
        .collect();
    is_valid_word(&word).then_some(word)
}

/// Themes offered to the generator and used to index the fallback pool.
pub const THEMES: [&str; 15] = [
    "Animales",
    "Deportes",
    "Cine",
    "Cocina",
    "Música",
    "Ciencia",
    "Tecnología",
    "Naturaleza",
    "Historia",
    "Arte",
    "Geografía",
    "Literatura",
    "Viajes",
    "Arquitectura",
    "Mitología",
];

// Daily bank for deterministic date-seeded selection.
pub const WORD_BANK: [(&str, &str); 60] = [
    ("tigre", "Animales"),
    ("delfin", "Animales"),
    ("jirafa", "Animales"),
    ("aguila", "Animales"),
    ("futbol", "Deportes"),
    ("raqueta", "Deportes"),
    ("maraton", "Deportes"),
    ("portero", "Deportes"),
    ("pelicula", "Cine"),
    ("pantalla", "Cine"),
    ("director", "Cine"),
    ("estreno", "Cine"),
    ("paella", "Cocina"),
    ("sarten", "Cocina"),
    ("receta", "Cocina"),
    ("especias", "Cocina"),
    ("guitarra", "Música"),
    ("melodia", "Música"),
    ("orquesta", "Música"),
    ("tambor", "Música"),
    ("cometa", "Ciencia"),
    ("molecula", "Ciencia"),
    ("galaxia", "Ciencia"),
    ("neurona", "Ciencia"),
    ("algoritmo", "Tecnología"),
    ("teclado", "Tecnología"),
    ("satelite", "Tecnología"),
    ("circuito", "Tecnología"),
    ("volcan", "Naturaleza"),
    ("cascada", "Naturaleza"),
    ("bosque", "Naturaleza"),
    ("tormenta", "Naturaleza"),
    ("castillo", "Historia"),
    ("imperio", "Historia"),
    ("batalla", "Historia"),
    ("dinastia", "Historia"),
    ("acuarela", "Arte"),
    ("escultura", "Arte"),
    ("pincel", "Arte"),
    ("retrato", "Arte"),
    ("desierto", "Geografía"),
    ("peninsula", "Geografía"),
    ("meseta", "Geografía"),
    ("archipielago", "Geografía"),
    ("novela", "Literatura"),
    ("poema", "Literatura"),
    ("cuento", "Literatura"),
    ("soneto", "Literatura"),
    ("maleta", "Viajes"),
    ("brujula", "Viajes"),
    ("pasaporte", "Viajes"),
    ("equipaje", "Viajes"),
    ("laberinto", "Arquitectura"),
    ("columna", "Arquitectura"),
    ("fachada", "Arquitectura"),
    ("catedral", "Arquitectura"),
    ("pegaso", "Mitología"),
    ("sirena", "Mitología"),
    ("minotauro", "Mitología"),
    ("olimpo", "Mitología"),
];

// Pre-vetted fallback entries; every theme above is covered so the fallback
// never starves.
pub const FALLBACK_POOL: [(&str, &str); 16] = [
    ("tigre", "Animales"),
    ("delfin", "Animales"),
    ("futbol", "Deportes"),
    ("pelicula", "Cine"),
    ("paella", "Cocina"),
    ("guitarra", "Música"),
    ("cometa", "Ciencia"),
    ("algoritmo", "Tecnología"),
    ("volcan", "Naturaleza"),
    ("castillo", "Historia"),
    ("acuarela", "Arte"),
    ("desierto", "Geografía"),
    ("novela", "Literatura"),
    ("maleta", "Viajes"),
    ("laberinto", "Arquitectura"),
    ("pegaso", "Mitología"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_entries_satisfy_invariant() {
        for (word, theme) in WORD_BANK {
            assert!(is_valid_word(word), "bank word {word:?} invalid");
            assert!(THEMES.contains(&theme), "bank theme {theme:?} unknown");
        }
    }

    #[test]
    fn fallback_pool_covers_every_theme() {
        for theme in THEMES {
            assert!(
                FALLBACK_POOL.iter().any(|(_, t)| *t == theme),
                "no fallback entry for {theme}"
            );
        }
        for (word, _) in FALLBACK_POOL {
            assert!(is_valid_word(word), "fallback word {word:?} invalid");
        }
    }

    #[test]
    fn word_invariant_bounds() {
        assert!(is_valid_word("gato".repeat(3).as_str()));
        assert!(!is_valid_word("gat"));
        assert!(!is_valid_word("a".repeat(13).as_str()));
        assert!(!is_valid_word("Tigre"));
        assert!(!is_valid_word("niño"));
        assert!(!is_valid_word(""));
    }

    #[test]
    fn sanitize_extracts_first_clean_token() {
        assert_eq!(sanitize_candidate("  Cigüeña\n"), Some("ciguena".into()));
        assert_eq!(sanitize_candidate("\"tigre\"."), Some("tigre".into()));
        assert_eq!(sanitize_candidate("la palabra"), None); // "la" too short
        assert_eq!(sanitize_candidate(""), None);
        assert_eq!(sanitize_candidate("1234"), None);
    }
}
