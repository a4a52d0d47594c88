//! Target-word selection: deterministic date-seeded picks from the static
//! bank, generative mode against the remote generator with a validated
//! fallback, and the shared daily cache in front of it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::words::{FALLBACK_POOL, THEMES, WORD_BANK, WordEntry, sanitize_candidate};
use crate::{SharedCache, WordGenerator};

/// TTL for cached daily entries. Comfortably longer than one day so clock
/// skew across callers cannot produce divergent daily words.
pub const DAILY_CACHE_TTL_SECS: u64 = 172_800;

fn djb2(input: &str) -> u32 {
    let mut hash: u32 = 5381;
    for byte in input.bytes() {
        hash = hash.wrapping_mul(33) ^ u32::from(byte);
    }
    hash
}

/// Unsigned 32-bit hash of a date string (djb2). Stable across processes.
#[must_use]
pub fn date_hash(date: &str) -> u32 {
    djb2(date)
}

/// Deterministic daily entry from the built-in bank: the same date always
/// yields the same word, across calls and across process restarts.
#[must_use]
pub fn daily_entry(date: &str) -> WordEntry {
    let idx = date_hash(date) as usize % WORD_BANK.len();
    WordEntry::from_static(WORD_BANK[idx])
}

/// Deterministic theme for a date, reduced independently of the bank index.
#[must_use]
pub fn daily_theme(date: &str) -> &'static str {
    THEMES[date_hash(date) as usize % THEMES.len()]
}

/// Provenance of a selected word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSource {
    Generated,
    Static,
}

/// Cached daily payload shared between callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedDaily {
    pub word: String,
    pub theme: String,
    pub date: String,
    pub source: WordSource,
}

/// Read-only selection configuration. Injected so tests can substitute fixed
/// pools and a fake generator.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub themes: Vec<String>,
    pub fallback_pool: Vec<WordEntry>,
    /// Seed for theme and fallback picks; entropy-based when absent.
    pub seed: Option<u64>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            themes: THEMES.iter().map(|t| (*t).to_string()).collect(),
            fallback_pool: FALLBACK_POOL.iter().map(|p| WordEntry::from_static(*p)).collect(),
            seed: None,
        }
    }
}

impl SelectorConfig {
    // Empty tables would starve selection; refill them from the built-ins.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.themes.is_empty() {
            self.themes = defaults.themes;
        }
        if self.fallback_pool.is_empty() {
            self.fallback_pool = defaults.fallback_pool;
        }
        self
    }
}

/// Cache implementation for callers that opt out of the daily cache layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait::async_trait]
impl SharedCache for NullCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: u64) {}
}

/// Produces a validated `WordEntry` for a new session. Selection never fails:
/// any generator or cache problem degrades to the static fallback pool.
pub struct WordSelector<G, C> {
    generator: G,
    cache: Option<C>,
    config: SelectorConfig,
    rng: ChaCha20Rng,
}

impl<G> WordSelector<G, NullCache>
where
    G: WordGenerator,
{
    /// Selector with no cache layer in front of generative mode.
    #[must_use]
    pub fn without_cache(generator: G, config: SelectorConfig) -> Self {
        Self::new(generator, None, config)
    }
}

impl<G, C> WordSelector<G, C>
where
    G: WordGenerator,
    C: SharedCache,
{
    #[must_use]
    pub fn new(generator: G, cache: Option<C>, config: SelectorConfig) -> Self {
        let config = config.sanitized();
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self {
            generator,
            cache,
            config,
            rng,
        }
    }

    /// Free-play selection: random theme, remote generation, static fallback.
    pub async fn next_word(&mut self) -> WordEntry {
        let theme = self.pick_theme();
        match self.generate_validated(&theme).await {
            Some(entry) => entry,
            None => self.fallback_entry(),
        }
    }

    /// Date-keyed daily selection behind the shared cache. The cache is
    /// best-effort: unreachable backends read as a miss and writes are
    /// fire-and-forget.
    pub async fn daily_word(&mut self, date: &str) -> WordEntry {
        let key = format!("daily:{date}");
        if let Some(cached) = self.cached_daily(&key).await {
            return cached;
        }

        let theme_idx = date_hash(date) as usize % self.config.themes.len();
        let theme = self.config.themes[theme_idx].clone();
        let (entry, source) = match self.generate_validated(&theme).await {
            Some(entry) => (entry, WordSource::Generated),
            None => (self.fallback_for_date(date), WordSource::Static),
        };

        if let Some(cache) = &self.cache {
            let payload = CachedDaily {
                word: entry.word.clone(),
                theme: entry.theme.clone(),
                date: date.to_string(),
                source,
            };
            if let Ok(value) = serde_json::to_string(&payload) {
                cache.set(&key, &value, DAILY_CACHE_TTL_SECS).await;
            }
        }
        entry
    }

    async fn cached_daily(&self, key: &str) -> Option<WordEntry> {
        let raw = self.cache.as_ref()?.get(key).await?;
        let cached: CachedDaily = serde_json::from_str(&raw).ok()?;
        if cached.word.is_empty() {
            return None;
        }
        Some(WordEntry::new(cached.word, cached.theme))
    }

    async fn generate_validated(&mut self, theme: &str) -> Option<WordEntry> {
        match self.generator.generate(theme).await {
            Ok(raw) => match sanitize_candidate(&raw) {
                Some(word) => Some(WordEntry::new(word, theme)),
                None => {
                    log::warn!("generator returned unusable candidate {raw:?}");
                    None
                }
            },
            Err(err) => {
                log::warn!("word generation failed: {err}");
                None
            }
        }
    }

    fn pick_theme(&mut self) -> String {
        let idx = self.rng.gen_range(0..self.config.themes.len());
        self.config.themes[idx].clone()
    }

    fn fallback_entry(&mut self) -> WordEntry {
        let idx = self.rng.gen_range(0..self.config.fallback_pool.len());
        self.config.fallback_pool[idx].clone()
    }

    fn fallback_for_date(&self, date: &str) -> WordEntry {
        let idx = date_hash(date) as usize % self.config.fallback_pool.len();
        self.config.fallback_pool[idx].clone()
    }
}
