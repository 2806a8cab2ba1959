//! Short slug generation.
//!
//! Slugs are sampled uniformly from an alphabet without look-alike characters,
//! so they survive being read aloud or typed from a printout. Uniqueness is not
//! checked here: the store's unique constraint on `pages.slug` rejects
//! collisions and the caller retries.

use rand::Rng;

/// Alphanumerics minus `0 O o 1 l I i`.
pub const SLUG_ALPHABET: &[u8] = b"23456789abcdefghjkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Number of characters in a generated slug.
pub const SLUG_LENGTH: usize = 6;

/// Source of candidate slugs.
///
/// Implementations are pure generators that don't interact with storage.
#[cfg_attr(test, mockall::automock)]
pub trait SlugGenerator: Send + Sync {
    /// Returns a URL-path-safe candidate slug.
    fn generate(&self) -> String;
}

/// Uniform random slug generator backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSlugGenerator;

impl SlugGenerator for RandomSlugGenerator {
    fn generate(&self) -> String {
        generate_slug()
    }
}

/// Generates a random slug of [`SLUG_LENGTH`] characters.
///
/// # Examples
///
/// ```ignore
/// let slug = generate_slug();
/// assert_eq!(slug.len(), 6);
/// ```
pub fn generate_slug() -> String {
    let mut rng = rand::rng();

    (0..SLUG_LENGTH)
        .map(|_| SLUG_ALPHABET[rng.random_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}
