//! Short key generation.
//!
//! Keys are drawn uniformly from the 62-symbol alphabet. Randomness comes from
//! the calling thread's own generator, so concurrent request tasks never share
//! mutable RNG state.

use crate::domain::entities::{KEY_ALPHABET, KEY_LENGTH, ShortKey};
use rand::Rng;

/// Keys that would be shadowed by fixed routes and are never handed out.
const RESERVED_KEYS: &[&str] = &["shorten"];

/// Source of candidate short keys.
pub trait KeyGenerator: Send + Sync {
    /// Produces a fresh candidate key. Never fails.
    fn generate(&self) -> ShortKey;
}

/// Uniformly random [`KeyGenerator`] backed by `rand`'s thread-local RNG.
///
/// # Examples
///
/// ```ignore
/// let key = RandomKeyGenerator.generate();
/// assert_eq!(key.as_str().len(), 7);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> ShortKey {
        let mut rng = rand::rng();

        loop {
            let key: String = (0..KEY_LENGTH)
                .map(|_| KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())] as char)
                .collect();

            if !RESERVED_KEYS.contains(&key.as_str()) {
                return ShortKey::new_unchecked(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_generate_has_correct_length() {
        for _ in 0..100 {
            assert_eq!(RandomKeyGenerator.generate().as_str().len(), KEY_LENGTH);
        }
    }

    #[test]
    fn test_generate_uses_only_alphabet() {
        for _ in 0..100 {
            let key = RandomKeyGenerator.generate();
            assert!(key.as_str().bytes().all(|b| KEY_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_generated_keys_pass_validation() {
        let key = RandomKeyGenerator.generate();
        assert!(ShortKey::parse(key.as_str()).is_ok());
    }

    #[test]
    fn test_generate_produces_unique_keys() {
        let keys: HashSet<_> = (0..1000).map(|_| RandomKeyGenerator.generate()).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_reserved_keys_are_valid_shapes() {
        // A reserved entry that could never be generated would be dead weight.
        for reserved in RESERVED_KEYS {
            assert!(ShortKey::parse(*reserved).is_ok());
        }
    }

    #[test]
    fn test_concurrent_generation_from_many_threads() {
        let generator: Arc<dyn KeyGenerator> = Arc::new(RandomKeyGenerator);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                thread::spawn(move || {
                    (0..250)
                        .map(|_| generator.generate())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let keys: HashSet<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(keys.len(), 2000);
    }
}
