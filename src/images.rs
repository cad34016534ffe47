//! Image URL derivation for the public rendering endpoint.
//!
//! Every call samples a fresh seed, so the same prompt gives a different
//! image each time. Regenerating images relies on that.

use std::fmt::Debug;
use std::sync::Arc;

use url::Url;

use crate::constants::{
    IMAGE_BASE_URL, IMAGE_HEIGHT, IMAGE_QUALITY_SUFFIX, IMAGE_RENDER_MODEL,
    IMAGE_SEED_UPPER_BOUND, IMAGE_WIDTH,
};

/// Where render seeds come from.
pub trait SeedSource: Debug + Send + Sync {
    /// Returns a seed in `[0, IMAGE_SEED_UPPER_BOUND)`.
    fn next_seed(&self) -> u32;
}

/// Uniformly random seeds from the thread RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSeeds;

impl SeedSource for RandomSeeds {
    fn next_seed(&self) -> u32 {
        rand::random_range(0..IMAGE_SEED_UPPER_BOUND)
    }
}

/// Builds render URLs for image prompts.
#[derive(Clone, Debug)]
pub struct ImageEndpoint {
    base: Url,
    seeds: Arc<dyn SeedSource>,
}

impl ImageEndpoint {
    /// Uses `base` as the render endpoint, the prompt becomes its last path segment.
    pub fn new(base: &str, seeds: Arc<dyn SeedSource>) -> Result<Self, url::ParseError> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { base, seeds })
    }

    /// The pollinations.ai endpoint with random seeds.
    pub fn pollinations() -> Result<Self, url::ParseError> {
        Self::new(IMAGE_BASE_URL, Arc::new(RandomSeeds))
    }

    /// Swap the seed source, handy for tests.
    pub fn with_seeds(mut self, seeds: Arc<dyn SeedSource>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Derives one render URL for `prompt`.
    pub fn url_for(&self, prompt: &str) -> Url {
        let mut url = self.base.clone();
        let rendered = format!("{prompt}{IMAGE_QUALITY_SUFFIX}");
        // the base was checked in `new`, it always has path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&rendered);
        }
        let seed = self.seeds.next_seed() % IMAGE_SEED_UPPER_BOUND;
        url.query_pairs_mut()
            .append_pair("width", &IMAGE_WIDTH.to_string())
            .append_pair("height", &IMAGE_HEIGHT.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("nologo", "true")
            .append_pair("model", IMAGE_RENDER_MODEL);
        url
    }

    /// One URL per prompt, in the same order.
    pub fn urls_for<S: AsRef<str>>(&self, prompts: &[S]) -> Vec<String> {
        prompts
            .iter()
            .map(|prompt| self.url_for(prompt.as_ref()).to_string())
            .collect()
    }
}

/// Pulls the seed back out of a derived URL.
pub fn seed_of(url: &str) -> Option<u32> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "seed")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Hands out 0, 1, 2, ... so tests can tell derivations apart.
    #[derive(Debug, Default)]
    pub(crate) struct CountingSeeds(AtomicU32);

    impl SeedSource for CountingSeeds {
        fn next_seed(&self) -> u32 {
            self.0.fetch_add(1, Ordering::Relaxed)
        }
    }

    pub(crate) fn counting_endpoint() -> ImageEndpoint {
        ImageEndpoint::pollinations()
            .expect("pollinations base")
            .with_seeds(Arc::new(CountingSeeds::default()))
    }

    #[test]
    fn url_encodes_prompt_and_fixed_fields() {
        let endpoint = counting_endpoint();
        let url = endpoint.url_for("morning coffee/run").to_string();

        assert!(url.starts_with("https://pollinations.ai/p/"));
        assert!(url.contains("morning%20coffee%2Frun"));
        assert!(url.contains("photorealistic,%208k,%20cinematic%20lighting"));
        assert!(url.contains("width=1080&height=1080"));
        assert!(url.contains("nologo=true"));
        assert!(url.contains("model=flux"));
        assert_eq!(seed_of(&url), Some(0));
    }

    #[test]
    fn repeated_derivations_differ_only_in_seed() {
        let endpoint = counting_endpoint();
        let first = endpoint.url_for("sunset");
        let second = endpoint.url_for("sunset");

        assert_ne!(first, second);
        assert_eq!(first.path(), second.path());
        let strip_seed = |url: &Url| {
            url.query_pairs()
                .filter(|(key, _)| key != "seed")
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip_seed(&first), strip_seed(&second));
    }

    #[test]
    fn random_seeds_stay_in_range() {
        let endpoint = ImageEndpoint::pollinations().expect("pollinations base");
        for _ in 0..500 {
            let url = endpoint.url_for("range check").to_string();
            let seed = seed_of(&url).expect("seed present");
            assert!(seed < IMAGE_SEED_UPPER_BOUND);
        }
    }

    #[test]
    fn urls_keep_prompt_order() {
        let endpoint = counting_endpoint();
        let urls = endpoint.urls_for(&["one", "two", "three"]);
        assert_eq!(urls.len(), 3);
        assert!(urls[0].contains("/p/one"));
        assert!(urls[1].contains("/p/two"));
        assert!(urls[2].contains("/p/three"));
    }

    #[test]
    fn rejects_cannot_be_a_base_urls() {
        assert!(ImageEndpoint::new("mailto:someone@example.com", Arc::new(RandomSeeds)).is_err());
    }
}
