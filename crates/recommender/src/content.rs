//! Content-based similarity over item text profiles.
//!
//! Each game is described by its name plus genre tokens; profiles are
//! tf-idf vectorized and compared by cosine. Similarity is independent of
//! user behavior: two games are close because they read alike, not
//! because the same people play them.
//!
//! ## Algorithm
//! 1. Resolve the game id; build its text profile
//! 2. Fit tf-idf over the candidate profile set (all games, or a sampled
//!    subset for cost control on large exports)
//! 3. Cosine of the target vector against every candidate vector
//! 4. Rank descending, drop the target and duplicate names, take `n`
//!
//! The fitted model is built lazily on first use and cached for the
//! process lifetime; the store never changes underneath it.

use crate::error::{RecommendError, Result};
use crate::tfidf::{self, SparseVector, TfIdfVectorizer};
use data_loader::{DatasetStore, ItemId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument};

const DEFAULT_SAMPLE_SEED: u64 = 17;

/// Recommendations for one game, by text similarity.
///
/// `partial` is set when fewer than the requested number of distinct
/// names exist. That is a valid result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecommendations {
    pub item_id: ItemId,
    pub item_name: String,
    pub items: Vec<String>,
    pub partial: bool,
}

/// One game's text profile
#[derive(Debug)]
struct ItemProfile {
    item_id: ItemId,
    name: String,
    text: String,
}

/// The lazily built similarity model
struct ContentModel {
    profiles: Vec<ItemProfile>,
    by_id: HashMap<ItemId, usize>,
    /// Profile indices forming the candidate pool (sampled or full)
    candidates: Vec<usize>,
    vectorizer: TfIdfVectorizer,
    candidate_vectors: Vec<SparseVector>,
}

/// Recommends games whose name and genres read like the target's
pub struct ContentRecommender {
    store: Arc<DatasetStore>,

    /// Fraction of games kept as similarity candidates (default: all)
    sample_ratio: f64,
    sample_seed: u64,

    model: OnceLock<ContentModel>,
}

impl ContentRecommender {
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self {
            store,
            sample_ratio: 1.0,
            sample_seed: DEFAULT_SAMPLE_SEED,
            model: OnceLock::new(),
        }
    }

    /// Configure the candidate sampling ratio (default: 1.0 = full set).
    ///
    /// Sampling trades recall for vectorization cost; the target game is
    /// always scored even when it falls outside the sample.
    pub fn with_sample_ratio(mut self, ratio: f64) -> Self {
        self.sample_ratio = ratio.clamp(0.01, 1.0);
        self
    }

    /// Configure the sampling seed, for reproducible candidate pools
    pub fn with_sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = seed;
        self
    }

    fn model(&self) -> &ContentModel {
        self.model.get_or_init(|| self.build_model())
    }

    fn build_model(&self) -> ContentModel {
        // One profile per distinct game id, first-seen order
        let mut profiles: Vec<ItemProfile> = Vec::new();
        let mut by_id: HashMap<ItemId, usize> = HashMap::new();
        for record in self.store.records() {
            if by_id.contains_key(&record.item_id) {
                continue;
            }
            let mut text = record.item_name.clone();
            for genre in &record.genres {
                text.push(' ');
                text.push_str(genre);
            }
            by_id.insert(record.item_id, profiles.len());
            profiles.push(ItemProfile {
                item_id: record.item_id,
                name: record.item_name.clone(),
                text,
            });
        }

        let candidates: Vec<usize> = if self.sample_ratio >= 1.0 {
            (0..profiles.len()).collect()
        } else {
            let amount = ((profiles.len() as f64 * self.sample_ratio).ceil() as usize)
                .clamp(1, profiles.len());
            let mut rng = StdRng::seed_from_u64(self.sample_seed);
            let mut sampled = rand::seq::index::sample(&mut rng, profiles.len(), amount).into_vec();
            sampled.sort_unstable();
            sampled
        };

        let texts: Vec<&str> = candidates
            .iter()
            .map(|&idx| profiles[idx].text.as_str())
            .collect();
        let mut vectorizer = TfIdfVectorizer::new();
        let candidate_vectors = vectorizer.fit_transform(&texts);

        info!(
            "Built content model: {} games, {} candidates, vocabulary {}",
            profiles.len(),
            candidates.len(),
            vectorizer.vocabulary_len()
        );

        ContentModel {
            profiles,
            by_id,
            candidates,
            vectorizer,
            candidate_vectors,
        }
    }

    /// Top `n` games most similar to `item_id` by text profile.
    ///
    /// Fails with `UnknownItem` when the id is absent from the dataset.
    /// The target itself and duplicate names are excluded; a shorter list
    /// is returned with `partial: true` when fewer than `n` distinct
    /// names exist.
    #[instrument(skip(self))]
    pub fn recommend(&self, item_id: ItemId, n: usize) -> Result<ContentRecommendations> {
        let model = self.model();
        let &target_idx = model
            .by_id
            .get(&item_id)
            .ok_or(RecommendError::UnknownItem(item_id))?;
        let target = &model.profiles[target_idx];
        let target_vector = model.vectorizer.transform(&target.text);

        // Score every candidate against the target
        let mut scored: Vec<(usize, f64)> = (0..model.candidates.len())
            .into_par_iter()
            .filter_map(|c| {
                let profile_idx = model.candidates[c];
                if profile_idx == target_idx {
                    return None;
                }
                let score = tfidf::dot(&target_vector, &model.candidate_vectors[c]);
                Some((profile_idx, score))
            })
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        // Dedupe names; the target's own name never appears
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(target.name.as_str());
        let mut items: Vec<String> = Vec::new();
        for (profile_idx, _) in scored {
            let name = model.profiles[profile_idx].name.as_str();
            if seen.insert(name) {
                items.push(name.to_string());
                if items.len() == n {
                    break;
                }
            }
        }

        let partial = items.len() < n;
        debug!(
            "{} content recommendations for game {} (partial: {})",
            items.len(),
            item_id,
            partial
        );
        Ok(ContentRecommendations {
            item_id,
            item_name: target.name.clone(),
            items,
            partial,
        })
    }
}
