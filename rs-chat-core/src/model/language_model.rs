use std::path::PathBuf;

use crate::io;
use super::config::ModelConfig;
use super::emotion::Emotion;
use super::sampler::Sampler;
use super::store::TransitionStore;
use super::tokenizer::tokenize;

/// Placeholder answer returned while the vocabulary is still empty.
pub const NEED_MORE_DATA: &str = "Need more data...";

/// Default number of words produced by [`LanguageModel::generate`].
pub const DEFAULT_MAX_LENGTH: usize = 15;

/// Every 4th generation step starts a new sentence when the chosen word
/// is long enough.
const SENTENCE_BREAK_INTERVAL: usize = 4;
const SENTENCE_BREAK_MIN_CHARS: usize = 3;

/// First-order word-transition model with emotion-weighted learning and
/// block-sharded persistence.
///
/// # Responsibilities
/// - Learn unigram and (prev, next) statistics from raw text
/// - Rotate the active block when the vocabulary crosses the block size
/// - Generate text by weighted sampling of the learned statistics
/// - Persist and reload blocks and the cumulative vocabulary
///
/// # Invariants
/// - Block ordinals only grow; at most one block's transition data is
///   resident in memory
/// - `learn` and `generate` never fail; persistence problems degrade to
///   warnings and memory-only operation
pub struct LanguageModel {
	store: TransitionStore,
	sampler: Sampler,
	emotion: Emotion,
	current_block: usize,
	storage_dir: PathBuf,
}

impl LanguageModel {
	/// Creates a model from its configuration.
	///
	/// The storage directory is created and the vocabulary snapshot
	/// merged when possible; both are best-effort and a failure leaves a
	/// working in-memory model.
	pub fn new(config: ModelConfig) -> Self {
		let ModelConfig { block_size, storage_dir, seed } = config;

		if let Err(error) = io::ensure_dir(&storage_dir) {
			log::warn!(
				"cannot create {}: {error}; persistence disabled for this session",
				storage_dir.display()
			);
		}

		let mut store = TransitionStore::new(block_size);
		if let Some(words) = io::read_vocabulary(&storage_dir) {
			store.merge_vocabulary(words);
		}

		let sampler = match seed {
			Some(seed) => Sampler::with_seed(seed),
			None => Sampler::new(),
		};

		Self {
			store,
			sampler,
			emotion: Emotion::default(),
			current_block: 0,
			storage_dir,
		}
	}

	/// Feeds raw text to the model.
	///
	/// Tokenizes, counts each word, rotates the block when a fresh
	/// distinct word crosses a block-size multiple, and records every
	/// (prev, next) transition of the call.
	pub fn learn(&mut self, text: &str) {
		let words = tokenize(text);

		let mut prev: Option<&str> = None;
		for word in &words {
			let inserted = self.store.observe_word(word);
			if inserted && self.store.should_rotate() {
				self.rotate();
			}
			if let Some(prev) = prev {
				self.store.record_transition(prev, word, self.emotion.weight());
			}
			prev = Some(word);
		}
	}

	/// Flushes the active block, advances the ordinal and clears the
	/// active maps.
	///
	/// A failed flush keeps the ordinal and the data in memory;
	/// persistence degrades for this session.
	fn rotate(&mut self) {
		let result = io::write_block(&self.storage_dir, self.current_block, self.store.records());
		match result {
			Ok(()) => {
				log::info!(
					"flushed block {} ({} words known)",
					self.current_block,
					self.store.vocabulary_len()
				);
				self.current_block += 1;
				self.store.clear_active();
			}
			Err(error) => {
				log::warn!("failed to flush block {}: {error}", self.current_block);
			}
		}
		self.store.sync_crossings();
	}

	/// Generates up to `max_length` words of text.
	///
	/// Returns [`NEED_MORE_DATA`] while nothing has been learned. The
	/// start word is drawn from unigram frequencies, every following
	/// word from the current word's transition weights; generation
	/// stops early on a word without successors. The result always ends
	/// with `.`, `!` or `?`.
	pub fn generate(&mut self, max_length: usize) -> String {
		if self.store.vocabulary_len() == 0 {
			return NEED_MORE_DATA.to_owned();
		}

		let (words, weights): (Vec<&String>, Vec<f64>) = self
			.store
			.vocabulary()
			.iter()
			.map(|(word, count)| (word, *count as f64))
			.unzip();

		let Some(start) = self.sampler.choose(&weights) else {
			return NEED_MORE_DATA.to_owned();
		};

		let mut current = words[start].clone();
		let mut result = current.clone();

		for step in 0..max_length.saturating_sub(1) {
			let Some(successors) = self.store.successors(&current) else {
				break;
			};

			let (candidates, weights): (Vec<&String>, Vec<f64>) = successors
				.iter()
				.map(|(word, weight)| (word, *weight))
				.unzip();
			let Some(choice) = self.sampler.choose(&weights) else {
				break;
			};
			let next = candidates[choice].clone();

			if step % SENTENCE_BREAK_INTERVAL == 0
				&& next.chars().count() > SENTENCE_BREAK_MIN_CHARS
			{
				result.push_str(". ");
			} else {
				result.push(' ');
			}
			result.push_str(&next);

			current = next;
		}

		if !result.ends_with(['.', '!', '?']) {
			result.push('.');
		}

		result
	}

	/// Loads a previously flushed block, making it the current one.
	///
	/// A block that was never flushed is a no-op (the ordinal is still
	/// adopted, like a fresh session pointed at that block). Loaded
	/// records overwrite the in-memory pair data; predecessor
	/// vocabulary counts only ever grow.
	pub fn load_block(&mut self, block: usize) {
		self.current_block = block;

		let records = match io::read_block(&self.storage_dir, block) {
			Ok(Some(records)) => records,
			Ok(None) => return,
			Err(error) => {
				log::warn!("failed to read block {block}: {error}");
				return;
			}
		};

		let count = records.len();
		for record in records {
			self.store.apply_record(record);
		}
		self.store.sync_crossings();
		log::info!("loaded block {block} ({count} transitions)");
	}

	/// Flushes the current block and the vocabulary snapshot.
	///
	/// Called by the session loop on shutdown; any error is the
	/// caller's to report, the model itself stays usable.
	pub fn save(&self) -> std::io::Result<()> {
		io::write_block(&self.storage_dir, self.current_block, self.store.records())?;
		io::write_vocabulary(&self.storage_dir, self.store.vocabulary())
	}

	/// Sorted ordinals of the blocks present in the storage directory.
	pub fn available_blocks(&self) -> Vec<usize> {
		io::list_blocks(&self.storage_dir)
	}

	/// Current emotion, a fixed multiplier on repeated transitions.
	pub fn emotion(&self) -> Emotion {
		self.emotion
	}

	/// Changes the emotion used for subsequent weight updates.
	pub fn set_emotion(&mut self, emotion: Emotion) {
		self.emotion = emotion;
	}

	/// Ordinal of the block currently accumulating transitions.
	pub fn current_block(&self) -> usize {
		self.current_block
	}

	/// Number of distinct words seen so far.
	pub fn vocabulary_len(&self) -> usize {
		self.store.vocabulary_len()
	}

	/// Cumulative occurrence count of `word` (0 when unknown).
	pub fn word_frequency(&self, word: &str) -> u64 {
		self.store.word_frequency(word)
	}

	/// Co-occurrence count of `prev` followed by `next` in the active
	/// block.
	pub fn pair_frequency(&self, prev: &str, next: &str) -> Option<u64> {
		self.store.pair_frequency(prev, next)
	}

	/// Learned transition weight of `prev` followed by `next` in the
	/// active block.
	pub fn transition_weight(&self, prev: &str, next: &str) -> Option<f64> {
		self.store.transition_weight(prev, next)
	}
}
