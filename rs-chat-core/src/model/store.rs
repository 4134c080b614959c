use std::collections::BTreeMap;

/// Fraction of the emotion factor added to an already known transition.
pub const REPEAT_STEP: f64 = 0.1;

/// One persisted transition: predecessor, successor, co-occurrence count
/// and accumulated weight.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRecord {
	pub prev: String,
	pub next: String,
	pub frequency: u64,
	pub weight: f64,
}

/// Statistics for the active block plus the cumulative vocabulary.
///
/// The vocabulary lives for the whole process; the transition and
/// frequency maps only cover the block currently being accumulated and
/// are emptied on rotation.
///
/// ## Responsibilities:
/// - Accumulate unigram counts and (prev, next) frequency/weight pairs
/// - Detect block-size crossings exactly once each
/// - Apply persisted records back (overwrite + max-of-counts policy)
///
/// ## Invariants
/// - `transitions` and `frequencies` hold the same (prev, next) key sets
/// - Weights are >= 0 and start at exactly 1.0
/// - `crossings_handled` only grows
pub struct TransitionStore {
	/// Cumulative occurrence count per distinct word.
	word_freq: BTreeMap<String, u64>,
	/// Successor weights of the active block, indexed by predecessor.
	transitions: BTreeMap<String, BTreeMap<String, f64>>,
	/// Successor co-occurrence counts of the active block.
	frequencies: BTreeMap<String, BTreeMap<String, u64>>,
	block_size: usize,
	/// Block-size multiples already rotated past (or adopted on load).
	crossings_handled: usize,
}

impl TransitionStore {
	/// Creates an empty store rotating every `block_size` distinct words.
	///
	/// A zero block size would rotate on every word; it is clamped to 1.
	pub fn new(block_size: usize) -> Self {
		Self {
			word_freq: BTreeMap::new(),
			transitions: BTreeMap::new(),
			frequencies: BTreeMap::new(),
			block_size: block_size.max(1),
			crossings_handled: 0,
		}
	}

	/// Counts one occurrence of `word`.
	///
	/// Returns true when the word was not known before, which is the
	/// only moment a block-size crossing can happen.
	pub fn observe_word(&mut self, word: &str) -> bool {
		match self.word_freq.get_mut(word) {
			Some(count) => {
				*count += 1;
				false
			}
			None => {
				self.word_freq.insert(word.to_owned(), 1);
				true
			}
		}
	}

	/// Records one observation of `prev` followed by `next`.
	///
	/// The co-occurrence count always goes up by one. The weight starts
	/// at exactly 1.0 and grows by `emotion_weight * REPEAT_STEP` on
	/// every later observation.
	pub fn record_transition(&mut self, prev: &str, next: &str, emotion_weight: f64) {
		*self
			.frequencies
			.entry(prev.to_owned())
			.or_default()
			.entry(next.to_owned())
			.or_insert(0) += 1;

		self.transitions
			.entry(prev.to_owned())
			.or_default()
			.entry(next.to_owned())
			.and_modify(|weight| *weight += emotion_weight * REPEAT_STEP)
			.or_insert(1.0);
	}

	/// True when the distinct-word count has crossed a block-size
	/// multiple that has not been handled yet.
	pub fn should_rotate(&self) -> bool {
		self.word_freq.len() / self.block_size > self.crossings_handled
	}

	/// Re-aligns the crossing counter with the current vocabulary size.
	///
	/// Called after a rotation and after any bulk vocabulary change
	/// (block load, snapshot merge), so an already-crossed multiple does
	/// not fire again.
	pub fn sync_crossings(&mut self) {
		self.crossings_handled = self.word_freq.len() / self.block_size;
	}

	/// Empties the active transition and frequency maps. The vocabulary
	/// is cumulative and survives.
	pub fn clear_active(&mut self) {
		self.transitions.clear();
		self.frequencies.clear();
	}

	/// Applies one persisted record.
	///
	/// Frequency and weight overwrite whatever is in memory; the
	/// predecessor's vocabulary count only ever grows (max policy).
	pub fn apply_record(&mut self, record: TransitionRecord) {
		let TransitionRecord { prev, next, frequency, weight } = record;

		self.frequencies
			.entry(prev.clone())
			.or_default()
			.insert(next.clone(), frequency);
		self.transitions
			.entry(prev.clone())
			.or_default()
			.insert(next, weight);

		let count = self.word_freq.entry(prev).or_insert(0);
		*count = (*count).max(frequency);
	}

	/// Max-of-counts merge of a persisted vocabulary.
	pub fn merge_vocabulary(&mut self, words: BTreeMap<String, u64>) {
		for (word, frequency) in words {
			let count = self.word_freq.entry(word).or_insert(0);
			*count = (*count).max(frequency);
		}
		self.sync_crossings();
	}

	/// Records of the active block, ordered by predecessor then
	/// successor.
	pub fn records(&self) -> impl Iterator<Item = TransitionRecord> + '_ {
		self.transitions.iter().flat_map(move |(prev, successors)| {
			successors.iter().map(move |(next, weight)| {
				let frequency = self
					.frequencies
					.get(prev)
					.and_then(|pairs| pairs.get(next))
					.copied()
					.unwrap_or(0);
				TransitionRecord {
					prev: prev.clone(),
					next: next.clone(),
					frequency,
					weight: *weight,
				}
			})
		})
	}

	/// Number of distinct words seen so far.
	pub fn vocabulary_len(&self) -> usize {
		self.word_freq.len()
	}

	/// Cumulative occurrence counts of every known word.
	pub fn vocabulary(&self) -> &BTreeMap<String, u64> {
		&self.word_freq
	}

	/// Cumulative occurrence count of `word` (0 when unknown).
	pub fn word_frequency(&self, word: &str) -> u64 {
		self.word_freq.get(word).copied().unwrap_or(0)
	}

	/// Co-occurrence count of (`prev`, `next`) in the active block.
	pub fn pair_frequency(&self, prev: &str, next: &str) -> Option<u64> {
		self.frequencies.get(prev)?.get(next).copied()
	}

	/// Learned weight of (`prev`, `next`) in the active block.
	pub fn transition_weight(&self, prev: &str, next: &str) -> Option<f64> {
		self.transitions.get(prev)?.get(next).copied()
	}

	/// Successor weights of `word`, `None` when it has none.
	pub fn successors(&self, word: &str) -> Option<&BTreeMap<String, f64>> {
		self.transitions.get(word).filter(|successors| !successors.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::{TransitionRecord, TransitionStore};

	#[test]
	fn repeated_pairs_accumulate() {
		let mut store = TransitionStore::new(5000);
		for word in ["a", "b", "a", "b", "a", "b"] {
			store.observe_word(word);
		}
		store.record_transition("a", "b", 0.3);
		store.record_transition("b", "a", 0.3);
		store.record_transition("a", "b", 0.3);

		assert_eq!(store.word_frequency("a"), 3);
		assert_eq!(store.word_frequency("b"), 3);
		assert_eq!(store.pair_frequency("a", "b"), Some(2));
		assert_eq!(store.pair_frequency("b", "a"), Some(1));

		let weight = store.transition_weight("a", "b").unwrap();
		assert!((weight - 1.03).abs() < 1e-9);
		assert_eq!(store.transition_weight("b", "a"), Some(1.0));
	}

	#[test]
	fn rotation_fires_once_per_crossing() {
		let mut store = TransitionStore::new(2);
		assert!(store.observe_word("one"));
		assert!(!store.should_rotate());
		assert!(store.observe_word("two"));
		assert!(store.should_rotate());
		store.sync_crossings();
		assert!(!store.should_rotate());

		// Repeats keep the vocabulary on the multiple; no re-fire.
		assert!(!store.observe_word("two"));
		assert!(!store.should_rotate());

		assert!(store.observe_word("three"));
		assert!(!store.should_rotate());
		assert!(store.observe_word("four"));
		assert!(store.should_rotate());
	}

	#[test]
	fn clear_active_keeps_vocabulary() {
		let mut store = TransitionStore::new(5000);
		store.observe_word("a");
		store.observe_word("b");
		store.record_transition("a", "b", 0.3);

		store.clear_active();

		assert_eq!(store.transition_weight("a", "b"), None);
		assert_eq!(store.pair_frequency("a", "b"), None);
		assert_eq!(store.vocabulary_len(), 2);
	}

	#[test]
	fn apply_record_overwrites_pairs_and_grows_vocabulary() {
		let mut store = TransitionStore::new(5000);
		store.observe_word("cat");
		store.apply_record(TransitionRecord {
			prev: "cat".to_owned(),
			next: "sat".to_owned(),
			frequency: 4,
			weight: 1.2,
		});

		assert_eq!(store.word_frequency("cat"), 4);
		assert_eq!(store.pair_frequency("cat", "sat"), Some(4));
		assert_eq!(store.transition_weight("cat", "sat"), Some(1.2));

		// A lower persisted count never shrinks the vocabulary.
		store.apply_record(TransitionRecord {
			prev: "cat".to_owned(),
			next: "ran".to_owned(),
			frequency: 2,
			weight: 1.0,
		});
		assert_eq!(store.word_frequency("cat"), 4);
	}

	#[test]
	fn records_are_ordered_by_predecessor_then_successor() {
		let mut store = TransitionStore::new(5000);
		store.record_transition("b", "a", 0.3);
		store.record_transition("a", "z", 0.3);
		store.record_transition("a", "b", 0.3);

		let keys: Vec<(String, String)> = store
			.records()
			.map(|record| (record.prev, record.next))
			.collect();
		assert_eq!(
			keys,
			vec![
				("a".to_owned(), "b".to_owned()),
				("a".to_owned(), "z".to_owned()),
				("b".to_owned(), "a".to_owned()),
			]
		);
	}
}
