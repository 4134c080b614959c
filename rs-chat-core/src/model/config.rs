use std::path::PathBuf;

/// Construction parameters for a [`LanguageModel`].
///
/// # Notes
/// - `block_size` counts distinct words, not tokens.
/// - The storage directory is created on construction, best-effort.
///
/// [`LanguageModel`]: super::language_model::LanguageModel
#[derive(Clone, Debug)]
pub struct ModelConfig {
	/// Number of distinct words that triggers a block rotation.
	pub block_size: usize,

	/// Directory holding block files and the vocabulary snapshot.
	pub storage_dir: PathBuf,

	/// Fixed sampler seed; `None` seeds from entropy.
	pub seed: Option<u64>,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			block_size: 5000,
			storage_dir: PathBuf::from("model_blocks"),
			seed: None,
		}
	}
}
