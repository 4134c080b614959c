use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::store::TransitionRecord;

/// Extension used by persisted block files.
const BLOCK_EXTENSION: &str = "dat";

/// File name of the vocabulary snapshot, kept next to the block files.
const VOCAB_SNAPSHOT: &str = "vocab.bin";

/// Creates the storage directory if needed.
///
/// Best-effort: the caller downgrades to memory-only operation on
/// failure.
pub(crate) fn ensure_dir<P: AsRef<Path>>(dir: P) -> io::Result<()> {
	fs::create_dir_all(dir)
}

/// Builds the path of a block file from its ordinal number.
///
/// Example:
/// `model_blocks` + `3` → `model_blocks/block_3.dat`
pub(crate) fn block_path<P: AsRef<Path>>(dir: P, block: usize) -> PathBuf {
	dir.as_ref().join(format!("block_{block}.{BLOCK_EXTENSION}"))
}

/// Writes the records of a block, one line per transition:
/// `<predecessor> <successor> <frequency> <weight>`.
///
/// Whitespace-separated, newline-terminated, no header. Tokens never
/// contain separators, so no escaping is needed.
pub(crate) fn write_block<P, I>(dir: P, block: usize, records: I) -> io::Result<()>
where
	P: AsRef<Path>,
	I: Iterator<Item = TransitionRecord>,
{
	let file = File::create(block_path(dir, block))?;
	let mut out = BufWriter::new(file);
	for record in records {
		writeln!(
			out,
			"{} {} {} {}",
			record.prev, record.next, record.frequency, record.weight
		)?;
	}
	out.flush()
}

/// Reads a block file back into records.
///
/// Returns `Ok(None)` when the block was never flushed. Malformed lines
/// are skipped with a warning instead of aborting the load.
pub(crate) fn read_block<P: AsRef<Path>>(
	dir: P,
	block: usize,
) -> io::Result<Option<Vec<TransitionRecord>>> {
	let path = block_path(dir, block);
	let file = match File::open(&path) {
		Ok(file) => file,
		Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
		Err(error) => return Err(error),
	};

	let mut records = Vec::new();
	for line in BufReader::new(file).lines() {
		let line = line?;
		if line.trim().is_empty() {
			continue;
		}
		match parse_record(&line) {
			Some(record) => records.push(record),
			None => log::warn!("skipping malformed line in {}: {line:?}", path.display()),
		}
	}

	Ok(Some(records))
}

/// Parses one `<prev> <next> <freq> <weight>` line.
///
/// Any other field count or a non-numeric field makes the line
/// malformed.
fn parse_record(line: &str) -> Option<TransitionRecord> {
	let mut fields = line.split_whitespace();
	let prev = fields.next()?.to_owned();
	let next = fields.next()?.to_owned();
	let frequency = fields.next()?.parse().ok()?;
	let weight = fields.next()?.parse().ok()?;
	if fields.next().is_some() {
		return None;
	}
	Some(TransitionRecord { prev, next, frequency, weight })
}

/// Lists the ordinals of all block files present in `dir`, sorted.
///
/// A missing or unreadable directory yields an empty list.
pub(crate) fn list_blocks<P: AsRef<Path>>(dir: P) -> Vec<usize> {
	let entries = match fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(_) => return Vec::new(),
	};

	let mut blocks: Vec<usize> = entries
		.filter_map(|entry| {
			let path = entry.ok()?.path();
			if !path.is_file()
				|| path.extension() != Some(std::ffi::OsStr::new(BLOCK_EXTENSION))
			{
				return None;
			}
			let stem = path.file_stem()?.to_str()?;
			stem.strip_prefix("block_")?.parse().ok()
		})
		.collect();

	blocks.sort_unstable();
	blocks
}

/// Serializes the cumulative vocabulary next to the block files.
pub(crate) fn write_vocabulary<P: AsRef<Path>>(
	dir: P,
	words: &BTreeMap<String, u64>,
) -> io::Result<()> {
	let bytes = postcard::to_stdvec(words)
		.map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
	fs::write(dir.as_ref().join(VOCAB_SNAPSHOT), bytes)
}

/// Loads the vocabulary snapshot if one exists.
///
/// Returns `None` when the snapshot is absent or unreadable; a corrupt
/// snapshot is dropped with a warning rather than failing construction.
pub(crate) fn read_vocabulary<P: AsRef<Path>>(dir: P) -> Option<BTreeMap<String, u64>> {
	let path = dir.as_ref().join(VOCAB_SNAPSHOT);
	let bytes = match fs::read(&path) {
		Ok(bytes) => bytes,
		Err(error) => {
			if error.kind() != io::ErrorKind::NotFound {
				log::warn!("failed to read {}: {error}", path.display());
			}
			return None;
		}
	};

	match postcard::from_bytes(&bytes) {
		Ok(words) => Some(words),
		Err(error) => {
			log::warn!("dropping corrupt vocabulary snapshot {}: {error}", path.display());
			None
		}
	}
}
