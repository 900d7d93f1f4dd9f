//! On-disk input journal: JSONL, one header line then one hash-chained record per input.
//!
//! Records are flushed as they are appended, so a crashed session leaves a file whose
//! intact prefix still loads. Each record carries `prev_sha256_hex` and `sha256_hex`;
//! the loader recomputes the chain and stops at the first line that breaks it.

use std::error::Error;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::journal::{InputJournal, InputPayload, InputRecord};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct FileHeader {
    format_version: u16,
    build_id: String,
    seed: u64,
    start_level: u32,
    starting_coins: u64,
}

/// The part of a record covered by its hash.
#[derive(Serialize)]
struct RecordBody<'a> {
    seq: u64,
    at_ms: u64,
    payload: &'a InputPayload,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct FileRecord {
    seq: u64,
    at_ms: u64,
    payload: InputPayload,
    prev_sha256_hex: String,
    sha256_hex: String,
}

/// What the first record of every chain links back to.
const INITIAL_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Tip of a record chain: the hash the next record links to, and its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HashChain {
    last_sha256_hex: String,
    next_seq: u64,
}

impl HashChain {
    fn genesis() -> Self {
        Self { last_sha256_hex: INITIAL_HASH.to_string(), next_seq: 0 }
    }

    /// `hex(SHA-256(body_json || last_sha256_hex))`.
    fn digest(&self, seq: u64, at_ms: u64, payload: &InputPayload) -> serde_json::Result<String> {
        let body_json = serde_json::to_string(&RecordBody { seq, at_ms, payload })?;
        let mut hasher = Sha256::new();
        hasher.update(body_json.as_bytes());
        hasher.update(self.last_sha256_hex.as_bytes());
        Ok(format!("{:064x}", hasher.finalize()))
    }

    /// Builds the record that would extend the chain, without advancing it.
    fn seal(&self, at_ms: u64, payload: InputPayload) -> serde_json::Result<FileRecord> {
        Ok(FileRecord {
            seq: self.next_seq,
            at_ms,
            payload,
            prev_sha256_hex: self.last_sha256_hex.clone(),
            sha256_hex: self.digest(self.next_seq, at_ms, &payload)?,
        })
    }

    fn advance(&mut self, record: FileRecord) {
        self.last_sha256_hex = record.sha256_hex;
        self.next_seq += 1;
    }

    fn verify(&self, record: &FileRecord, line: usize) -> Result<(), JournalLoadError> {
        if record.seq != self.next_seq {
            return Err(JournalLoadError::InvalidRecord {
                line,
                message: format!("expected seq {}, found {}", self.next_seq, record.seq),
            });
        }
        if record.prev_sha256_hex != self.last_sha256_hex {
            return Err(JournalLoadError::HashChainBroken { line });
        }
        let expected = self
            .digest(record.seq, record.at_ms, &record.payload)
            .map_err(|e| JournalLoadError::InvalidRecord { line, message: e.to_string() })?;
        if record.sha256_hex != expected {
            return Err(JournalLoadError::HashChainBroken { line });
        }
        Ok(())
    }
}

/// Appends accepted inputs to a journal file.
pub struct JournalWriter {
    writer: BufWriter<File>,
    chain: HashChain,
}

impl JournalWriter {
    /// Creates a journal file from `journal`'s header, followed by any inputs it already holds.
    pub fn create(path: &Path, journal: &InputJournal) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        let header = FileHeader {
            format_version: journal.format_version,
            build_id: journal.build_id.clone(),
            seed: journal.seed,
            start_level: journal.start_level,
            starting_coins: journal.starting_coins,
        };
        serde_json::to_writer(&mut writer, &header).map_err(io::Error::other)?;
        writeln!(writer)?;
        writer.flush()?;

        let mut journal_writer = Self { writer, chain: HashChain::genesis() };
        for record in &journal.inputs {
            journal_writer.append(record.at_ms, &record.payload)?;
        }
        Ok(journal_writer)
    }

    /// Reopens a loaded journal for appending, continuing its chain.
    pub fn resume(path: &Path, last_sha256_hex: String, next_seq: u64) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self { writer: BufWriter::new(file), chain: HashChain { last_sha256_hex, next_seq } })
    }

    pub fn next_seq(&self) -> u64 {
        self.chain.next_seq
    }

    /// Appends one accepted input and flushes immediately.
    pub fn append(&mut self, at_ms: u64, payload: &InputPayload) -> io::Result<()> {
        let record = self.chain.seal(at_ms, *payload).map_err(io::Error::other)?;
        serde_json::to_writer(&mut self.writer, &record).map_err(io::Error::other)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        self.chain.advance(record);
        Ok(())
    }
}

/// A verified journal plus the chain tip needed to resume appending.
#[derive(Debug)]
pub struct LoadedJournal {
    pub journal: InputJournal,
    /// Hash of the last valid record, or the initial hash when there are none.
    pub last_sha256_hex: String,
    pub next_seq: u64,
}

#[derive(Debug)]
pub enum JournalLoadError {
    Io(io::Error),
    EmptyFile,
    InvalidHeader { line: usize, message: String },
    InvalidRecord { line: usize, message: String },
    /// The file ended without a trailing newline.
    IncompleteLine { line: usize },
    /// A prev-hash link or a recomputed record hash does not match.
    HashChainBroken { line: usize },
}

impl fmt::Display for JournalLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "journal I/O error: {e}"),
            Self::EmptyFile => write!(f, "journal file is empty"),
            Self::InvalidHeader { line, message } => {
                write!(f, "invalid journal header at line {line}: {message}")
            }
            Self::InvalidRecord { line, message } => {
                write!(f, "invalid journal record at line {line}: {message}")
            }
            Self::IncompleteLine { line } => write!(f, "line {line} of the journal is cut short"),
            Self::HashChainBroken { line } => {
                write!(f, "journal hash chain broken at line {line}")
            }
        }
    }
}

impl Error for JournalLoadError {}

/// Streams a journal file line by line, stopping at the first bad line.
pub fn load_journal_from_file(path: &Path) -> Result<LoadedJournal, JournalLoadError> {
    let mut reader = BufReader::new(File::open(path).map_err(JournalLoadError::Io)?);
    let mut journal: Option<InputJournal> = None;
    let mut chain = HashChain::genesis();
    let mut buffer = String::new();
    let mut line = 0;

    loop {
        buffer.clear();
        if reader.read_line(&mut buffer).map_err(JournalLoadError::Io)? == 0 {
            break;
        }
        line += 1;
        let Some(text) = buffer.strip_suffix('\n') else {
            return Err(JournalLoadError::IncompleteLine { line });
        };
        let text = text.strip_suffix('\r').unwrap_or(text);

        let Some(journal) = journal.as_mut() else {
            let header: FileHeader = serde_json::from_str(text)
                .map_err(|e| JournalLoadError::InvalidHeader { line, message: e.to_string() })?;
            journal = Some(InputJournal {
                format_version: header.format_version,
                build_id: header.build_id,
                seed: header.seed,
                start_level: header.start_level,
                starting_coins: header.starting_coins,
                inputs: Vec::new(),
            });
            continue;
        };

        if text.is_empty() {
            return Err(JournalLoadError::InvalidRecord { line, message: "empty line".to_string() });
        }
        let record: FileRecord = serde_json::from_str(text)
            .map_err(|e| JournalLoadError::InvalidRecord { line, message: e.to_string() })?;
        chain.verify(&record, line)?;

        journal.inputs.push(InputRecord {
            seq: record.seq,
            at_ms: record.at_ms,
            payload: record.payload,
        });
        chain.advance(record);
    }

    let journal = journal.ok_or(JournalLoadError::EmptyFile)?;
    Ok(LoadedJournal { journal, last_sha256_hex: chain.last_sha256_hex, next_seq: chain.next_seq })
}
