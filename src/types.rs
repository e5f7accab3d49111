use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One remote file or directory entry, as reported by the listing provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Base filename
    pub name: String,
    /// Full remote path, unique per listing
    pub path: String,
    /// Size in bytes (directories report zero)
    pub size: u64,
    /// Last modification time; absent when the attribute fetch failed
    pub modified_at: Option<DateTime<FixedOffset>>,
    /// Creation time; absent when the attribute fetch failed
    pub created_at: Option<DateTime<FixedOffset>>,
    /// Whether this entry is a directory
    pub is_directory: bool,
}

impl FileRecord {
    /// The timestamp selected by a [`TimeField`]
    pub fn timestamp(&self, field: TimeField) -> Option<DateTime<FixedOffset>> {
        match field {
            TimeField::Modified => self.modified_at,
            TimeField::Created => self.created_at,
        }
    }
}

/// Which timestamp the threshold filter compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeField {
    #[default]
    Modified,
    Created,
}

/// Derived grouping identity linking a structured file and its rendered
/// counterpart
///
/// Two records with the same key and different roles represent the same
/// logical document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey(pub String);

impl DocumentKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role a file plays within a logical document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Machine-readable export carrying extractable fields (`.json`)
    StructuredData,
    /// Print representation of the same record (`.pdf`)
    RenderedFile,
    /// Unrecognized extension; excluded from pairing but still reported
    Unknown,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::StructuredData => "structured",
            Role::RenderedFile => "rendered",
            Role::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A complete logical document: both roles present for one key
///
/// Created only when both sibling records were observed during grouping;
/// consumed exactly once by the dispatch controller.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPair {
    pub key: DocumentKey,
    pub structured: FileRecord,
    pub rendered: FileRecord,
}

/// Normalized field mapping extracted from a structured file
///
/// Owned by the payload extractor until handed to dispatch; not mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    /// Extracted fields, keyed by contract field name
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Per-document result of a sweep
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Both sends succeeded
    Sent,
    /// One role was never observed; dispatch was not attempted
    SkippedIncomplete { missing: Role },
    /// Reading or parsing the structured file failed; dispatch was not
    /// attempted
    FailedExtraction { reason: String },
    /// The structured send failed; the rendered send was never attempted
    FailedStructuredSend { status: Option<u16> },
    /// The structured send succeeded but the rendered send failed, leaving
    /// a partial remote state that needs manual reconciliation
    FailedRenderedSend { status: Option<u16> },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Sent => write!(f, "sent"),
            DispatchOutcome::SkippedIncomplete { missing } => {
                write!(f, "skipped (missing {} file)", missing)
            }
            DispatchOutcome::FailedExtraction { reason } => {
                write!(f, "extraction failed: {}", reason)
            }
            DispatchOutcome::FailedStructuredSend { status } => match status {
                Some(code) => write!(f, "structured send failed (HTTP {})", code),
                None => write!(f, "structured send failed (transport error)"),
            },
            DispatchOutcome::FailedRenderedSend { status } => match status {
                Some(code) => write!(
                    f,
                    "rendered send failed (HTTP {}) - NEEDS RECONCILIATION",
                    code
                ),
                None => write!(f, "rendered send failed (transport error) - NEEDS RECONCILIATION"),
            },
        }
    }
}

/// Run-level summary: one outcome per document key observed, in emission
/// order, plus the records that matched no role
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(DocumentKey, DispatchOutcome)>,
    pub unknown: Vec<FileRecord>,
}

impl RunSummary {
    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_sent()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| {
                !matches!(
                    o,
                    DispatchOutcome::Sent | DispatchOutcome::SkippedIncomplete { .. }
                )
            })
            .count()
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, outcome) in &self.outcomes {
            writeln!(f, "{}: {}", key, outcome)?;
        }
        for record in &self.unknown {
            writeln!(f, "{}: unrecognized file, not paired", record.path)?;
        }
        writeln!(
            f,
            "{} document(s): {} sent, {} failed",
            self.outcomes.len(),
            self.sent_count(),
            self.failure_count()
        )
    }
}
