//! Git operations and repository management.

pub mod changes;
pub mod remote;
pub mod repository;

pub use changes::{BranchChanges, ChangeSummary, CommitSummary, DiffText, FileChange, StagedChanges};
pub use remote::{BaseBranch, RemoteInfo};
pub use repository::GitRepository;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;

/// Number of recent commit subjects shown to the AI as style reference.
pub const RECENT_SUBJECT_LIMIT: usize = 10;
