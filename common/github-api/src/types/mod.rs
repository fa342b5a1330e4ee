//! GitHub record types
//!
//! Only the fields the tracker reads are modeled; unknown fields are ignored.

pub mod common;
pub mod event;
pub mod issue;

pub use common::{Label, Organization, Repository, User};
pub use event::{EventPayload, PayloadComment, PayloadItem, PushCommit, RepoEvent, WikiPage};
pub use issue::{Issue, IssueKind, IssueState, Milestone};
