//! Domain logic - pure business rules independent of git operations

pub mod bump;
pub mod commit;
pub mod tag;
pub mod version;

pub use bump::BumpLevel;
pub use commit::{parse_subject, ParsedCommit, ParsedSubject};
pub use tag::TagNaming;
pub use version::{bump_version, Version};
