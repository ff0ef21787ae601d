//! Domain model types (pure).
//!
//! Typed identifiers, the entities returned by the backing store, and the error taxonomy.

pub mod entities;
pub mod error;
pub mod identifiers;

// Re-export for convenience
pub use entities::{
    Book, CatalogEntry, CatalogNode, Category, CommentaryEntry, Line, LineSource, TocEntry,
};
pub use error::{AppError, FetchError, SessionError};
pub use identifiers::{
    BookId, CategoryId, CommentatorId, EntityKind, LineId, TabId, TargumSourceId, TocEntryId,
};
