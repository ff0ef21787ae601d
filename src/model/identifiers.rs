//! Core identifier newtypes.
//!
//! Every tree node and content unit is identified by a 64-bit integer that is
//! unique within its entity kind only. The newtypes keep the id spaces apart
//! at compile time: a `BookId` can never be passed where a `CategoryId` is
//! expected, even though both wrap the same raw value.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw id value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Category identifier.
    CategoryId
);
id_newtype!(
    /// Book identifier.
    BookId
);
id_newtype!(
    /// Table-of-contents entry identifier, unique across all books.
    TocEntryId
);
id_newtype!(
    /// Line identifier.
    LineId
);
id_newtype!(
    /// Commentator identifier (author of a commentary).
    CommentatorId
);
id_newtype!(
    /// Targum (translation) source identifier.
    TargumSourceId
);
id_newtype!(
    /// Open tab identifier. Namespaces the tab's persisted keys.
    TabId
);

/// Entity kinds with independent id spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A catalog category.
    Category,
    /// A book.
    Book,
    /// A table-of-contents entry.
    TocEntry,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Category => "category",
            EntityKind::Book => "book",
            EntityKind::TocEntry => "toc entry",
        };
        f.write_str(name)
    }
}

// ===== Tests =====
