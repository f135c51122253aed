//! Book and version name tables.
//!
//! Resolves user-typed book names to canonical ids and supplies localized display
//! names, version labels and the version sort order.

mod error;
mod resolver;
mod tables;

pub use error::{CatalogError, Result};
pub use resolver::{BookNameResolver, Resolution, ResolveStrategy};
pub use tables::{
    normalize, BookNames, Catalog, VersionAlias, ALIASES_BOOK_FILE, ALIASES_VERSION_CLI_FILE,
    ALIASES_VERSION_FILE, DEFAULT_SORT_RANK, SORT_ORDER_FILE, STANDARD_BOOK_FILE,
};
