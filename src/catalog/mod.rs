//! Department catalog built on the B+Tree.
//!
//! # Components
//! - [`KeyHasher`] - Name-to-key derivation ([`Djb2`], [`Crc32`])
//! - [`DepartmentRecord`] - One input row
//! - [`loader`] - Comma separated row parsing
//! - [`Catalog`] - Rows grouped per department, queried by rank

mod department_catalog;
mod hasher;
pub mod loader;
mod record;

pub use department_catalog::Catalog;
pub use hasher::{key_for, AnyHasher, Crc32, Djb2, KeyHasher};
pub use record::DepartmentRecord;
