//! bplusdb - An in-memory B+Tree index with a department catalog on top.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            bplusdb                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Binary (main.rs)                         │   │
//! │  │     AppConfig::from_env → load rows → prompt loop        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               Catalog Layer (catalog/)                   │   │
//! │  │   loader → DepartmentRecord → KeyHasher → Catalog        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Index Layer (index/)                      │   │
//! │  │   BPlusTree: lookup engine + split engine + diagnostics  │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │   NodeArena: Vec<Node>, addressed by NodeId      │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - The B+Tree
//! - [`catalog`] - Hashing, row ingestion and rank queries
//!
//! # Quick Start
//! ```
//! use bplusdb::BPlusTree;
//!
//! let mut tree = BPlusTree::new(5).unwrap();
//! tree.insert(42, "answer").unwrap();
//!
//! assert_eq!(tree.find(42), Some(&"answer"));
//! assert_eq!(tree.range(0, 100).count(), 1);
//! ```

pub mod catalog;
pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{Error, NodeId, Result};

pub use catalog::{Catalog, DepartmentRecord, KeyHasher};
pub use index::{BPlusTree, Key, Range, Record, TreeStats};
