//! Department catalog - rows grouped by hashed department name.
//!
//! # Layout
//! ```text
//!  "Physics" ──hash──▶ key 1983… ──▶ BPlusTree ──▶ bucket: Vec<DepartmentRecord>
//!                                                   [row, row, row, ...]
//! ```
//!
//! Every row whose department hashes to the same key lands in one bucket, in
//! arrival order. Two different names can share a bucket when their hashes
//! collide, so reads filter on the exact name.

use std::mem::size_of;

use tracing::info;

use crate::catalog::hasher::{key_for, KeyHasher};
use crate::catalog::record::DepartmentRecord;
use crate::common::{Error, Result};
use crate::index::BPlusTree;

/// Rows indexed by department through a [`BPlusTree`].
///
/// # Example
/// ```
/// use bplusdb::catalog::{Catalog, DepartmentRecord, Djb2};
///
/// let mut catalog = Catalog::new(5, Djb2).unwrap();
/// for (id, score) in [(1, 450.0), (2, 430.0)] {
///     catalog
///         .insert(DepartmentRecord {
///             id,
///             university: "Ege".into(),
///             department: "Physics".into(),
///             score,
///         })
///         .unwrap();
/// }
///
/// assert_eq!(catalog.rank("Physics", 2).unwrap().map(|r| r.id), Some(2));
/// assert_eq!(catalog.rank("Physics", 3).unwrap(), None);
/// ```
pub struct Catalog<H> {
    tree: BPlusTree<Vec<DepartmentRecord>>,
    hasher: H,
    rows: usize,
}

impl<H: KeyHasher> Catalog<H> {
    /// Create an empty catalog over a tree of the given order.
    ///
    /// # Errors
    /// `Error::InvalidOrder` if `order < 3`.
    pub fn new(order: usize, hasher: H) -> Result<Self> {
        Ok(Self {
            tree: BPlusTree::new(order)?,
            hasher,
            rows: 0,
        })
    }

    /// Build a catalog from rows, inserting them in order.
    pub fn from_records<I>(order: usize, hasher: H, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = DepartmentRecord>,
    {
        let mut catalog = Self::new(order, hasher)?;
        for record in records {
            catalog.insert(record)?;
        }

        let stats = catalog.tree.stats();
        info!(
            rows = catalog.rows,
            keys = stats.keys,
            splits = stats.splits,
            height = stats.height,
            "built department catalog"
        );
        Ok(catalog)
    }

    /// Append a row to its department's bucket.
    ///
    /// # Errors
    /// `Error::ResourceExhausted` from the tree if a new bucket cannot be added.
    pub fn insert(&mut self, record: DepartmentRecord) -> Result<()> {
        let key = key_for(&self.hasher, &record.department);

        match self.tree.find_mut(key) {
            Some(bucket) => bucket.push(record),
            None => {
                self.tree.insert(key, vec![record])?;
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// The `rank`-th row (1-based, arrival order) of `department`.
    ///
    /// Rows of other departments that collide on the same key are skipped.
    ///
    /// # Errors
    /// `Error::InvalidRank` if `rank == 0`.
    pub fn rank(&self, department: &str, rank: usize) -> Result<Option<&DepartmentRecord>> {
        if rank == 0 {
            return Err(Error::InvalidRank);
        }
        Ok(self.rows_of(department).nth(rank - 1))
    }

    /// Number of rows stored for `department`.
    pub fn department_len(&self, department: &str) -> usize {
        self.rows_of(department).count()
    }

    /// Rows of `department` in arrival order.
    ///
    /// The rows borrow from the catalog only, so they outlive `department`.
    pub fn rows_of<'a, 'b>(
        &'a self,
        department: &'b str,
    ) -> impl Iterator<Item = &'a DepartmentRecord> + 'b
    where
        'a: 'b,
    {
        let key = key_for(&self.hasher, department);
        self.tree
            .find(key)
            .into_iter()
            .flatten()
            .filter(move |record| record.department == department)
    }

    /// Total rows inserted.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The underlying index, for diagnostics.
    pub fn tree(&self) -> &BPlusTree<Vec<DepartmentRecord>> {
        &self.tree
    }

    /// Bytes held by the tree plus every bucket's rows and their names.
    ///
    /// [`TreeStats::estimated_bytes`](crate::TreeStats) only sees each
    /// bucket's `Vec` header; this adds what the buckets own on the heap.
    pub fn estimated_bytes(&self) -> usize {
        let rows: usize = self
            .tree
            .iter()
            .map(|(_, bucket)| {
                bucket.capacity() * size_of::<DepartmentRecord>()
                    + bucket
                        .iter()
                        .map(|r| r.university.capacity() + r.department.capacity())
                        .sum::<usize>()
            })
            .sum();
        self.tree.stats().estimated_bytes + rows
    }
}
