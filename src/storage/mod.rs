//!
//! dormhub storage module
//! ----------------------
//! A small document store: named collections of JSON documents keyed by an
//! opaque id. Collections live in memory and, when the store is rooted at a
//! folder, every mutation rewrites `<root>/<collection>.json` atomically.
//!
//! Key responsibilities:
//! - Typed access through the `Document` trait (collection name + id).
//! - Point lookups, predicate scans, counts and single-document updates.
//! - Crash-safe persistence (write to a temp file, then rename).
//!
//! The public API centers around the `Store` type, which is usually wrapped in a
//! thread-safe `SharedStore` (`Arc<Mutex<Store>>`) elsewhere in the codebase.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::AppError;

mod io;

/// A record that lives in exactly one collection and carries its own key.
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;
    fn id(&self) -> &str;
}

type Collection = BTreeMap<String, JsonValue>;

/// Core document store.
///
/// With no root folder the store is memory-only (tests, ephemeral runs).
pub struct Store {
    root: Option<PathBuf>,
    collections: HashMap<String, Collection>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self { root: None, collections: HashMap::new() }
    }

    /// Open (or create) a store rooted at the given folder and load every
    /// collection file found there.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create or access data folder: {}", root.display()))?;
        let collections = io::load_collections(&root)?;
        debug!(target: "dormhub::storage", "opened store root='{}' collections={}", root.display(), collections.len());
        Ok(Self { root: Some(root), collections })
    }

    /// Insert a new document. Fails with a conflict if the id is taken.
    pub fn insert<D: Document>(&mut self, doc: &D) -> Result<()> {
        if self.contains::<D>(doc.id()) {
            return Err(AppError::conflict(
                "duplicate_id".to_string(),
                format!("{} '{}' already exists", D::COLLECTION, doc.id()),
            ).into());
        }
        let mut staged = self.staged(D::COLLECTION);
        staged.insert(doc.id().to_string(), serde_json::to_value(doc)?);
        self.commit(D::COLLECTION, staged)
    }

    /// Insert or replace a document by id.
    pub fn upsert<D: Document>(&mut self, doc: &D) -> Result<()> {
        let mut staged = self.staged(D::COLLECTION);
        staged.insert(doc.id().to_string(), serde_json::to_value(doc)?);
        self.commit(D::COLLECTION, staged)
    }

    pub fn contains<D: Document>(&self, id: &str) -> bool {
        self.collections.get(D::COLLECTION).map(|c| c.contains_key(id)).unwrap_or(false)
    }

    pub fn get<D: Document>(&self, id: &str) -> Result<Option<D>> {
        let Some(v) = self.collections.get(D::COLLECTION).and_then(|c| c.get(id)) else { return Ok(None) };
        let doc = serde_json::from_value(v.clone())
            .with_context(|| format!("corrupt document {}/{}", D::COLLECTION, id))?;
        Ok(Some(doc))
    }

    /// All documents of a collection matching `filter`, in id order.
    pub fn find<D: Document>(&self, filter: impl Fn(&D) -> bool) -> Result<Vec<D>> {
        let Some(coll) = self.collections.get(D::COLLECTION) else { return Ok(Vec::new()) };
        let mut out = Vec::new();
        for (id, v) in coll.iter() {
            match serde_json::from_value::<D>(v.clone()) {
                Ok(doc) => if filter(&doc) { out.push(doc) },
                Err(e) => warn!(target: "dormhub::storage", "skipping unreadable document {}/{}: {}", D::COLLECTION, id, e),
            }
        }
        Ok(out)
    }

    pub fn find_one<D: Document>(&self, filter: impl Fn(&D) -> bool) -> Result<Option<D>> {
        Ok(self.find(filter)?.into_iter().next())
    }

    pub fn count<D: Document>(&self, filter: impl Fn(&D) -> bool) -> Result<usize> {
        Ok(self.find(filter)?.len())
    }

    /// Read-modify-write one document. Returns the stored result, or None when
    /// the id is unknown. The key never changes even if `apply` edits the id field.
    pub fn update<D: Document>(&mut self, id: &str, apply: impl FnOnce(&mut D)) -> Result<Option<D>> {
        let Some(mut doc) = self.get::<D>(id)? else { return Ok(None) };
        apply(&mut doc);
        let mut staged = self.staged(D::COLLECTION);
        staged.insert(id.to_string(), serde_json::to_value(&doc)?);
        self.commit(D::COLLECTION, staged)?;
        Ok(Some(doc))
    }

    pub fn delete<D: Document>(&mut self, id: &str) -> Result<bool> {
        if !self.contains::<D>(id) { return Ok(false); }
        let mut staged = self.staged(D::COLLECTION);
        staged.remove(id);
        self.commit(D::COLLECTION, staged)?;
        Ok(true)
    }

    /// Delete every document matching `filter`; returns how many went away.
    pub fn delete_where<D: Document>(&mut self, filter: impl Fn(&D) -> bool) -> Result<usize> {
        let doomed: Vec<String> = self.find::<D>(&filter)?.iter().map(|d| d.id().to_string()).collect();
        if doomed.is_empty() { return Ok(0); }
        let mut staged = self.staged(D::COLLECTION);
        for id in doomed.iter() { staged.remove(id); }
        self.commit(D::COLLECTION, staged)?;
        Ok(doomed.len())
    }

    fn staged(&self, collection: &str) -> Collection {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    /// Write the staged collection first; memory only changes once the file is in place.
    fn commit(&mut self, collection: &str, docs: Collection) -> Result<()> {
        if let Some(root) = self.root.as_ref() {
            io::write_collection(root, collection, &docs)?;
        }
        self.collections.insert(collection.to_string(), docs);
        Ok(())
    }
}

/// Thread-safe handle shared by all request handlers.
#[derive(Clone)]
pub struct SharedStore(pub Arc<Mutex<Store>>);

impl SharedStore {
    pub fn new(store: Store) -> Self { Self(Arc::new(Mutex::new(store))) }

    pub fn in_memory() -> Self { Self::new(Store::in_memory()) }

    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> { Ok(Self::new(Store::open(root)?)) }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod storage_tests;
