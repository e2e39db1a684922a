// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user JSON collections on top of a [`KeyValueStore`].
//!
//! Every list-like entity is one JSON array stored under
//! `<feature>_<userId>`. Reads are tolerant: a missing or unparseable value
//! is an empty list. Writes replace the whole array.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::{keys, KeyValueStore, StoreResult};
use crate::services::session::SessionService;

/// A stored record with a stable identifier.
pub trait Record {
    fn record_id(&self) -> String;
}

/// Outcome of [`UserCollection::insert_unique`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Added,
    Duplicate,
}

/// Raw state of a collection in the store.
#[derive(Debug)]
pub enum Loaded<T> {
    Missing,
    Corrupt,
    Items(Vec<T>),
}

/// Repository for one feature's records, scoped to the current user.
pub struct UserCollection<T> {
    store: Arc<dyn KeyValueStore>,
    session: SessionService,
    feature: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for UserCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            session: self.session.clone(),
            feature: self.feature,
            _record: PhantomData,
        }
    }
}

impl<T> UserCollection<T>
where
    T: Record + Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: Arc<dyn KeyValueStore>, session: SessionService, feature: &'static str) -> Self {
        Self {
            store,
            session,
            feature,
            _record: PhantomData,
        }
    }

    /// Store key for the current user.
    pub fn key(&self) -> String {
        keys::user_key(self.feature, &self.session.current_user_id())
    }

    /// Read the collection, distinguishing "never written" from "corrupt".
    pub fn load(&self) -> StoreResult<Loaded<T>> {
        let key = self.key();
        let Some(raw) = self.store.get(&key)? else {
            return Ok(Loaded::Missing);
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(Loaded::Items(items)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Stored collection is not valid JSON, ignoring");
                Ok(Loaded::Corrupt)
            }
        }
    }

    /// All records, or an empty list when nothing usable is stored.
    pub fn list(&self) -> StoreResult<Vec<T>> {
        Ok(match self.load()? {
            Loaded::Items(items) => items,
            Loaded::Missing | Loaded::Corrupt => Vec::new(),
        })
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.list()?.into_iter().find(|item| item.record_id() == id))
    }

    pub fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Overwrite the whole collection.
    pub fn replace(&self, items: &[T]) -> StoreResult<()> {
        let body = serde_json::to_string(items)?;
        self.store.set(&self.key(), &body)
    }

    /// Append a record.
    pub fn push(&self, item: T) -> StoreResult<Vec<T>> {
        let mut items = self.list()?;
        items.push(item);
        self.replace(&items)?;
        Ok(items)
    }

    /// Insert a record at the front (newest first).
    pub fn prepend(&self, item: T) -> StoreResult<Vec<T>> {
        let mut items = self.list()?;
        items.insert(0, item);
        self.replace(&items)?;
        Ok(items)
    }

    /// Append unless a record with the same id already exists.
    pub fn insert_unique(&self, item: T) -> StoreResult<Inserted> {
        let mut items = self.list()?;
        let id = item.record_id();
        if items.iter().any(|existing| existing.record_id() == id) {
            return Ok(Inserted::Duplicate);
        }
        items.push(item);
        self.replace(&items)?;
        Ok(Inserted::Added)
    }

    /// Replace the record with the same id, or append it.
    pub fn upsert(&self, item: T) -> StoreResult<()> {
        let mut items = self.list()?;
        let id = item.record_id();
        match items.iter_mut().find(|existing| existing.record_id() == id) {
            Some(slot) => *slot = item,
            None => items.push(item),
        }
        self.replace(&items)
    }

    /// Apply `f` to the record with `id`. Returns the updated record, or
    /// `None` (and writes nothing) if no record matches.
    pub fn update<F>(&self, id: &str, f: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.list()?;
        let Some(slot) = items.iter_mut().find(|item| item.record_id() == id) else {
            return Ok(None);
        };
        f(slot);
        let updated = slot.clone();
        self.replace(&items)?;
        Ok(Some(updated))
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut items = self.list()?;
        let before = items.len();
        items.retain(|item| item.record_id() != id);
        if items.len() == before {
            return Ok(false);
        }
        self.replace(&items)?;
        Ok(true)
    }
}
