use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::catalog::BuildingCatalog;

/// Set of building-group ids picked on the site plan.
///
/// Ids are not checked against a catalog here; aggregation skips ids the
/// catalog does not know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Every group of the catalog, the calculator's initial state.
    pub fn all(catalog: &BuildingCatalog) -> Self {
        Self::from_ids(catalog.ids())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Reset to the full catalog id set, dropping any stale ids.
    pub fn select_all(&mut self, catalog: &BuildingCatalog) {
        *self = Self::all(catalog);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Selected ids that are not part of `catalog`.
    pub fn unknown_ids<'a>(&'a self, catalog: &BuildingCatalog) -> Vec<&'a str> {
        self.iter().filter(|id| !catalog.contains(id)).collect()
    }
}
