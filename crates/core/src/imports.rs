//! Per-artifact import bookkeeping.
//!
//! Renderers and mappers record what they reference in an [`ImportSet`]
//! while an artifact is built. Parallel work uses one set per declaration;
//! the sets are merged afterwards and rendered once into the import block.

use std::collections::{BTreeMap, BTreeSet};

use crate::ts::{ImportClause, ImportItem, TsImport};

/// Module-local helpers emitted next to the code that calls them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Helper {
    /// Drops `undefined` entries from an object.
    Compact,
}

/// Write-only accumulator of the imports and helpers one artifact needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    /// alias -> (module path, type only)
    namespaces: BTreeMap<String, (String, bool)>,
    /// module path -> (name, type only)
    named: BTreeMap<String, BTreeMap<String, bool>>,
    helpers: BTreeSet<Helper>,
}

impl ImportSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `import * as alias from 'from'`. A value use wins over a
    /// type-only use of the same alias.
    pub fn use_namespace(&mut self, alias: &str, from: &str, type_only: bool) {
        self.namespaces
            .entry(alias.to_string())
            .and_modify(|(_, existing)| *existing &= type_only)
            .or_insert_with(|| (from.to_string(), type_only));
    }

    /// Record `import { name } from 'from'`.
    pub fn use_named(&mut self, from: &str, name: &str, type_only: bool) {
        self.named
            .entry(from.to_string())
            .or_default()
            .entry(name.to_string())
            .and_modify(|existing| *existing &= type_only)
            .or_insert(type_only);
    }

    /// Record a module-local helper.
    pub fn use_helper(&mut self, helper: Helper) {
        self.helpers.insert(helper);
    }

    /// Whether `helper` was recorded.
    pub fn needs_helper(&self, helper: Helper) -> bool {
        self.helpers.contains(&helper)
    }

    /// Fold another set into this one.
    pub fn merge(&mut self, other: ImportSet) {
        for (alias, (from, type_only)) in other.namespaces {
            self.use_namespace(&alias, &from, type_only);
        }
        for (from, names) in other.named {
            for (name, type_only) in names {
                self.use_named(&from, &name, type_only);
            }
        }
        self.helpers.extend(other.helpers);
    }

    /// Render the import block: named imports first (package order), then
    /// namespace imports by alias.
    pub fn to_imports(&self) -> Vec<TsImport> {
        let mut imports = Vec::new();
        for (from, names) in &self.named {
            let type_only = names.values().all(|t| *t);
            let items = names
                .keys()
                .map(|name| ImportItem {
                    name: name.clone(),
                    alias: None,
                })
                .collect();
            imports.push(TsImport {
                clause: ImportClause::Named(items),
                from: from.clone(),
                type_only,
            });
        }
        for (alias, (from, type_only)) in &self.namespaces {
            imports.push(TsImport {
                clause: ImportClause::Namespace(alias.clone()),
                from: from.clone(),
                type_only: *type_only,
            });
        }
        imports
    }
}

impl FromIterator<ImportSet> for ImportSet {
    fn from_iter<I: IntoIterator<Item = ImportSet>>(iter: I) -> Self {
        let mut merged = ImportSet::new();
        for set in iter {
            merged.merge(set);
        }
        merged
    }
}
