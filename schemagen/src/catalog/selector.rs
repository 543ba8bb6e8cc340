//! Catalog lookup and reference-designator deduplication.
//!
//! A selector is constructed fresh for every generation run so the rename
//! counters start at 1 per run; the catalogs themselves are shared,
//! read-only state.

use std::collections::HashMap;

use crate::catalog::library::{Catalog, Template};
use crate::topology::family;

/// A template cloned for placement, carrying its per-category sequence
/// number.
#[derive(Debug, Clone)]
pub struct PartPick {
    pub template: Template,
    pub index: u32,
}

/// Looks up templates across the imported catalogs and assigns
/// deduplicated reference designators.
pub struct CatalogSelector<'a> {
    catalogs: &'a [Catalog],
    counters: HashMap<String, u32>,
}

impl<'a> CatalogSelector<'a> {
    pub fn new(catalogs: &'a [Catalog]) -> Self {
        Self {
            catalogs,
            counters: HashMap::new(),
        }
    }

    /// First template with this local name, in catalog import order.
    pub fn lookup(&self, name: &str) -> Option<&'a Template> {
        for catalog in self.catalogs {
            for template in &catalog.templates {
                if template.name == name {
                    return Some(template);
                }
            }
        }
        None
    }

    /// Canonical single-letter family code for a template name.
    pub fn classify(name: &str) -> &str {
        family::classify(name)
    }

    /// Clone a template and bind it to the next free index of its family:
    /// the index is appended to the reference-designator prefix (the first
    /// declared property) and kept on the clone as its sequence number.
    pub fn clone_with_identity(&mut self, template: &Template) -> PartPick {
        let code = family::classify(&template.name).to_string();
        let counter = self.counters.entry(code).or_insert(1);
        let index = *counter;
        *counter += 1;

        let mut clone = template.clone();
        if let Some(reference) = clone.properties.first_mut() {
            reference.value.push_str(&index.to_string());
        }
        PartPick {
            template: clone,
            index,
        }
    }

    /// Look up a template and, unless `rename` is false, assign it an
    /// identity. Returns `None` when no catalog carries the name.
    pub fn select(&mut self, name: &str, rename: bool) -> Option<PartPick> {
        let template = self.lookup(name)?;
        if rename {
            let template = template.clone();
            Some(self.clone_with_identity(&template))
        } else {
            Some(PartPick {
                template: template.clone(),
                index: 0,
            })
        }
    }
}
