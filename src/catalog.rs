use std::collections::HashMap;
use std::io;

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;

use crate::lookup::Code;
use crate::resolve::Resolution;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("'{continent}: {name}' is produced by both {first} and {second}")]
    Duplicate {
        continent: String,
        name: String,
        first: String,
        second: String,
    },
}

/// One downloadable country or region, as listed in the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: String,
    pub id_continent: String,
    pub continent: String,
    pub name: String,
    pub country_code: Code,
    pub osmscout: String,
    pub geocoder_nlp: String,
}

impl Entry {
    pub fn new(continent: &str, id: &str, resolution: Resolution) -> Self {
        Self {
            id: id.to_string(),
            id_continent: continent.to_string(),
            continent: resolution.continent,
            name: resolution.name,
            country_code: resolution.code,
            osmscout: format!("osmscout/{continent}/{id}"),
            geocoder_nlp: format!("geocoder-nlp/{continent}/{id}"),
        }
    }

    fn key(&self) -> (String, String) {
        (self.continent.clone(), self.name.clone())
    }

    fn path(&self) -> String {
        format!("{}/{}", self.id_continent, self.id)
    }
}

/// Entries keyed by their display names, which must be unique.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
    index: HashMap<(String, String), usize>,
}

impl Catalog {
    pub fn insert(&mut self, entry: Entry) -> Result<(), CatalogError> {
        let key = entry.key();
        if let Some(&i) = self.index.get(&key) {
            let (continent, name) = key;
            return Err(CatalogError::Duplicate {
                continent,
                name,
                first: self.entries[i].path(),
                second: entry.path(),
            });
        }

        self.index.insert(key, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries ordered by continent, then name.
    pub fn sorted(&self) -> Vec<&Entry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| (&a.continent, &a.name).cmp(&(&b.continent, &b.name)));
        sorted
    }

    /// Write the catalog as an indented JSON array with sorted keys.
    pub fn write(&self, mut out: impl io::Write) -> Result<()> {
        // Going through `Value` sorts object keys.
        let value = serde_json::to_value(self.sorted())?;
        serde_json::to_writer_pretty(&mut out, &value)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
