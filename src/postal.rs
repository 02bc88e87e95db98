//! The country/language inventory of the address parser training data.
//!
//! The inventory file has one line per country, `<country>: <lang> <lang> `,
//! and is read back by `prepare` to flag extracts without training data.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::util::{self, ParseError};

/// Languages seen per country code.
pub type Inventory = BTreeMap<String, BTreeSet<String>>;

/// Lowercase country codes listed in an inventory file.
pub fn read_countries(path: &Path, reader: impl BufRead) -> Result<BTreeSet<String>> {
    let mut countries = BTreeSet::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (code, _) = line.split_once(':').ok_or_else(|| {
            ParseError::new(path, i + 1, "expected 'country: languages'", &line)
        })?;
        countries.insert(code.trim().to_lowercase());
    }

    Ok(countries)
}

pub fn load_countries(path: &Path) -> Result<BTreeSet<String>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_countries(path, BufReader::new(f))
}

/// Add the (language, country) pairs of one training data file.
pub fn add_languages(inventory: &mut Inventory, path: &Path, reader: impl BufRead) -> Result<()> {
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let (language, country) = util::two_fields(&line).ok_or_else(|| {
            ParseError::new(path, i + 1, "expected language and country", &line)
        })?;
        inventory
            .entry(country.to_string())
            .or_default()
            .insert(language.to_string());
    }
    Ok(())
}

/// Inventory of every `*.tsv` file in `dir`.
pub fn collect_languages(dir: &Path) -> Result<Inventory> {
    let mut inventory = Inventory::new();

    for path in util::tsv_files(dir)? {
        info!("Analyzing {}", path.display());
        let f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        add_languages(&mut inventory, &path, BufReader::new(f))?;
    }

    Ok(inventory)
}

pub fn write_countries(inventory: &Inventory, out: impl io::Write) -> Result<()> {
    let mut out = BufWriter::new(out);

    for (country, languages) in inventory {
        write!(out, "{country}: ")?;
        for language in languages {
            write!(out, "{language} ")?;
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

/// Build the inventory of `dir`, print it and save it to `output`.
pub fn country_list(dir: &Path, output: &Path) -> Result<()> {
    let inventory = collect_languages(dir)?;

    write_countries(&inventory, io::stdout().lock())?;

    let f = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    write_countries(&inventory, f)?;
    info!(
        "{} countries written to {}",
        inventory.len(),
        output.display()
    );

    Ok(())
}
