use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::util::{self, ParseError};

/// Lines buffered per country before they are appended to its file.
pub const FLUSH_THRESHOLD: usize = 1000;

/// Directory receiving the per-country files of `path`.
pub fn split_dir(path: &Path) -> PathBuf {
    let mut dir = path.as_os_str().to_owned();
    dir.push("-split");
    PathBuf::from(dir)
}

fn split_file(path: &Path, country: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_owned();
    name.push("-");
    name.push(country);
    split_dir(path).join(name)
}

/// Splits one training data file by country. Lines are kept as raw bytes,
/// terminator included, so the split files add up to the input exactly.
struct Splitter<'a> {
    path: &'a Path,
    buckets: BTreeMap<String, Vec<Vec<u8>>>,
}

impl<'a> Splitter<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            buckets: BTreeMap::new(),
        }
    }

    fn push(&mut self, country: &str, line: Vec<u8>) -> Result<()> {
        let bucket = self.buckets.entry(country.to_string()).or_default();
        bucket.push(line);
        if bucket.len() > FLUSH_THRESHOLD {
            let lines = std::mem::take(bucket);
            self.append(country, &lines)?;
        }
        Ok(())
    }

    fn append(&self, country: &str, lines: &[Vec<u8>]) -> Result<()> {
        let target = split_file(self.path, country);
        debug!("appending {} lines to {}", lines.len(), target.display());

        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&target)
            .with_context(|| format!("opening {}", target.display()))?;
        let mut out = BufWriter::new(f);
        for line in lines {
            out.write_all(line)?;
        }
        out.flush()?;
        Ok(())
    }

    fn finish(mut self) -> Result<usize> {
        let buckets = std::mem::take(&mut self.buckets);
        for (country, lines) in &buckets {
            self.append(country, lines)?;
        }
        Ok(buckets.len())
    }
}

/// Split `path` into `<path>-split/<name>-<country>`, replacing any earlier
/// split. Returns the number of countries.
pub fn split_file_by_country(path: &Path) -> Result<usize> {
    let dir = split_dir(path);
    if dir.exists() {
        fs::remove_dir_all(&dir).with_context(|| format!("removing {}", dir.display()))?;
    }
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    info!("Directory containing split files: {}", dir.display());

    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(f);
    let mut splitter = Splitter::new(path);

    for number in 1.. {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        // Only the leading fields need to be text.
        let text = String::from_utf8_lossy(&line);
        let (_, country) = util::two_fields(&text).ok_or_else(|| {
            ParseError::new(path, number, "expected language and country", text.trim_end())
        })?;
        let country = country.to_string();
        splitter.push(&country, line)?;
    }

    splitter.finish()
}

/// Split every `*.tsv` file in `dir`.
pub fn split_addresses(dir: &Path) -> Result<()> {
    for path in util::tsv_files(dir)? {
        info!("Splitting {}", path.display());
        let countries = split_file_by_country(&path)?;
        info!("{} split into {countries} countries", path.display());
    }
    Ok(())
}
