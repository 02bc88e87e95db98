use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::catalog::{Catalog, Entry};
use crate::lookup::{CountryLookup, IsoCountries};
use crate::makefile::{BuildFile, CountryTarget, Layout};
use crate::postal;
use crate::regions::{Continent, Overrides, WORLD};
use crate::resolve::{Resolution, Resolver};

pub struct Options {
    pub makefile: PathBuf,
    pub catalog: PathBuf,
    pub postal_countries: Option<PathBuf>,
    pub layout: Layout,
}

/// Whether address training data covers every country of a code.
fn postal_coverage(code: &str, postal: &BTreeSet<String>) -> &'static str {
    let parts: Vec<_> = code.split('-').map(str::to_lowercase).collect();
    let covered = parts.iter().filter(|c| postal.contains(*c)).count();
    match covered {
        0 => "no",
        n if n == parts.len() => "yes",
        _ => "partial",
    }
}

fn diagnostic(
    continent: &str,
    id: &str,
    resolution: &Resolution,
    postal: Option<&BTreeSet<String>>,
) -> String {
    let mut line = format!(
        "{continent} {} {} {}",
        resolution.code,
        id.replace('-', " "),
        resolution.name
    );
    if let Some(postal) = postal {
        line.push_str(" postal=");
        line.push_str(postal_coverage(&resolution.code, postal));
    }
    line
}

/// Resolve every extract of `world`, writing one diagnostic line per
/// extract to `log`.
pub fn generate<L: CountryLookup>(
    world: &[Continent],
    resolver: &Resolver<L>,
    layout: Layout,
    postal: Option<&BTreeSet<String>>,
    mut log: impl Write,
) -> Result<(BuildFile, Catalog)> {
    let mut build = BuildFile::new(layout);
    let mut catalog = Catalog::default();

    for continent in world {
        build.add_continent(continent.id);

        for &id in continent.countries {
            let resolution = resolver.resolve(continent.id, id)?;
            writeln!(log, "{}", diagnostic(continent.id, id, &resolution, postal))?;

            build.add_country(CountryTarget {
                continent: continent.id.to_string(),
                id: id.to_string(),
                code: resolution.code.clone(),
                url: resolver.overrides().download_url(continent.id, id),
            });
            catalog.insert(Entry::new(continent.id, id, resolution))?;
        }
    }

    Ok((build, catalog))
}

/// Generate the Makefile and catalog of the built-in world.
pub fn run(options: Options) -> Result<()> {
    let postal = match &options.postal_countries {
        Some(path) => {
            let countries = postal::load_countries(path)?;
            info!(
                "{} countries with address data in {}",
                countries.len(),
                path.display()
            );
            Some(countries)
        }
        None => {
            warn!("no postal country list given, skipping address data cross-check");
            None
        }
    };

    let overrides = Overrides::builtin();
    let resolver = Resolver::new(&overrides, &IsoCountries);
    let (build, catalog) = generate(
        WORLD,
        &resolver,
        options.layout,
        postal.as_ref(),
        io::stdout().lock(),
    )?;

    let f = File::create(&options.makefile)
        .with_context(|| format!("creating {}", options.makefile.display()))?;
    build.write(f)?;
    info!(
        "{} countries written to {}",
        build.countries().len(),
        options.makefile.display()
    );

    let f = File::create(&options.catalog)
        .with_context(|| format!("creating {}", options.catalog.display()))?;
    catalog.write(f)?;
    info!(
        "{} entries written to {}",
        catalog.len(),
        options.catalog.display()
    );

    println!(
        "\nExamine generated {} and run make using it. See {} and adjust the used executables first\n",
        options.makefile.display(),
        build.layout().builder
    );

    Ok(())
}
