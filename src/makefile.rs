use std::io::{self, BufWriter, Write};

use anyhow::Result;
use itertools::Itertools;

use crate::lookup::Code;

/// Make variables at the top of the generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub builder: String,
    pub world_dir: String,
    pub downloads_dir: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            builder: "./build.sh".into(),
            world_dir: "world".into(),
            downloads_dir: "downloads".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryTarget {
    pub continent: String,
    pub id: String,
    pub code: Code,
    pub url: String,
}

impl CountryTarget {
    /// File name of the downloaded extract, flat under the downloads directory.
    pub fn pbf_name(&self) -> String {
        format!("{}-{}.pbf", self.continent.replace('/', "-"), self.id)
    }

    pub fn download(&self) -> String {
        format!("$(DOWNLOADS_DIR)/{}", self.pbf_name())
    }

    pub fn output(&self) -> String {
        format!("$(WORLD_DIR)/{}/{}.sqlite.bz2", self.continent, self.id)
    }
}

fn marker(continent: &str) -> String {
    format!("$(WORLD_DIR)/{continent}/.directory")
}

/// Targets downloading and importing every country, driven by `make`.
#[derive(Debug, Clone, Default)]
pub struct BuildFile {
    layout: Layout,
    continents: Vec<String>,
    countries: Vec<CountryTarget>,
}

impl BuildFile {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn add_continent(&mut self, continent: &str) {
        self.continents.push(continent.to_string());
    }

    pub fn add_country(&mut self, target: CountryTarget) {
        self.countries.push(target);
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn countries(&self) -> &[CountryTarget] {
        &self.countries
    }

    pub fn write(&self, out: impl io::Write) -> Result<()> {
        let mut out = BufWriter::new(out);
        let Layout {
            builder,
            world_dir,
            downloads_dir,
        } = &self.layout;

        writeln!(out, "# This Makefile is generated by geoprep\n")?;
        writeln!(out, "BUILDER={builder}")?;
        writeln!(out, "WORLD_DIR={world_dir}")?;
        writeln!(out, "DOWNLOADS_DIR={downloads_dir}")?;
        writeln!(out)?;
        writeln!(out, ".PHONY: all download\n")?;
        writeln!(
            out,
            "all: $(DOWNLOADS_DIR)/.directory $(WORLD_DIR)/all_countries_done\n\techo All Done\n"
        )?;
        writeln!(
            out,
            "$(DOWNLOADS_DIR)/.directory:\n\tmkdir -p $(DOWNLOADS_DIR)\n\ttouch $(DOWNLOADS_DIR)/.directory\n"
        )?;

        for continent in &self.continents {
            writeln!(
                out,
                "{}:\n\tmkdir -p $(WORLD_DIR)/{continent}\n\ttouch {}\n",
                marker(continent),
                marker(continent)
            )?;
        }

        for country in &self.countries {
            let download = country.download();
            writeln!(
                out,
                "{}: {} {download}\n\t$(BUILDER) {download} $(WORLD_DIR) {} {} {}\n",
                country.output(),
                marker(&country.continent),
                country.continent,
                country.id,
                country.code
            )?;
            writeln!(
                out,
                "{download}: $(DOWNLOADS_DIR)/.directory\n\twget {} -O{download} || (rm -f {download} && exit 1)\n\ttouch {download}\n",
                country.url
            )?;
        }

        writeln!(
            out,
            "$(WORLD_DIR)/all_countries_done: {}\n\techo > $(WORLD_DIR)/all_countries_done\n",
            self.countries.iter().map(CountryTarget::output).join(" ")
        )?;
        writeln!(
            out,
            "download: {}",
            self.countries.iter().map(CountryTarget::download).join(" ")
        )?;

        out.flush()?;
        Ok(())
    }
}
