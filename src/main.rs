use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod catalog;
mod lookup;
mod makefile;
mod mapstyle;
mod postal;
mod prepare;
mod regions;
mod resolve;
mod split;
mod util;

#[derive(Parser)]
#[command(name = "geoprep")]
#[command(bin_name = "geoprep")]
#[command(about = "Data preparation for the geocoder import", long_about = None)]
struct Cli {
    /// More logging, repeat for even more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Makefile importing every country and the country catalog
    Prepare {
        #[arg(long, default_value = "Makefile")]
        makefile: PathBuf,

        #[arg(long, default_value = "countries.json")]
        catalog: PathBuf,

        /// Country/language list of the address parser training data
        #[arg(long)]
        postal_countries: Option<PathBuf>,

        /// Script importing one country
        #[arg(long, default_value = "./build.sh")]
        builder: String,

        #[arg(long, default_value = "world")]
        world_dir: String,

        #[arg(long, default_value = "downloads")]
        downloads_dir: String,
    },
    /// List the countries and languages covered by address training data
    CountryList {
        addrdata_dir: PathBuf,

        #[arg(short, long, default_value = "countries_languages.txt")]
        output: PathBuf,
    },
    /// Split address training data by country
    SplitAddresses { addrdata_dir: PathBuf },
    /// Generate map style types for the most used values of a tag
    Mapstyle {
        #[arg(long, default_value = "taginfo-db.db")]
        db: PathBuf,

        #[arg(long, default_value = "shop")]
        key: String,

        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).env().init()?;

    match cli.command {
        Commands::Prepare {
            makefile,
            catalog,
            postal_countries,
            builder,
            world_dir,
            downloads_dir,
        } => prepare::run(prepare::Options {
            makefile,
            catalog,
            postal_countries,
            layout: makefile::Layout {
                builder,
                world_dir,
                downloads_dir,
            },
        }),
        Commands::CountryList {
            addrdata_dir,
            output,
        } => postal::country_list(&addrdata_dir, &output),
        Commands::SplitAddresses { addrdata_dir } => split::split_addresses(&addrdata_dir),
        Commands::Mapstyle { db, key, limit } => mapstyle::mapstyle(&db, &key, limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn prepare_defaults() {
        let cli = Cli::parse_from(["geoprep", "prepare"]);
        let Commands::Prepare {
            makefile,
            catalog,
            postal_countries,
            builder,
            ..
        } = cli.command
        else {
            panic!("expected prepare");
        };
        assert_eq!(makefile, PathBuf::from("Makefile"));
        assert_eq!(catalog, PathBuf::from("countries.json"));
        assert_eq!(postal_countries, None);
        assert_eq!(builder, "./build.sh");
    }

    #[test]
    fn mapstyle_args() {
        let cli = Cli::parse_from(["geoprep", "-vv", "mapstyle", "--key", "amenity"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Mapstyle { key, limit: 50, .. } if key == "amenity"
        ));
    }
}
