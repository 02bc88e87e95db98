use isocountry::CountryCode;
use thiserror::Error;

/// Country codes are two letters, or a handful of them joined by hyphens.
pub type Code = smartstring::alias::String;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no country named '{0}'")]
    UnknownName(String),
    #[error("no country with code '{0}'")]
    UnknownCode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub code: Code,
    pub name: String,
}

/// Name and code lookup of countries.
pub trait CountryLookup {
    fn by_name(&self, name: &str) -> Result<Country, LookupError>;
    fn by_code(&self, code: &str) -> Result<Country, LookupError>;
}

/// Lookup backed by the ISO 3166-1 table.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsoCountries;

impl IsoCountries {
    fn country(cc: &CountryCode) -> Country {
        Country {
            code: cc.alpha2().into(),
            name: cc.name().to_string(),
        }
    }
}

/// Lowercased name without a trailing qualifier, so that
/// "Bolivia (Plurinational State of)" and "Tanzania, United Republic of"
/// compare equal to "bolivia" and "tanzania".
fn short_name(name: &str) -> String {
    let end = name.find(['(', ',']).unwrap_or(name.len());
    name[..end].trim().to_lowercase()
}

impl CountryLookup for IsoCountries {
    fn by_name(&self, name: &str) -> Result<Country, LookupError> {
        let query = name.trim().to_lowercase();

        let exact = CountryCode::iter().find(|cc| {
            cc.alpha2().eq_ignore_ascii_case(&query)
                || cc.alpha3().eq_ignore_ascii_case(&query)
                || cc.name().to_lowercase() == query
        });
        if let Some(cc) = exact {
            return Ok(Self::country(cc));
        }

        // A short name shared by several countries ("korea") is no match.
        let mut short = CountryCode::iter().filter(|cc| short_name(cc.name()) == query);
        match (short.next(), short.next()) {
            (Some(cc), None) => Ok(Self::country(cc)),
            _ => Err(LookupError::UnknownName(name.to_string())),
        }
    }

    fn by_code(&self, code: &str) -> Result<Country, LookupError> {
        CountryCode::for_alpha2_caseless(code)
            .map(|cc| Self::country(&cc))
            .map_err(|_| LookupError::UnknownCode(code.to_string()))
    }
}
