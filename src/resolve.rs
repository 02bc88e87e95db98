use log::debug;
use regex::Regex;
use thiserror::Error;

use crate::lookup::{Code, CountryLookup, LookupError};
use crate::regions::Overrides;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot resolve {continent}/{id}, add an override for it: {source}")]
    Unresolved {
        continent: String,
        id: String,
        source: LookupError,
    },
    #[error("{continent}/{id} resolved to malformed country code '{code}'")]
    MalformedCode {
        continent: String,
        id: String,
        code: Code,
    },
}

/// Country code and display names of one extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub code: Code,
    pub continent: String,
    pub name: String,
}

/// Capitalize each hyphen-separated word: "us-midwest" becomes "Us Midwest".
pub fn capitalize(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sources of the country code, in order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRule {
    ContinentOverride,
    IdentifierOverride,
    SubRegion,
    NameLookup,
}

impl CodeRule {
    pub const CHAIN: [CodeRule; 4] = [
        CodeRule::ContinentOverride,
        CodeRule::IdentifierOverride,
        CodeRule::SubRegion,
        CodeRule::NameLookup,
    ];
}

/// Sources of the display name, in order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    Lookup,
    Override,
    Capitalized,
    CodeLookup,
}

impl NameRule {
    pub const CHAIN: [NameRule; 4] = [
        NameRule::Lookup,
        NameRule::Override,
        NameRule::Capitalized,
        NameRule::CodeLookup,
    ];
}

/// A code, and the country name if a name lookup produced it.
struct CodeHit {
    code: Code,
    name: Option<String>,
}

pub struct Resolver<'a, L> {
    overrides: &'a Overrides,
    lookup: &'a L,
    code_format: Regex,
}

impl<'a, L: CountryLookup> Resolver<'a, L> {
    pub fn new(overrides: &'a Overrides, lookup: &'a L) -> Self {
        Self {
            overrides,
            lookup,
            code_format: Regex::new("^[A-Z]{2}(-[A-Z]{2})*$")
                .expect("code format must be valid"),
        }
    }

    pub fn overrides(&self) -> &Overrides {
        self.overrides
    }

    pub fn resolve(&self, continent: &str, id: &str) -> Result<Resolution, ResolveError> {
        let unresolved = |source| ResolveError::Unresolved {
            continent: continent.to_string(),
            id: id.to_string(),
            source,
        };

        let mut hit = None;
        for rule in CodeRule::CHAIN {
            if let Some(h) = self.code(rule, continent, id).map_err(unresolved)? {
                debug!("{continent}/{id}: code {} from {rule:?}", h.code);
                hit = Some(h);
                break;
            }
        }
        // NameLookup never declines.
        let CodeHit {
            code,
            name: looked_up,
        } = hit.ok_or_else(|| unresolved(LookupError::UnknownName(id.replace('-', " "))))?;

        if !self.code_format.is_match(&code) {
            return Err(ResolveError::MalformedCode {
                continent: continent.to_string(),
                id: id.to_string(),
                code,
            });
        }

        let mut name = None;
        for rule in NameRule::CHAIN {
            if let Some(n) = self
                .name(rule, continent, id, &code, &looked_up)
                .map_err(unresolved)?
            {
                debug!("{continent}/{id}: name '{n}' from {rule:?}");
                name = Some(n);
                break;
            }
        }
        let name = name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| unresolved(LookupError::UnknownCode(code.to_string())))?;

        Ok(Resolution {
            continent: self.continent_name(continent),
            code,
            name,
        })
    }

    pub fn continent_name(&self, continent: &str) -> String {
        self.overrides
            .pretty_continents
            .get(continent)
            .cloned()
            .unwrap_or_else(|| capitalize(continent))
    }

    fn code(
        &self,
        rule: CodeRule,
        continent: &str,
        id: &str,
    ) -> Result<Option<CodeHit>, LookupError> {
        let fixed = |code: Option<&Code>| {
            code.map(|code| CodeHit {
                code: code.clone(),
                name: None,
            })
        };

        Ok(match rule {
            CodeRule::ContinentOverride => fixed(self.overrides.continent_codes.get(continent)),
            CodeRule::IdentifierOverride => fixed(self.overrides.codes.get(id)),
            CodeRule::SubRegion => fixed(self.overrides.sub_region(id)),
            CodeRule::NameLookup => {
                let country = self.lookup.by_name(&id.replace('-', " "))?;
                Some(CodeHit {
                    code: country.code,
                    name: Some(country.name),
                })
            }
        })
    }

    fn name(
        &self,
        rule: NameRule,
        continent: &str,
        id: &str,
        code: &Code,
        looked_up: &Option<String>,
    ) -> Result<Option<String>, LookupError> {
        let overrides = self.overrides;

        Ok(match rule {
            NameRule::Lookup => looked_up.clone(),
            NameRule::Override => overrides.pretty_names.get(id).cloned(),
            NameRule::Capitalized => {
                let listed =
                    overrides.capitalize.contains(id) || overrides.capitalize.contains(continent);
                (listed || overrides.sub_region(id).is_some()).then(|| capitalize(id))
            }
            NameRule::CodeLookup => Some(self.lookup.by_code(code)?.name),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::lookup::Country;

    /// Lookup over a fixed table that records every query.
    #[derive(Default)]
    pub(crate) struct TableLookup {
        countries: Vec<(&'static str, &'static str)>,
        pub(crate) queries: RefCell<Vec<String>>,
    }

    impl TableLookup {
        pub(crate) fn new(countries: &[(&'static str, &'static str)]) -> Self {
            Self {
                countries: countries.to_vec(),
                ..Self::default()
            }
        }
    }

    impl CountryLookup for TableLookup {
        fn by_name(&self, name: &str) -> Result<Country, LookupError> {
            self.queries.borrow_mut().push(format!("name:{name}"));
            self.countries
                .iter()
                .find(|(_, n)| n.eq_ignore_ascii_case(name))
                .map(|(code, n)| Country {
                    code: (*code).into(),
                    name: n.to_string(),
                })
                .ok_or_else(|| LookupError::UnknownName(name.to_string()))
        }

        fn by_code(&self, code: &str) -> Result<Country, LookupError> {
            self.queries.borrow_mut().push(format!("code:{code}"));
            self.countries
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(c, n)| Country {
                    code: (*c).into(),
                    name: n.to_string(),
                })
                .ok_or_else(|| LookupError::UnknownCode(code.to_string()))
        }
    }

    fn lookup() -> TableLookup {
        TableLookup::new(&[
            ("FR", "France"),
            ("GB", "United Kingdom"),
            ("PT", "Portugal"),
            ("US", "United States"),
        ])
    }

    #[test]
    fn capitalize() {
        use super::capitalize;

        assert_eq!(capitalize("europe"), "Europe");
        assert_eq!(capitalize("us-midwest"), "Us Midwest");
        assert_eq!(capitalize("south-america"), "South America");
        assert_eq!(capitalize("NEW-york"), "New York");
        assert_eq!(capitalize("a--b"), "A  B");
    }

    #[test]
    fn name_lookup() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        let r = resolver.resolve("europe", "france").unwrap();
        assert_eq!(r.code, "FR");
        assert_eq!(r.continent, "Europe");
        assert_eq!(r.name, "France");
        assert_eq!(*lookup.queries.borrow(), vec!["name:france"]);
    }

    #[test]
    fn identifier_override_skips_name_lookup() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        let r = resolver.resolve("europe", "great-britain").unwrap();
        assert_eq!(r.code, "GB");
        assert_eq!(r.continent, "Europe");
        assert_eq!(r.name, "United Kingdom");
        assert_eq!(*lookup.queries.borrow(), vec!["code:GB"]);
    }

    #[test]
    fn every_code_override_is_returned_unmodified() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        for (id, code) in &overrides.codes {
            match resolver.resolve("somewhere", id) {
                Ok(r) => assert_eq!(&r.code, code),
                // Only the display name may fail with this small table.
                Err(ResolveError::Unresolved { source, .. }) => {
                    assert_eq!(source, LookupError::UnknownCode(code.to_string()))
                }
                Err(e) => panic!("{id}: {e}"),
            }
        }

        assert!(lookup.queries.borrow().iter().all(|q| q.starts_with("code:")));
    }

    #[test]
    fn sub_region() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        for continent in ["north-america/us", "north-america"] {
            let r = resolver.resolve(continent, "us-midwest").unwrap();
            assert_eq!(r.code, "US");
            assert_eq!(r.name, "Us Midwest");
        }
        assert!(lookup.queries.borrow().is_empty());
    }

    #[test]
    fn continent_override() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        let r = resolver.resolve("north-america/us", "new-york").unwrap();
        assert_eq!(r.code, "US");
        assert_eq!(r.continent, "North America/US");
        assert_eq!(r.name, "New York");
        assert!(lookup.queries.borrow().is_empty());
    }

    #[test]
    fn aggregate_region() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        let r = resolver.resolve("asia", "gcc-states").unwrap();
        assert_eq!(r.code, "BH-KW-OM-QA-SA-AE");
        assert_eq!(r.name, "GCC States");
        assert!(lookup.queries.borrow().is_empty());
    }

    #[test]
    fn capitalized_override() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        let r = resolver.resolve("europe", "azores").unwrap();
        assert_eq!(r.code, "PT");
        assert_eq!(r.name, "Azores");
    }

    #[test]
    fn unresolved() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        let err = resolver.resolve("europe", "atlantis").unwrap_err();
        assert!(matches!(
            &err,
            ResolveError::Unresolved { continent, id, source: LookupError::UnknownName(name) }
                if continent == "europe" && id == "atlantis" && name == "atlantis"
        ));
        assert!(err.to_string().contains("europe/atlantis"), "{err}");
    }

    #[test]
    fn unresolved_code_name() {
        let overrides = Overrides {
            codes: HashMap::from([("lost-island".to_string(), Code::from("XX"))]),
            ..Overrides::default()
        };
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        let err = resolver.resolve("europe", "lost-island").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Unresolved { source: LookupError::UnknownCode(_), .. }
        ));
    }

    #[test]
    fn malformed_code() {
        let overrides = Overrides {
            codes: HashMap::from([("brunei".to_string(), Code::from("bn"))]),
            ..Overrides::default()
        };
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        assert!(matches!(
            resolver.resolve("asia", "brunei"),
            Err(ResolveError::MalformedCode { code, .. }) if code == "bn"
        ));
    }

    #[test]
    fn continent_name() {
        let overrides = Overrides::builtin();
        let lookup = lookup();
        let resolver = Resolver::new(&overrides, &lookup);

        assert_eq!(resolver.continent_name("central-america"), "Central America");
        assert_eq!(
            resolver.continent_name("australia-oceania"),
            "Australia and Oceania"
        );
    }

    #[test]
    fn real_lookup() {
        let overrides = Overrides::builtin();
        let resolver = Resolver::new(&overrides, &crate::lookup::IsoCountries);

        let r = resolver.resolve("europe", "great-britain").unwrap();
        assert_eq!(r.code, "GB");
        assert_eq!(r.continent, "Europe");
        assert_ne!(r.name, "Great Britain");
        assert!(r.name.starts_with("United Kingdom"), "{r:?}");

        assert_eq!(resolver.resolve("europe", "france").unwrap().code, "FR");
    }
}
