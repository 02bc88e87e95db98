use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::lookup::Code;

/// A continent (or country, for subdivided extracts) and the extracts
/// published under it, in the order they are emitted.
#[derive(Debug, Clone, Copy)]
pub struct Continent {
    pub id: &'static str,
    pub countries: &'static [&'static str],
}

const DOWNLOAD_MIRROR: &str = "http://download.geofabrik.de";

/// Continents whose extracts all belong to one country.
const CONTINENT_CODES: &[(&str, &str)] = &[("north-america/us", "US")];

/// Extracts the name lookup gets wrong or cannot find, and aggregates of
/// several countries.
const CODES: &[(&str, &str)] = &[
    ("azores", "PT"),
    ("bolivia", "BO"),
    ("bosnia-herzegovina", "BA"),
    ("canary-islands", "ES"),
    ("cape-verde", "CV"),
    ("central-african-republic", "CF"),
    ("comores", "KM"),
    ("congo-brazzaville", "CG"),
    ("congo-democratic-republic", "CD"),
    ("czech-republic", "CZ"),
    ("faroe-islands", "FO"),
    ("gcc-states", "BH-KW-OM-QA-SA-AE"),
    ("great-britain", "GB"),
    ("guinea-bissau", "GW"),
    ("haiti-and-domrep", "HT-DO"),
    ("iran", "IR"),
    ("ireland-and-northern-ireland", "GB-IE"),
    ("isle-of-man", "IM"),
    ("israel-and-palestine", "IL-PS"),
    ("ivory-coast", "CI"),
    ("libya", "LY"),
    ("macedonia", "MK"),
    ("malaysia-singapore-brunei", "MY-SG-BN"),
    ("moldova", "MD"),
    ("netherlands", "NL"),
    ("new-caledonia", "NC"),
    ("north-korea", "KP"),
    ("philippines", "PH"),
    ("russia", "RU"),
    ("saint-helena-ascension-and-tristan-da-cunha", "SH"),
    ("sao-tome-and-principe", "ST"),
    ("senegal-and-gambia", "SN-GM"),
    ("south-korea", "KR"),
    ("south-sudan", "SS"),
    ("swaziland", "SZ"),
    ("syria", "SY"),
    ("taiwan", "TW"),
    ("tanzania", "TZ"),
    ("turkey", "TR"),
    ("vietnam", "VN"),
];

/// Extracts covering a part of a country, matched by name.
const SUB_REGIONS: &[(&str, &str)] = &[("^us-", "US")];

const PRETTY_NAMES: &[(&str, &str)] = &[
    ("gcc-states", "GCC States"),
    ("haiti-and-domrep", "Haiti and Dominican Republic"),
    ("ireland-and-northern-ireland", "Ireland and Northern Ireland"),
    ("israel-and-palestine", "Israel and Palestine"),
    ("malaysia-singapore-brunei", "Malaysia, Singapore, and Brunei"),
    ("senegal-and-gambia", "Senegal and Gambia"),
];

const PRETTY_CONTINENTS: &[(&str, &str)] = &[
    ("australia-oceania", "Australia and Oceania"),
    ("north-america/us", "North America/US"),
];

/// Names derived only by capitalizing the identifier. Listing a continent
/// applies to every extract under it.
const CAPITALIZE: &[&str] = &["azores", "canary-islands", "north-america/us"];

const SPECIAL_URLS: &[(&str, &str)] = &[(
    "russia",
    "http://download.geofabrik.de/russia-latest.osm.pbf",
)];

pub const WORLD: &[Continent] = &[
    Continent {
        id: "europe",
        countries: &[
            "albania",
            "andorra",
            "austria",
            "azores",
            "belarus",
            "belgium",
            "bosnia-herzegovina",
            "bulgaria",
            "croatia",
            "cyprus",
            "czech-republic",
            "denmark",
            "estonia",
            "faroe-islands",
            "finland",
            "france",
            "georgia",
            "germany",
            "great-britain",
            "greece",
            "hungary",
            "iceland",
            "ireland-and-northern-ireland",
            "isle-of-man",
            "italy",
            // kosovo: no address data
            "latvia",
            "liechtenstein",
            "lithuania",
            "luxembourg",
            "macedonia",
            "malta",
            "moldova",
            "monaco",
            "montenegro",
            "netherlands",
            "norway",
            "poland",
            "portugal",
            "romania",
            "russia",
            "serbia",
            "slovakia",
            "slovenia",
            "spain",
            "sweden",
            "switzerland",
            "turkey",
            "ukraine",
        ],
    },
    Continent {
        id: "africa",
        countries: &[
            "algeria",
            "angola",
            "benin",
            "botswana",
            "burkina-faso",
            "cameroon",
            "canary-islands",
            "cape-verde",
            "central-african-republic",
            "chad",
            "comores",
            "congo-brazzaville",
            "congo-democratic-republic",
            "djibouti",
            "egypt",
            "equatorial-guinea",
            "eritrea",
            "ethiopia",
            "gabon",
            "ghana",
            "guinea",
            "guinea-bissau",
            "ivory-coast",
            "kenya",
            "lesotho",
            "liberia",
            "libya",
            "madagascar",
            "malawi",
            "mali",
            "mauritania",
            "mauritius",
            "morocco",
            "mozambique",
            "namibia",
            "niger",
            "nigeria",
            "rwanda",
            "saint-helena-ascension-and-tristan-da-cunha",
            "sao-tome-and-principe",
            "senegal-and-gambia",
            "seychelles",
            "sierra-leone",
            "somalia",
            "south-africa",
            "south-sudan",
            "sudan",
            "swaziland",
            "tanzania",
            "togo",
            "tunisia",
            "uganda",
            "zambia",
            "zimbabwe",
        ],
    },
    Continent {
        id: "asia",
        countries: &[
            "afghanistan",
            "azerbaijan",
            "bangladesh",
            "cambodia",
            "gcc-states",
            "china",
            "india",
            "indonesia",
            "japan",
            "iran",
            "iraq",
            "israel-and-palestine",
            "jordan",
            "kazakhstan",
            "kyrgyzstan",
            "lebanon",
            "malaysia-singapore-brunei",
            "maldives",
            "mongolia",
            "nepal",
            "north-korea",
            "pakistan",
            "philippines",
            "south-korea",
            "sri-lanka",
            "syria",
            "taiwan",
            "tajikistan",
            "thailand",
            "turkmenistan",
            "uzbekistan",
            "vietnam",
            "yemen",
        ],
    },
    Continent {
        id: "australia-oceania",
        countries: &["australia", "fiji", "new-caledonia", "new-zealand"],
    },
    Continent {
        id: "central-america",
        countries: &["belize", "cuba", "guatemala", "haiti-and-domrep", "nicaragua"],
    },
    Continent {
        id: "north-america",
        countries: &["canada", "greenland", "mexico"],
    },
    Continent {
        id: "north-america/us",
        countries: &[
            "alaska",
            "alabama",
            "arizona",
            "arkansas",
            "california",
            "colorado",
            "connecticut",
            "delaware",
            "district-of-columbia",
            "florida",
            "georgia",
            "hawaii",
            "idaho",
            "illinois",
            "indiana",
            "iowa",
            "kansas",
            "kentucky",
            "louisiana",
            "maine",
            "maryland",
            "massachusetts",
            "michigan",
            "minnesota",
            "mississippi",
            "missouri",
            "montana",
            "nebraska",
            "nevada",
            "new-hampshire",
            "new-jersey",
            "new-mexico",
            "new-york",
            "north-carolina",
            "north-dakota",
            "ohio",
            "oklahoma",
            "oregon",
            "pennsylvania",
            "rhode-island",
            "south-carolina",
            "south-dakota",
            "tennessee",
            "texas",
            "utah",
            "vermont",
            "virginia",
            "washington",
            "west-virginia",
            "wisconsin",
            "wyoming",
            "us-midwest",
            "us-northeast",
            "us-pacific",
            "us-south",
            "us-west",
        ],
    },
    Continent {
        id: "south-america",
        countries: &[
            "argentina",
            "bolivia",
            "brazil",
            "chile",
            "colombia",
            "ecuador",
            "paraguay",
            "peru",
            "suriname",
            "uruguay",
        ],
    },
];

/// Hand-maintained corrections applied on top of the country lookup.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub continent_codes: HashMap<String, Code>,
    pub codes: HashMap<String, Code>,
    pub sub_regions: Vec<(Regex, Code)>,
    pub pretty_names: HashMap<String, String>,
    pub pretty_continents: HashMap<String, String>,
    pub capitalize: HashSet<String>,
    pub urls: HashMap<String, String>,
}

fn to_map<V: From<&'static str>>(table: &[(&'static str, &'static str)]) -> HashMap<String, V> {
    table
        .iter()
        .map(|(k, v)| (k.to_string(), V::from(*v)))
        .collect()
}

impl Overrides {
    /// The tables compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            continent_codes: to_map(CONTINENT_CODES),
            codes: to_map(CODES),
            sub_regions: SUB_REGIONS
                .iter()
                .map(|(pattern, code)| {
                    let re = Regex::new(pattern).expect("sub-region pattern must be valid");
                    (re, Code::from(*code))
                })
                .collect(),
            pretty_names: to_map(PRETTY_NAMES),
            pretty_continents: to_map(PRETTY_CONTINENTS),
            capitalize: CAPITALIZE.iter().map(|s| s.to_string()).collect(),
            urls: to_map(SPECIAL_URLS),
        }
    }

    /// Code of the first sub-region pattern matching `id`.
    pub fn sub_region(&self, id: &str) -> Option<&Code> {
        self.sub_regions
            .iter()
            .find(|(re, _)| re.is_match(id))
            .map(|(_, code)| code)
    }

    pub fn download_url(&self, continent: &str, id: &str) -> String {
        self.urls
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("{DOWNLOAD_MIRROR}/{continent}/{id}-latest.osm.pbf"))
    }
}
