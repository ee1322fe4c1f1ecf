use std::{collections::HashMap, path::Path};
use tracing::info;

use super::error::ConfigError;

const DEFAULT_DESCRIPTIONS: [(&str, &str); 15] = [
    ("E1", "Parkeerverbod"),
    ("E2", "Verbod stil te staan"),
    ("E3", "Verbod fietsen en bromfietsen te plaatsen"),
    ("E4", "Parkeergelegenheid"),
    ("E5", "Taxistandplaats"),
    ("E6", "Gehandicaptenparkeerplaats"),
    ("E6a", "Gehandicaptenparkeerplaats algemeen"),
    ("E6b", "Gehandicaptenparkeerplaats op kenteken"),
    (
        "E7",
        "Gelegenheid bestemd voor het onmiddellijk laden en lossen van goederen",
    ),
    (
        "E8",
        "Parkeergelegenheid alleen bestemd voor de voertuigcategorie of groep voertuigen die op het bord is aangegeven",
    ),
    ("E9", "Parkeergelegenheid alleen bestemd voor vergunninghouders"),
    (
        "E10",
        "Parkeerschijf-zone met verplicht gebruik van parkeerschijf, tevens parkeerverbod indien er langer wordt geparkeerd dan de parkeerduur die op het bord is aangegeven",
    ),
    (
        "E11",
        "Einde parkeerschijf-zone met verplicht gebruik van parkeerschijf",
    ),
    (
        "E12",
        "Parkeergelegenheid ten behoeve van overstappers op het openbaar vervoer",
    ),
    ("E13", "Parkeergelegenheid ten behoeve van carpoolers"),
];

/// Human readable descriptions of the Dutch "E" traffic signs (RVV 1990, annex 1) that
/// establish a parking restriction.
#[derive(Debug, Clone)]
pub struct SignTypes(HashMap<String, String>);

impl Default for SignTypes {
    fn default() -> Self {
        SignTypes(
            DEFAULT_DESCRIPTIONS
                .iter()
                .map(|(code, description)| (code.to_string(), description.to_string()))
                .collect(),
        )
    }
}

impl SignTypes {
    /// Loads the built-in descriptions and applies `sign_types.toml` from the config directory
    /// on top, if that file exists. The file is a flat table of `code = "description"`.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let mut sign_types = SignTypes::default();
        let path = config_path.join("sign_types.toml");
        if !path.exists() {
            return Ok(sign_types);
        }
        let file = fs_err::read_to_string(&path)?;
        let overrides: HashMap<String, String> = toml::from_str(&file)?;
        info!(
            "Applying {} sign type descriptions from {}",
            overrides.len(),
            path.display()
        );
        sign_types.0.extend(overrides);
        Ok(sign_types)
    }

    /// The description for a sign code, or "" when the code is unknown or absent.
    pub fn describe(&self, code: Option<&str>) -> &str {
        code.and_then(|code| self.0.get(code))
            .map(String::as_str)
            .unwrap_or("")
    }
}
