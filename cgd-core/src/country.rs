use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Metadata for a single country.
///
/// Parsed from the headered countries CSV:
/// `ISO_CODE,NAME,CONTINENT,POPULATION`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub iso_code: String,
    pub name: String,
    pub continent: String,
    pub population: u64,
}

impl Country {
    /// Parse a headered countries CSV into a vector of countries.
    ///
    /// Rows with a missing ISO code or unparseable population are skipped.
    pub fn parse_csv(csv_data: &str) -> anyhow::Result<Vec<Country>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut countries = Vec::new();
        let mut skipped = 0u32;
        for result in rdr.records() {
            let r = result?;
            let iso_code = r.get(0).unwrap_or("").trim();
            let name = r.get(1).unwrap_or("").trim();
            let continent = r.get(2).unwrap_or("").trim();
            let population: Option<u64> = r.get(3).and_then(|s| s.trim().parse().ok());

            match (iso_code.is_empty(), population) {
                (false, Some(population)) => countries.push(Country {
                    iso_code: iso_code.to_string(),
                    name: name.to_string(),
                    continent: continent.to_string(),
                    population,
                }),
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("country parse: skipped {} malformed rows", skipped);
        }
        Ok(countries)
    }

    /// Serialize countries back to the headered CSV format.
    pub fn to_csv(countries: &[Country]) -> String {
        let mut out = String::from("ISO_CODE,NAME,CONTINENT,POPULATION\n");
        for c in countries {
            out.push_str(&format!(
                "{},{},{},{}\n",
                c.iso_code, c.name, c.continent, c.population
            ));
        }
        out
    }

    /// The built-in demo country set used by the synthetic generator.
    ///
    /// Populations are rounded recent estimates; they only need to be
    /// plausible for per-capita scaling.
    pub fn demo_set() -> Vec<Country> {
        const DEMO: &[(&str, &str, &str, u64)] = &[
            ("USA", "United States", "North America", 331_000_000),
            ("GBR", "United Kingdom", "Europe", 67_000_000),
            ("DEU", "Germany", "Europe", 83_000_000),
            ("FRA", "France", "Europe", 68_000_000),
            ("ITA", "Italy", "Europe", 59_000_000),
            ("ESP", "Spain", "Europe", 47_000_000),
            ("IND", "India", "Asia", 1_400_000_000),
            ("BRA", "Brazil", "South America", 214_000_000),
            ("JPN", "Japan", "Asia", 125_000_000),
            ("KOR", "South Korea", "Asia", 51_000_000),
            ("AUS", "Australia", "Oceania", 26_000_000),
            ("CAN", "Canada", "North America", 38_000_000),
            ("NLD", "Netherlands", "Europe", 17_500_000),
            ("SWE", "Sweden", "Europe", 10_400_000),
            ("KEN", "Kenya", "Africa", 53_000_000),
            ("ZAF", "South Africa", "Africa", 60_000_000),
            ("NGA", "Nigeria", "Africa", 213_000_000),
            ("EGY", "Egypt", "Africa", 104_000_000),
            ("MEX", "Mexico", "North America", 126_000_000),
            ("ARG", "Argentina", "South America", 45_000_000),
        ];
        DEMO.iter()
            .map(|(iso, name, continent, population)| Country {
                iso_code: iso.to_string(),
                name: name.to_string(),
                continent: continent.to_string(),
                population: *population,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Country;

    #[test]
    fn parse_countries_csv() {
        let csv = "\
ISO_CODE,NAME,CONTINENT,POPULATION
USA,United States,North America,331000000
KEN,Kenya,Africa,53000000
";
        let countries = Country::parse_csv(csv).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].iso_code, "USA");
        assert_eq!(countries[1].population, 53_000_000);
    }

    #[test]
    fn parse_skips_malformed_rows() {
        let csv = "\
ISO_CODE,NAME,CONTINENT,POPULATION
USA,United States,North America,331000000
,Nowhere,Nowhere,1000
FRA,France,Europe,not_a_number
";
        let countries = Country::parse_csv(csv).unwrap();
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].iso_code, "USA");
    }

    #[test]
    fn csv_round_trip() {
        let demo = Country::demo_set();
        let csv = Country::to_csv(&demo);
        let parsed = Country::parse_csv(&csv).unwrap();
        assert_eq!(parsed, demo);
    }

    #[test]
    fn demo_set_has_twenty_countries() {
        let demo = Country::demo_set();
        assert_eq!(demo.len(), 20);
        assert!(demo.iter().all(|c| c.population > 0));
        assert!(demo.iter().all(|c| c.iso_code.len() == 3));
    }
}
