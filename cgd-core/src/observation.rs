use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap};

/// Compact date format used in observation CSV files: "YYYYMMDD".
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Display date format used at the UI/D3 boundary: "YYYY-MM-DD".
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Expected number of columns in an observation CSV row.
pub const CSV_ROW_LENGTH: usize = 10;

/// A single per-(country, date) observation row.
///
/// Hospitalization and vaccination fields are `None` where the upstream
/// data has no value (e.g. before hospital reporting or the vaccine
/// rollout began).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CovidObservation {
    pub iso_code: String,
    pub date: NaiveDate,
    pub new_cases: u32,
    pub new_deaths: u32,
    pub total_cases: u64,
    pub total_deaths: u64,
    pub hosp_patients: Option<u32>,
    pub icu_patients: Option<u32>,
    pub total_vaccinations: Option<u64>,
    pub people_fully_vaccinated: Option<u64>,
}

impl CovidObservation {
    /// Parse a headerless observation CSV body into observations.
    ///
    /// Row format:
    /// `iso_code,date(YYYYMMDD),new_cases,new_deaths,total_cases,total_deaths,hosp,icu,total_vacc,fully_vacc`
    ///
    /// Malformed rows are skipped; the skip count is logged.
    pub fn parse_csv(csv_data: &str) -> Vec<CovidObservation> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut observations = Vec::new();
        let mut skipped = 0u32;
        for record in rdr.records().flatten() {
            match CovidObservation::try_from(record) {
                Ok(obs) => observations.push(obs),
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("observation parse: skipped {} malformed rows", skipped);
        }
        observations
    }

    /// Group observations by ISO country code.
    pub fn by_country(
        observations: Vec<CovidObservation>,
    ) -> HashMap<String, Vec<CovidObservation>> {
        let mut result: HashMap<String, Vec<CovidObservation>> = HashMap::new();
        for obs in observations {
            result.entry(obs.iso_code.clone()).or_default().push(obs);
        }
        result
    }

    /// Serialize as a CSV record in the headerless observation format.
    pub fn csv_record(&self) -> Vec<String> {
        let opt = |v: Option<u64>| v.map(|x| x.to_string()).unwrap_or_default();
        vec![
            self.iso_code.clone(),
            self.date.format(DATE_FORMAT).to_string(),
            self.new_cases.to_string(),
            self.new_deaths.to_string(),
            self.total_cases.to_string(),
            self.total_deaths.to_string(),
            opt(self.hosp_patients.map(u64::from)),
            opt(self.icu_patients.map(u64::from)),
            opt(self.total_vaccinations),
            opt(self.people_fully_vaccinated),
        ]
    }
}

impl TryFrom<StringRecord> for CovidObservation {
    type Error = ();

    fn try_from(value: StringRecord) -> Result<Self, Self::Error> {
        if value.len() != CSV_ROW_LENGTH {
            return Err(());
        }
        let iso_code = value.get(0).ok_or(())?.trim();
        if iso_code.is_empty() {
            return Err(());
        }
        let date = NaiveDate::parse_from_str(value.get(1).ok_or(())?.trim(), DATE_FORMAT)
            .map_err(|_| ())?;

        let req_u32 = |i: usize| -> Result<u32, ()> {
            value.get(i).ok_or(())?.trim().parse().map_err(|_| ())
        };
        let req_u64 = |i: usize| -> Result<u64, ()> {
            value.get(i).ok_or(())?.trim().parse().map_err(|_| ())
        };
        let opt_u32 = |i: usize| -> Option<u32> { value.get(i).and_then(|s| s.trim().parse().ok()) };
        let opt_u64 = |i: usize| -> Option<u64> { value.get(i).and_then(|s| s.trim().parse().ok()) };

        Ok(CovidObservation {
            iso_code: iso_code.to_string(),
            date,
            new_cases: req_u32(2)?,
            new_deaths: req_u32(3)?,
            total_cases: req_u64(4)?,
            total_deaths: req_u64(5)?,
            hosp_patients: opt_u32(6),
            icu_patients: opt_u32(7),
            total_vaccinations: opt_u64(8),
            people_fully_vaccinated: opt_u64(9),
        })
    }
}

impl Ord for CovidObservation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.iso_code.cmp(&other.iso_code))
    }
}

impl Eq for CovidObservation {}

impl PartialEq for CovidObservation {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.iso_code == other.iso_code
    }
}

impl PartialOrd for CovidObservation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::CovidObservation;
    use chrono::NaiveDate;

    const STR_RESULT: &str = "\
USA,20210101,150000,2500,20000000,350000,120000,22000,5000000,500000
USA,20210102,145000,2400,20145000,352400,119000,21800,5600000,560000
KEN,20210101,500,10,100000,1700,,,,
";

    #[test]
    fn test_parse_csv() {
        let observations = CovidObservation::parse_csv(STR_RESULT);
        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0].iso_code, "USA");
        assert_eq!(observations[0].total_cases, 20_000_000);
        assert_eq!(observations[0].hosp_patients, Some(120_000));
    }

    #[test]
    fn test_optional_fields_empty() {
        let observations = CovidObservation::parse_csv(STR_RESULT);
        let ken = &observations[2];
        assert_eq!(ken.iso_code, "KEN");
        assert!(ken.hosp_patients.is_none());
        assert!(ken.total_vaccinations.is_none());
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let body = "\
USA,20210101,150000,2500,20000000,350000,120000,22000,5000000,500000
USA,not_a_date,1,1,1,1,,,,
,20210101,1,1,1,1,,,,
short,row
";
        let observations = CovidObservation::parse_csv(body);
        assert_eq!(observations.len(), 1);
    }

    #[test]
    fn test_ordering_by_date() {
        let mut observations = CovidObservation::parse_csv(STR_RESULT);
        observations.sort();
        assert_eq!(
            observations[0].date,
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
        // Same date sorts by iso_code
        assert_eq!(observations[0].iso_code, "KEN");
        assert_eq!(observations[2].date, NaiveDate::from_ymd_opt(2021, 1, 2).unwrap());
    }

    #[test]
    fn test_by_country_grouping() {
        let observations = CovidObservation::parse_csv(STR_RESULT);
        let grouped = CovidObservation::by_country(observations);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["USA"].len(), 2);
        assert_eq!(grouped["KEN"].len(), 1);
    }

    #[test]
    fn test_csv_record_round_trip() {
        let observations = CovidObservation::parse_csv(STR_RESULT);
        let line = observations[2].csv_record().join(",");
        let reparsed = CovidObservation::parse_csv(&line);
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0], observations[2]);
        assert!(reparsed[0].hosp_patients.is_none());
    }
}
