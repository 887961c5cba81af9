use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The primary focus selected in the dashboard sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMode {
    Overview,
    CasesDeaths,
    Hospitalizations,
    Vaccinations,
    Correlation,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 5] = [
        AnalysisMode::Overview,
        AnalysisMode::CasesDeaths,
        AnalysisMode::Hospitalizations,
        AnalysisMode::Vaccinations,
        AnalysisMode::Correlation,
    ];

    /// Human-readable label for selector options.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::Overview => "Overview",
            AnalysisMode::CasesDeaths => "Cases & Deaths",
            AnalysisMode::Hospitalizations => "Hospitalizations",
            AnalysisMode::Vaccinations => "Vaccinations",
            AnalysisMode::Correlation => "Correlation",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisMode::Overview => "overview",
            AnalysisMode::CasesDeaths => "cases_deaths",
            AnalysisMode::Hospitalizations => "hospitalizations",
            AnalysisMode::Vaccinations => "vaccinations",
            AnalysisMode::Correlation => "correlation",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(AnalysisMode::Overview),
            "cases_deaths" => Ok(AnalysisMode::CasesDeaths),
            "hospitalizations" => Ok(AnalysisMode::Hospitalizations),
            "vaccinations" => Ok(AnalysisMode::Vaccinations),
            "correlation" => Ok(AnalysisMode::Correlation),
            other => Err(format!("unknown analysis mode: {}", other)),
        }
    }
}

/// A chartable observation column.
///
/// `column()` is the single source of column names used in SQL, which
/// keeps user-facing metric selection away from raw string interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    NewCases,
    NewDeaths,
    TotalCases,
    TotalDeaths,
    HospPatients,
    IcuPatients,
    TotalVaccinations,
    PeopleFullyVaccinated,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::NewCases,
        Metric::NewDeaths,
        Metric::TotalCases,
        Metric::TotalDeaths,
        Metric::HospPatients,
        Metric::IcuPatients,
        Metric::TotalVaccinations,
        Metric::PeopleFullyVaccinated,
    ];

    /// SQL column name in the observations table.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::NewCases => "new_cases",
            Metric::NewDeaths => "new_deaths",
            Metric::TotalCases => "total_cases",
            Metric::TotalDeaths => "total_deaths",
            Metric::HospPatients => "hosp_patients",
            Metric::IcuPatients => "icu_patients",
            Metric::TotalVaccinations => "total_vaccinations",
            Metric::PeopleFullyVaccinated => "people_fully_vaccinated",
        }
    }

    /// Human-readable label for chart titles and selector options.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::NewCases => "Daily New Cases",
            Metric::NewDeaths => "Daily New Deaths",
            Metric::TotalCases => "Total Cases",
            Metric::TotalDeaths => "Total Deaths",
            Metric::HospPatients => "Hospital Patients",
            Metric::IcuPatients => "ICU Patients",
            Metric::TotalVaccinations => "Total Vaccinations",
            Metric::PeopleFullyVaccinated => "People Fully Vaccinated",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.column() == s)
            .ok_or_else(|| format!("unknown metric: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisMode, Metric};
    use std::str::FromStr;

    #[test]
    fn analysis_mode_round_trip() {
        for mode in AnalysisMode::ALL {
            let parsed = AnalysisMode::from_str(&mode.to_string()).unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn analysis_mode_rejects_unknown() {
        assert!(AnalysisMode::from_str("cases").is_err());
    }

    #[test]
    fn metric_round_trip() {
        for metric in Metric::ALL {
            let parsed = Metric::from_str(metric.column()).unwrap();
            assert_eq!(parsed, metric);
        }
    }

    #[test]
    fn metric_columns_are_unique() {
        let mut columns: Vec<&str> = Metric::ALL.iter().map(|m| m.column()).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), Metric::ALL.len());
    }
}
