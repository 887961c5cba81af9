use std::env;
use std::fs;
use std::path::Path;

// Tiny fallback dataset so the app still builds when the fixtures have
// not been generated yet (run `cgd-cli generate` to produce real ones).
const FALLBACK_COUNTRIES: &str = "\
ISO_CODE,NAME,CONTINENT,POPULATION
USA,United States,North America,331000000
GBR,United Kingdom,Europe,67000000
DEU,Germany,Europe,83000000
";

const FALLBACK_OBSERVATIONS: &str = "\
USA,20210101,150000,2500,20000000,350000,120000,22000,5000000,500000
USA,20210102,145000,2400,20145000,352400,119000,21800,5600000,560000
GBR,20210101,50000,900,2600000,75000,30000,3500,1200000,120000
GBR,20210102,48000,850,2648000,75850,29500,3400,1350000,135000
DEU,20210101,25000,700,1760000,33000,20000,5000,900000,90000
DEU,20210102,22000,650,1782000,33650,19500,4900,1000000,100000
";

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();

    let countries_src = Path::new("../fixtures/countries.csv");
    if countries_src.exists() {
        fs::copy(countries_src, Path::new(&out_dir).join("countries.csv")).unwrap();
    } else {
        fs::write(Path::new(&out_dir).join("countries.csv"), FALLBACK_COUNTRIES).unwrap();
    }

    let obs_src = Path::new("../fixtures/observations.csv");
    if obs_src.exists() {
        fs::copy(obs_src, Path::new(&out_dir).join("observations.csv")).unwrap();
    } else {
        fs::write(Path::new(&out_dir).join("observations.csv"), FALLBACK_OBSERVATIONS).unwrap();
    }

    println!("cargo:rerun-if-changed=../fixtures/countries.csv");
    println!("cargo:rerun-if-changed=../fixtures/observations.csv");
}
