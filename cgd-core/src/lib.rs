pub mod analysis;
pub mod country;
pub mod date_range;
pub mod observation;
pub mod sample;
