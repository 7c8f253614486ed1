pub mod capture;
pub mod poc;
