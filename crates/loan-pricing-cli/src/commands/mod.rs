pub mod analysis;
pub mod pricing;
pub mod underwriting;
