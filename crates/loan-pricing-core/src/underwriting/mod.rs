pub mod decision;
pub mod policy;
pub mod standard;
