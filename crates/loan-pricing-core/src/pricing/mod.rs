pub mod quote;
pub mod rate;
