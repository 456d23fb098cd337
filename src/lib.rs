pub mod charts;
pub mod input;
pub mod series;
pub mod stats;
pub mod yahoo_finance;
