pub mod aggregate;
pub mod chart;
pub mod coerce;
pub mod config;
pub mod drilldown;
pub mod insights;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod spec;
pub mod suggest;
