pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod fetch;
pub mod figure;
pub mod interaction;
pub mod output;
pub mod parser;
pub mod records;
pub mod server;
pub mod views;
