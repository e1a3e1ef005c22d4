pub mod config;
pub mod db;
pub mod demo;
pub mod logging;
pub mod models;
pub mod report;
