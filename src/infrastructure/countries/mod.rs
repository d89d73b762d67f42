//! Country data provider infrastructure

pub mod client;
pub mod service;

pub use client::{CountriesClient, HttpCountriesClient};
pub use service::CountriesService;
