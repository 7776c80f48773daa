#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod form;
pub mod model;
pub mod service;
pub mod storage;
pub mod telemetry;
pub mod tui;
