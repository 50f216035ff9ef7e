//! HR management engine
//!
//! This crate provides leave management with holiday-aware day counting,
//! monthly payroll with loss of pay and provident fund, onboarding and
//! offboarding workflows, employee records and documents, and performance
//! reviews, served over an HTTP/JSON API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
