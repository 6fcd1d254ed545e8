//! Billbook HTTP API Service.
//!
//! This crate provides the HTTP API for the billbook invoicing backend,
//! including:
//!
//! - Customer and catalog item management (soft-delete CRUD)
//! - Invoice creation with financial-year-scoped sequential numbering
//! - Invoice PDF rendering
//! - Dashboard aggregation
//! - The UI login PIN check
//!
//! # Invoice numbering
//!
//! `GET /api/v1/invoices/preview-invoice-number` is a plain read and may be
//! called any number of times; the previewed number is advisory and is only
//! claimed when `POST /api/v1/invoices` commits the counter advance and the
//! invoice document in a single store transaction.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for routing consistency

pub mod config;
pub mod error;
pub mod handlers;
pub mod pdf;
pub mod routes;
pub mod state;

pub use config::{CompanyProfile, ServiceConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
