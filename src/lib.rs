//! Lead Intake API Library
//!
//! Accepts marketing lead form submissions, stores them through the Supabase
//! REST interface and notifies sales by email (Resend or SendGrid).
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `email`: Email provider trait and implementations.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `intake`: Validate → persist → notify pipeline.
//! - `models`: Lead payloads, rows and responses.
//! - `startup`: State wiring and router construction.
//! - `store`: Lead store trait and Supabase client.
//! - `templates`: Notification subjects and HTML bodies.
//! - `validation`: Required-field checks and normalization.

pub mod config;
pub mod email;
pub mod errors;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod startup;
pub mod store;
pub mod templates;
pub mod validation;
