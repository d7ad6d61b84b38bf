//! Platform Crate - Security Infrastructure
//!
//! This crate provides the shared security layer of the dashboard API:
//! - Cryptographic utilities (SHA-256, HMAC, secure tokens)
//! - Password hashing (Argon2id, legacy SHA-256 verification)
//! - Input sanitization, URL (SSRF) and upload validation
//! - Cookie and CSRF helpers
//! - Rate limiting infrastructure and client identification
//! - Security audit events and environment configuration
//! - Security headers / CORS middleware

pub mod audit;
pub mod client;
pub mod config;
pub mod cookie;
pub mod crypto;
pub mod csrf;
pub mod headers;
pub mod password;
pub mod rate_limit;
pub mod sanitize;
pub mod upload;
pub mod url_guard;
