//! # Folio Architecture
//!
//! Folio is a **UI-agnostic document-vault library**. This is not a CLI
//! application that happens to have some library code—it's a library that
//! happens to have a CLI client.
//!
//! That distinction drives the architecture and should guide all development.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs + args.rs)                              │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (selector strings → resolved ids)      │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic                                      │
//! │  - Operates on Rust types, returns Rust types               │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait under a generic Vault               │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Versioning Core
//!
//! Every save of a document archives the prior content before overwriting
//! it, so the full history of a document stays inspectable and restorable.
//! The rules live in [`store::Vault`]; see that module for the write
//! sequencing that keeps the archive crash-safe.
//!
//! ## The Merge Engine
//!
//! Templates carry `{{placeholder}}` tokens and optional field schemas.
//! [`merge`] extracts placeholders, validates supplied data (leaning on the
//! standard catalog in [`fields`]), and substitutes values. The
//! document-from-template flow composes merge with the vault in
//! `commands/generate.rs`.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, commands, storage), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//! - **Never** assumes a terminal environment
//!
//! This means the same core could serve a REST API, a browser app, or any
//! other UI.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade—entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction, the `Vault`, and backends
//! - [`model`]: Core data types (`Document`, `Metadata`, `VersionRecord`)
//! - [`template`]: Template and field schema types
//! - [`merge`]: Placeholder extraction, validation, substitution
//! - [`fields`]: The standard merge field catalog
//! - [`config`]: Vault configuration
//! - [`init`]: Vault discovery and context wiring for clients
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod init;
pub mod merge;
pub mod model;
pub mod store;
pub mod template;
