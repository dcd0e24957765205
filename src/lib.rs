//! # vendor-intake
//!
//! Backend for a vendor-sourcing intake app: stores sourcing requests
//! (form fields plus attachments), recommends vendors for a request, and
//! renders plain-text RFP documents.
//!
//! ## Vendor selection
//!
//! ```text
//!                  ┌──────────────────────┐
//!                  │   Request (JSON)     │
//!                  └──────────┬───────────┘
//!                             │ service, markets, summary text
//!                             ▼
//!                  ┌──────────────────────┐
//!                  │  Service pre-filter  │
//!                  │  empty → full catalog│
//!                  └──────────┬───────────┘
//!                             │
//!               ┌─────────────┴─────────────┐
//!               ▼                           ▼
//!     ┌───────────────────┐       ┌───────────────────┐
//!     │ Embedding cosine  │       │ Keyword heuristic │
//!     │ (cached vectors)  │──────▶│ 40/25/15/20 bonus │
//!     └─────────┬─────────┘ fail  └─────────┬─────────┘
//!               └─────────────┬─────────────┘
//!                             │ keep top 20
//!                             ▼
//!                  ┌──────────────────────┐
//!                  │  LLM re-rank (opt.)  │──── fail ───┐
//!                  └──────────┬───────────┘             ▼
//!                             │               ┌──────────────────┐
//!                             │               │ Local top 9      │
//!                             │               └────────┬─────────┘
//!                             ▼                        │
//!                  ┌──────────────────────┐            │
//!                  │  Audit record        │◀───────────┘
//!                  └──────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for data dirs, bind address, and LLM settings
//! - [`models`] - Shared data types: `RequestEntry`, `VendorProfile`, `AuditRecord`, response types
//! - [`store`] - JSON file persistence: requests, vendor catalog, embedding cache, audit log
//! - [`llm`] - Provider trait, HTTP client for OpenAI/Ollama, offline stub, and re-ranking
//! - [`selection`] - Query extraction, pre-filter, keyword and vector scoring, the pipeline
//! - [`rfp`] - RFP text rendering
//! - [`uploads`] - Attachment storage and file-name safety
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod rfp;
pub mod selection;
pub mod state;
pub mod store;
pub mod uploads;
