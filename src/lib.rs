//! MVPForge Engine Library
//!
//! This library provides the core functionality of the MVPForge pipeline:
//! ingest fresh arXiv papers, generate startup blueprints through an LLM
//! fallback chain with strict JSON validation, score them deterministically,
//! and persist the resulting batch.

/// Configuration management module
pub mod config;

/// Telemetry and observability
pub mod telemetry;

/// arXiv paper ingestion module
pub mod ingest;

/// Chat completion provider abstraction layer
pub mod llm;

/// Blueprint generation: prompts, extraction, validation, orchestration
pub mod blueprint;

/// Deterministic scoring rubric
pub mod rubric;

/// Database persistence module
pub mod db;

/// Pipeline coordinator module
pub mod pipeline;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
