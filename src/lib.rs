//! ColorSense Library
//!
//! This library provides the core functionality of the ColorSense backend:
//! resolving visual element colors to deficiency-adapted colors through
//! fixed transformation tables, enriching results with JSON-LD ontology
//! metadata, and managing user profiles with their adaptation history.

// Module declarations
pub mod agent;
pub mod config;
pub mod models;
pub mod semantics;
pub mod services;
pub mod store;
pub mod web;
