//! Integration tests for manifest functionality
//!
//! This module contains comprehensive integration tests that verify
//! the complete manifest processing workflow, including real file
//! handling and complex parsing scenarios.

pub mod integration;
