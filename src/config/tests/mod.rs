//! Unit tests for poddiff configuration types.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Type, serialisation and CLI parsing tests
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests

mod helpers;
mod layer_precedence_tests;
mod types_tests;
