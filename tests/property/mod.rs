// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Plan ordering, validation precedence and composition properties over the
//! full feature flag space.

mod plan_ordering;
