// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Optimization strategies: result-preserving rewrites

mod identity_removal;
mod predicate_pushdown;

pub use identity_removal::IdentityRemovalStrategy;
pub use predicate_pushdown::PredicatePushdownStrategy;
