// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Verification strategies
//!
//! Verification strategies never modify a traversal. They fail compilation
//! with `TraversalError::Verification` when a traversal cannot run.

mod distributed;
mod match_verification;

pub use distributed::DistributedVerificationStrategy;
pub use match_verification::MatchVerificationStrategy;
