// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Finalization strategies

mod lazy_barrier;
mod match_algorithm;
mod path_requirement;

pub use lazy_barrier::LazyBarrierStrategy;
pub use match_algorithm::MatchAlgorithmStrategy;
pub use path_requirement::PathRequirementStrategy;
