// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Decoration strategies

mod event;

pub use event::EventStrategy;
