// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Volley workspace.
//!
//! Provides a scripted [`MockCarrier`] and storage fixtures so engine and
//! gateway tests run without upstream carriers or shared databases.

pub mod harness;
pub mod mock_carrier;

pub use harness::{seed_campaign, temp_store};
pub use mock_carrier::MockCarrier;
