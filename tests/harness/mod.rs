// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for driving the client and gate under load.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

pub mod generators;
pub mod metrics;
