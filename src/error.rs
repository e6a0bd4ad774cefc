// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Domain errors that callers may want to match on. Everything else flows
//! through `anyhow` with context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Could not load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Could not decode {path} as UTF-8, Latin-1 or CP1252")]
    Undecodable { path: PathBuf },

    #[error("Could not encode {path} back to {encoding}")]
    Unencodable { path: PathBuf, encoding: &'static str },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("Table {table} does not exist (configured tables: 1..={max})")]
    TableOutOfRange { table: u32, max: u32 },

    #[error("Unknown currency '{0}' (expected GBP, EUR or USD)")]
    UnknownCurrency(String),

    #[error("{feature} is disabled: {reason}")]
    FeatureDisabled {
        feature: &'static str,
        reason: String,
    },
}
