// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod error;
pub mod filters;
pub mod fx;
pub mod loader;
pub mod models;
pub mod pricing;
pub mod seating;
pub mod session;
pub mod stats;
pub mod utils;
