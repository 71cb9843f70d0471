// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod container;
pub mod db;
pub mod errors;
pub mod format;
pub mod http;
pub mod identity;
pub mod models;
pub mod reports;
pub mod sink;
pub mod state;
pub mod store;
pub mod utils;

pub use container::{ContainerOptions, StateContainer};
pub use state::{FinanceState, Mutation};
