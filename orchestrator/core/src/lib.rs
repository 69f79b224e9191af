// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Shareplane Core
//!
//! Dispatch-and-persistence engine of the shareplane storage control plane.
//!
//! # Architecture
//!
//! - **domain:** record shapes, query filter, driver interface, repository
//!   contracts, configuration schema
//! - **infrastructure:** SQLite store and query engine, secret codec,
//!   HTTP dispatch client, backend registry
//! - **application:** resource orchestrators, refresh scheduler, control
//!   plane assembly

pub mod application;
pub mod domain;
pub mod infrastructure;
