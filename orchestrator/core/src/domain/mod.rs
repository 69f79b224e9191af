// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain layer: record shapes, query filter, driver capability interface,
//! repository contracts and configuration schema. No I/O lives here.

pub mod account;
pub mod backend;
pub mod config;
pub mod context;
pub mod directory;
pub mod host;
pub mod query;
pub mod repository;
pub mod share;
pub mod validation;
