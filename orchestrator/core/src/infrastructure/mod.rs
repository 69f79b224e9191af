// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod backend;
pub mod db;
pub mod dispatch;
pub mod repositories;
pub mod secret_codec;
pub mod store;

pub use backend::BackendRegistry;
pub use db::Database;
pub use dispatch::{HttpDispatchClient, RemoteDispatch};
pub use secret_codec::SecretCodec;
