// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod facts;
pub mod http_server;
pub mod swap;

pub use errors::{ApiError, ErrorResponse};
pub use facts::{fact_handler, random_fact, FactResponse, FACTS};
pub use http_server::{create_router, start_server, AppState, HealthResponse};
pub use swap::{swap_handler, swap_json_handler, SwapRequest, SwapResponse, SwapUpload};
