//
// Copyright 2024-2026 The Mudwire Authors. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use thiserror::Error;

/// Result type for negotiation operations.
pub type TelnetResult<T> = Result<T, TelnetError>;

/// Errors surfaced by the negotiation subsystem.
///
/// Malformed inbound bytes, unsupported options, and policy refusals are all
/// recovered internally and never appear here; the only failures a caller
/// sees are transport failures, which it should treat as the connection
/// going away rather than retry.
#[derive(Debug, Error)]
pub enum TelnetError {
    /// The transport is closed; the write was not performed.
    #[error("transport is closed")]
    LinkClosed,

    /// An I/O failure while writing to the transport or compressor.
    #[error("i/o failure during {operation}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
