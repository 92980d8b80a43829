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

//! The two seams between the negotiation core and the outside world: the raw
//! byte transport, and the optional outbound compressor installed once MCCP
//! is agreed.
//!
//! The compression algorithm itself lives outside this crate; the session
//! only decides *when* bytes go through the [`Compressor`]. Any
//! `AsyncWrite` (for example an `async-compression` zlib encoder over the
//! socket's write half) can be adapted with [`SinkCompressor`].

use crate::result::{TelnetError, TelnetResult};
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Outbound half of a connection's byte stream.
///
/// Implementations report liveness so the session can turn writes to a dead
/// connection into [`TelnetError::LinkClosed`] instead of a panic.
#[async_trait]
pub trait Transport: Send {
    /// Writes `bytes` to the peer.
    async fn send(&mut self, bytes: &[u8]) -> TelnetResult<()>;

    /// Whether the transport can still accept writes.
    fn is_open(&self) -> bool;
}

/// A live streaming compressor for outbound bytes.
///
/// The session pushes every application byte through this once compression
/// is negotiated, and flushes after each push so output is never silently
/// withheld. Emission to the peer is the compressor's own business and may
/// happen "soon" rather than immediately.
#[async_trait]
pub trait Compressor: Send {
    /// Feeds `bytes` into the compression stream.
    async fn push(&mut self, bytes: &[u8]) -> TelnetResult<()>;

    /// Forces buffered compressed output toward the peer.
    async fn flush(&mut self) -> TelnetResult<()>;
}

/// [`Transport`] adapter over any async writer.
///
/// The first I/O failure latches the link closed; later sends fail fast with
/// [`TelnetError::LinkClosed`] without touching the writer again.
#[derive(Debug)]
pub struct StreamLink<W> {
    writer: W,
    open: bool,
}

impl<W> StreamLink<W> {
    /// Wraps a writer in a live link.
    pub fn new(writer: W) -> Self {
        Self { writer, open: true }
    }

    /// Unwraps the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> Transport for StreamLink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, bytes: &[u8]) -> TelnetResult<()> {
        if !self.open {
            return Err(TelnetError::LinkClosed);
        }
        if let Err(source) = self.writer.write_all(bytes).await {
            self.open = false;
            return Err(TelnetError::Io {
                operation: "send",
                source,
            });
        }
        if let Err(source) = self.writer.flush().await {
            self.open = false;
            return Err(TelnetError::Io {
                operation: "flush",
                source,
            });
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// [`Compressor`] adapter over any async writer that performs the actual
/// compression, such as an `async-compression` encoder wrapping the socket.
#[derive(Debug)]
pub struct SinkCompressor<W> {
    sink: W,
}

impl<W> SinkCompressor<W> {
    /// Wraps a compressing writer.
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Unwraps the underlying writer.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[async_trait]
impl<W> Compressor for SinkCompressor<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn push(&mut self, bytes: &[u8]) -> TelnetResult<()> {
        self.sink
            .write_all(bytes)
            .await
            .map_err(|source| TelnetError::Io {
                operation: "compress",
                source,
            })
    }

    async fn flush(&mut self) -> TelnetResult<()> {
        self.sink.flush().await.map_err(|source| TelnetError::Io {
            operation: "compress flush",
            source,
        })
    }
}
