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

//! Inbound stream scanning: splits a raw byte stream into literal data and
//! telnet control sequences, carrying incomplete sequences across reads.
//!
//! [`next_step`] is a pure function over the buffered bytes; the session
//! loops it against [`StreamScanner::buf`], consuming what each step claims.
//! After every complete step the scan restarts from the buffer head, so a
//! sequence arriving split across arbitrarily many reads is recognized the
//! same as one arriving whole.

use crate::command::TelnetVerb;
use crate::consts;
use bytes::{BufMut, BytesMut};

/// One recognized unit at the head of the scan buffer.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum ScanStep {
    /// `n` leading bytes of plain application data (no IAC among them).
    Literal(usize),
    /// `IAC IAC` - an escaped literal 255 data byte (consumes 2).
    EscapedIac,
    /// A three-byte negotiation command `IAC <verb> <option>`.
    Command {
        /// The negotiation verb.
        verb: TelnetVerb,
        /// The raw option code.
        option: u8,
    },
    /// A complete subnegotiation block with its payload already unescaped.
    Subnegotiation {
        /// The raw option code.
        option: u8,
        /// Payload between `IAC SB <option>` and `IAC SE`, IAC-unescaped.
        payload: BytesMut,
        /// Total wire bytes the block occupied.
        consumed: usize,
    },
    /// `IAC GA` or `IAC NOP` - stripped, nothing to deliver (consumes 2).
    GoAhead,
    /// IAC followed by a byte that opens no known sequence; drop the IAC
    /// alone and rescan (consumes 1).
    DropIac,
    /// A subnegotiation block went malformed (IAC followed by neither IAC
    /// nor SE inside the payload); discard `n` bytes through the offender.
    AbortBlock(usize),
    /// The buffer ends mid-sequence; wait for more bytes.
    Incomplete,
}

/// Classifies the head of `buf` without consuming anything.
pub(crate) fn next_step(buf: &[u8]) -> ScanStep {
    let Some(&first) = buf.first() else {
        return ScanStep::Incomplete;
    };
    if first != consts::IAC {
        let run = buf
            .iter()
            .position(|&b| b == consts::IAC)
            .unwrap_or(buf.len());
        return ScanStep::Literal(run);
    }
    let Some(&second) = buf.get(1) else {
        return ScanStep::Incomplete;
    };
    match second {
        consts::IAC => ScanStep::EscapedIac,
        consts::WILL | consts::WONT | consts::DO | consts::DONT => match (
            TelnetVerb::from_code(second),
            buf.get(2),
        ) {
            (Some(verb), Some(&option)) => ScanStep::Command { verb, option },
            _ => ScanStep::Incomplete,
        },
        consts::SB => scan_subnegotiation(buf),
        consts::GA | consts::NOP => ScanStep::GoAhead,
        _ => ScanStep::DropIac,
    }
}

/// Scans a subnegotiation block starting at `IAC SB` at the buffer head,
/// unescaping doubled IACs in the payload as it goes.
fn scan_subnegotiation(buf: &[u8]) -> ScanStep {
    let Some(&option) = buf.get(2) else {
        return ScanStep::Incomplete;
    };
    let mut payload = BytesMut::new();
    let mut i = 3;
    while i < buf.len() {
        let byte = buf[i];
        if byte != consts::IAC {
            payload.put_u8(byte);
            i += 1;
            continue;
        }
        match buf.get(i + 1) {
            Some(&consts::IAC) => {
                payload.put_u8(consts::IAC);
                i += 2;
            }
            Some(&consts::SE) => {
                return ScanStep::Subnegotiation {
                    option,
                    payload,
                    consumed: i + 2,
                };
            }
            Some(_) => return ScanStep::AbortBlock(i + 2),
            None => return ScanStep::Incomplete,
        }
    }
    ScanStep::Incomplete
}

/// Carry buffer for inbound bytes.
///
/// Feeds arrive via [`extend`](Self::extend); whatever a scan pass could
/// not yet classify stays buffered for the next one.
#[derive(Debug, Default)]
pub(crate) struct StreamScanner {
    carry: BytesMut,
}

impl StreamScanner {
    /// Appends a newly received chunk to the carry buffer.
    pub(crate) fn extend(&mut self, chunk: &[u8]) {
        self.carry.extend_from_slice(chunk);
    }

    /// The currently buffered bytes.
    pub(crate) fn buf(&self) -> &[u8] {
        &self.carry
    }

    /// Consumes the first `n` buffered bytes, returning them.
    pub(crate) fn take(&mut self, n: usize) -> BytesMut {
        self.carry.split_to(n)
    }
}
