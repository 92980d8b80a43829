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

//! Pure encoding of telnet negotiation commands and subnegotiation blocks.
//!
//! No state lives here; the [`crate::session::TelnetSession`] decides *what*
//! to send, this module decides *which bytes* that is.

use crate::consts;
use crate::options::TelnetOption;
use bytes::{BufMut, BytesMut};
use std::fmt;

/// The four negotiation verbs (RFC 854).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetVerb {
    /// "I will enable this option on my side."
    Will,
    /// "I won't enable this option on my side."
    Wont,
    /// "Please enable this option on your side."
    Do,
    /// "Please disable this option on your side."
    Dont,
}

impl TelnetVerb {
    /// The verb's wire byte.
    pub fn code(self) -> u8 {
        match self {
            TelnetVerb::Will => consts::WILL,
            TelnetVerb::Wont => consts::WONT,
            TelnetVerb::Do => consts::DO,
            TelnetVerb::Dont => consts::DONT,
        }
    }

    /// Maps a wire byte to a verb, if it is one.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            consts::WILL => Some(TelnetVerb::Will),
            consts::WONT => Some(TelnetVerb::Wont),
            consts::DO => Some(TelnetVerb::Do),
            consts::DONT => Some(TelnetVerb::Dont),
            _ => None,
        }
    }

    /// The negative counter-verb used to refuse a received request: the same
    /// verb family with negative polarity (WILL/WONT collapse to WONT,
    /// DO/DONT to DONT).
    pub fn negative(self) -> Self {
        match self {
            TelnetVerb::Will | TelnetVerb::Wont => TelnetVerb::Wont,
            TelnetVerb::Do | TelnetVerb::Dont => TelnetVerb::Dont,
        }
    }

    /// Whether this verb asks for an option to be turned on.
    pub fn is_affirmative(self) -> bool {
        matches!(self, TelnetVerb::Will | TelnetVerb::Do)
    }
}

impl fmt::Display for TelnetVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelnetVerb::Will => write!(f, "WILL"),
            TelnetVerb::Wont => write!(f, "WONT"),
            TelnetVerb::Do => write!(f, "DO"),
            TelnetVerb::Dont => write!(f, "DONT"),
        }
    }
}

/// Encodes the three-byte negotiation command `IAC <verb> <option>`.
pub fn negotiation(verb: TelnetVerb, option: TelnetOption) -> [u8; 3] {
    [consts::IAC, verb.code(), option.code()]
}

/// Encodes a subnegotiation block `IAC SB <option> <payload> IAC SE`,
/// doubling any IAC byte inside the payload.
pub fn subnegotiation(option: TelnetOption, payload: &[u8]) -> BytesMut {
    let mut out = BytesMut::with_capacity(payload.len() + 5);
    out.put_u8(consts::IAC);
    out.put_u8(consts::SB);
    out.put_u8(option.code());
    for &byte in payload {
        if byte == consts::IAC {
            out.put_u8(consts::IAC);
        }
        out.put_u8(byte);
    }
    out.put_u8(consts::IAC);
    out.put_u8(consts::SE);
    out
}

/// Escapes application data for the wire by doubling every IAC byte.
pub fn escape(bytes: &[u8]) -> BytesMut {
    let extra = bytes.iter().filter(|&&b| b == consts::IAC).count();
    let mut out = BytesMut::with_capacity(bytes.len() + extra);
    for &byte in bytes {
        if byte == consts::IAC {
            out.put_u8(consts::IAC);
        }
        out.put_u8(byte);
    }
    out
}
