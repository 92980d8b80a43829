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

use crate::consts;
use std::fmt;

/// A telnet option: a numbered, independently negotiated protocol extension.
///
/// Only the options this crate ships handlers for (plus a few commonly seen
/// on MUD links) get named variants; everything else round-trips through
/// [`TelnetOption::Unknown`] so an unrecognized code is never lost.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetOption {
    /// Binary Transmission (RFC 856).
    TransmitBinary,
    /// Echo (RFC 857) - which side echoes typed characters.
    Echo,
    /// Suppress Go Ahead (RFC 858).
    SuppressGoAhead,
    /// Terminal Type (RFC 1091) - client reports its terminal name.
    TerminalType,
    /// Negotiate About Window Size (RFC 1073).
    Naws,
    /// MUD Client Compression Protocol v1.
    Compress1,
    /// MUD Client Compression Protocol v2.
    Compress2,
    /// Generic MUD Communication Protocol.
    Gmcp,
    /// Any option code without a named variant.
    Unknown(u8),
}

impl TelnetOption {
    /// The option's wire code.
    pub fn code(self) -> u8 {
        match self {
            TelnetOption::TransmitBinary => consts::option::BINARY,
            TelnetOption::Echo => consts::option::ECHO,
            TelnetOption::SuppressGoAhead => consts::option::SGA,
            TelnetOption::TerminalType => consts::option::TTYPE,
            TelnetOption::Naws => consts::option::NAWS,
            TelnetOption::Compress1 => consts::option::COMPRESS1,
            TelnetOption::Compress2 => consts::option::COMPRESS2,
            TelnetOption::Gmcp => consts::option::GMCP,
            TelnetOption::Unknown(code) => code,
        }
    }

    /// Maps a wire code back to an option, preserving unrecognized codes.
    pub fn from_code(code: u8) -> Self {
        match code {
            consts::option::BINARY => TelnetOption::TransmitBinary,
            consts::option::ECHO => TelnetOption::Echo,
            consts::option::SGA => TelnetOption::SuppressGoAhead,
            consts::option::TTYPE => TelnetOption::TerminalType,
            consts::option::NAWS => TelnetOption::Naws,
            consts::option::COMPRESS1 => TelnetOption::Compress1,
            consts::option::COMPRESS2 => TelnetOption::Compress2,
            consts::option::GMCP => TelnetOption::Gmcp,
            code => TelnetOption::Unknown(code),
        }
    }
}

impl fmt::Display for TelnetOption {
    /// Names the option for diagnostics, falling back to the numeric code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelnetOption::TransmitBinary => write!(f, "BINARY"),
            TelnetOption::Echo => write!(f, "ECHO"),
            TelnetOption::SuppressGoAhead => write!(f, "SGA"),
            TelnetOption::TerminalType => write!(f, "TTYPE"),
            TelnetOption::Naws => write!(f, "NAWS"),
            TelnetOption::Compress1 => write!(f, "COMPRESS1"),
            TelnetOption::Compress2 => write!(f, "COMPRESS2"),
            TelnetOption::Gmcp => write!(f, "GMCP"),
            TelnetOption::Unknown(code) => write!(f, "{code}"),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(code: u8) -> Self {
        TelnetOption::from_code(code)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.code()
    }
}
