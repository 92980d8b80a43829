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

//! Telnet wire constants (RFC 854/855).
//!
//! Every telnet control sequence is introduced by [`IAC`] (255). A literal
//! 255 data byte is transmitted doubled (`IAC IAC`). Negotiation commands
//! are three bytes (`IAC <verb> <option>`), subnegotiation blocks are
//! bracketed by `IAC SB <option> ... IAC SE`.

/// Interpret As Command - introduces every telnet control sequence.
pub const IAC: u8 = 255;

/// End of subnegotiation parameters.
pub const SE: u8 = 240;
/// No operation.
pub const NOP: u8 = 241;
/// Go Ahead - half-duplex turn marker, stripped and otherwise ignored.
pub const GA: u8 = 249;
/// Subnegotiation begin.
pub const SB: u8 = 250;
/// Sender wants to enable an option on its own side.
pub const WILL: u8 = 251;
/// Sender refuses (or withdraws) an option on its own side.
pub const WONT: u8 = 252;
/// Sender asks the receiver to enable an option.
pub const DO: u8 = 253;
/// Sender asks the receiver to disable an option.
pub const DONT: u8 = 254;

/// Telnet option codes negotiated or named by this crate.
pub mod option {
    /// Binary Transmission (RFC 856).
    pub const BINARY: u8 = 0;
    /// Echo (RFC 857).
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead (RFC 858).
    pub const SGA: u8 = 3;
    /// Terminal Type (RFC 1091).
    pub const TTYPE: u8 = 24;
    /// Negotiate About Window Size (RFC 1073).
    pub const NAWS: u8 = 31;
    /// MUD Client Compression Protocol v1.
    pub const COMPRESS1: u8 = 85;
    /// MUD Client Compression Protocol v2.
    pub const COMPRESS2: u8 = 86;
    /// Generic MUD Communication Protocol.
    pub const GMCP: u8 = 201;
}

/// Terminal-type subnegotiation qualifiers (RFC 1091).
pub mod ttype {
    /// Payload carries the client's terminal name.
    pub const IS: u8 = 0;
    /// Request the client send its terminal name.
    pub const SEND: u8 = 1;
}
