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

//! The per-option handler contract and the per-connection data bag handlers
//! write into.

use crate::command::TelnetVerb;
use crate::link::Compressor;
use crate::options::TelnetOption;
use crate::result::TelnetResult;
use crate::session::SessionCore;
use async_trait::async_trait;
use std::fmt;

/// Which side a handler expects to assert when the server opens negotiation:
/// `Will` sends `IAC WILL <option>` ("I will"), `Do` sends `IAC DO <option>`
/// ("please do").
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Initiator {
    /// The server offers to enable the option on its own side.
    Will,
    /// The server asks the client to enable the option.
    Do,
}

impl Initiator {
    /// The opening verb for this role.
    pub fn verb(self) -> TelnetVerb {
        match self {
            Initiator::Will => TelnetVerb::Will,
            Initiator::Do => TelnetVerb::Do,
        }
    }
}

/// Client terminal window dimensions reported via NAWS.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowSize {
    /// Width in characters; 0 means unknown.
    pub width: u16,
    /// Height in lines; 0 means unknown.
    pub height: u16,
}

/// Per-connection scratch area where handlers park parsed results.
///
/// The core itself only inspects [`SessionData::compressor`], which decides
/// whether outbound writes are rerouted; the remaining fields are for
/// whoever consumes the negotiation results.
#[derive(Default)]
pub struct SessionData {
    /// Live outbound compressor, installed once MCCP is agreed.
    pub compressor: Option<Box<dyn Compressor>>,
    /// Terminal name reported by the client.
    pub terminal: Option<String>,
    /// Whether the terminal name has been requested this connection.
    pub terminal_requested: bool,
    /// Last window size reported by the client.
    pub window: Option<WindowSize>,
}

impl fmt::Debug for SessionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionData")
            .field("compressor", &self.compressor.is_some())
            .field("terminal", &self.terminal)
            .field("terminal_requested", &self.terminal_requested)
            .field("window", &self.window)
            .finish()
    }
}

/// Reaction logic for one telnet option.
///
/// One handler is registered per option at connection setup. The session
/// strips and routes the wire traffic; the handler decides what a received
/// verb or subnegotiation payload means and drives the success transition
/// itself via [`SessionCore::accept`] / [`SessionCore::reject`] — for
/// options like terminal type, a verb exchange alone is not completion.
#[async_trait]
pub trait OptionHandler: Send {
    /// The option this handler owns.
    fn option(&self) -> TelnetOption;

    /// Which verb the server opens with when initiating this option.
    fn initiator(&self) -> Initiator;

    /// Reacts to a received negotiation verb for this option.
    async fn on_command(&mut self, verb: TelnetVerb, core: &mut SessionCore) -> TelnetResult<()>;

    /// Reacts to a received subnegotiation payload (already unescaped).
    async fn on_subnegotiation(
        &mut self,
        _payload: &[u8],
        _core: &mut SessionCore,
    ) -> TelnetResult<()> {
        Ok(())
    }

    /// Called once when a dispatch moved the option into `Negotiated`.
    async fn on_accepted(&mut self, _core: &mut SessionCore) -> TelnetResult<()> {
        Ok(())
    }

    /// Called once when a dispatch moved the option into `Rejected`, or when
    /// the option was refused as operator-unwanted.
    async fn on_rejected(&mut self, _core: &mut SessionCore) -> TelnetResult<()> {
        Ok(())
    }
}
