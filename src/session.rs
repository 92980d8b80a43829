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

//! The per-connection negotiation session: option state tracking, inbound
//! stream scanning, handler dispatch, and the outbound write path.
//!
//! [`TelnetSession`] owns everything for one connection. Inbound bytes go
//! through [`TelnetSession::scan`], which strips and dispatches control
//! sequences and returns the remaining application data. Outbound
//! application bytes go through [`TelnetSession::write`], which routes them
//! through the compressor once compression is live. Negotiation traffic
//! always goes to the raw transport, never through the compressor.

use crate::command::{self, TelnetVerb};
use crate::consts;
use crate::handler::{OptionHandler, SessionData};
use crate::link::Transport;
use crate::options::TelnetOption;
use crate::result::{TelnetError, TelnetResult};
use crate::scanner::{next_step, ScanStep, StreamScanner};
use bytes::{BufMut, BytesMut};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Lifecycle of one option on one connection.
///
/// `Negotiated`, `Rejected`, and `Disabled` are terminal for the life of
/// the connection; once reached, the option's fate never changes again.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NegotiationState {
    /// Never raised by either side.
    #[default]
    None,
    /// We sent the opening verb and await the peer's answer.
    PendingSend,
    /// The peer opened and a multi-step exchange is still in flight.
    PendingReceive,
    /// Both sides agreed; the option is active.
    Negotiated,
    /// One side refused; the option stays off.
    Rejected,
    /// Turned off by operator policy rather than by the peer.
    Disabled,
}

impl NegotiationState {
    /// Whether this state is final for the connection.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            NegotiationState::Negotiated | NegotiationState::Rejected | NegotiationState::Disabled
        )
    }
}

/// Operator policy for one option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OptionConfig {
    /// Whether the option may be enabled at all. When false, peer requests
    /// are refused and the option ends up `Disabled`.
    pub wanted: bool,
    /// Whether the server opens negotiation for this option itself.
    pub initiate: bool,
}

impl Default for OptionConfig {
    fn default() -> Self {
        Self {
            wanted: true,
            initiate: false,
        }
    }
}

impl OptionConfig {
    /// Wanted, and the server opens negotiation itself.
    pub fn proactive() -> Self {
        Self {
            wanted: true,
            initiate: true,
        }
    }

    /// Wanted, but only if the peer asks first.
    pub fn reactive() -> Self {
        Self::default()
    }

    /// Refused regardless of what the peer asks.
    pub fn refused() -> Self {
        Self {
            wanted: false,
            initiate: false,
        }
    }
}

#[derive(Debug, Default)]
struct OptionChannel {
    state: NegotiationState,
    config: OptionConfig,
}

/// The state and write half of a session, handed to handlers during
/// dispatch.
///
/// Split out from [`TelnetSession`] so a handler borrowed from the
/// session's registry can still mutate session state and send bytes.
pub struct SessionCore {
    transport: Box<dyn Transport>,
    channels: BTreeMap<u8, OptionChannel>,
    pending: BTreeSet<u8>,
    settled: Option<Box<dyn FnOnce() + Send>>,
    data: SessionData,
}

impl SessionCore {
    fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            channels: BTreeMap::new(),
            pending: BTreeSet::new(),
            settled: None,
            data: SessionData::default(),
        }
    }

    fn channel_mut(&mut self, option: TelnetOption) -> &mut OptionChannel {
        self.channels.entry(option.code()).or_default()
    }

    /// Current negotiation state of `option`.
    pub fn state(&self, option: TelnetOption) -> NegotiationState {
        self.channels
            .get(&option.code())
            .map_or(NegotiationState::None, |channel| channel.state)
    }

    /// Configured policy for `option`.
    pub fn config(&self, option: TelnetOption) -> OptionConfig {
        self.channels
            .get(&option.code())
            .map_or_else(OptionConfig::default, |channel| channel.config)
    }

    /// The per-connection data bag.
    pub fn data(&self) -> &SessionData {
        &self.data
    }

    /// Mutable access to the per-connection data bag.
    pub fn data_mut(&mut self) -> &mut SessionData {
        &mut self.data
    }

    /// Sends a negotiation command on the raw transport, bypassing any
    /// active compressor.
    pub async fn send_command(
        &mut self,
        verb: TelnetVerb,
        option: TelnetOption,
    ) -> TelnetResult<()> {
        debug!(%verb, %option, "sending negotiation command");
        let frame = command::negotiation(verb, option);
        self.raw_send(&frame).await
    }

    /// Sends a subnegotiation block on the raw transport, bypassing any
    /// active compressor.
    pub async fn send_subnegotiation(
        &mut self,
        option: TelnetOption,
        payload: &[u8],
    ) -> TelnetResult<()> {
        debug!(%option, len = payload.len(), "sending subnegotiation");
        let block = command::subnegotiation(option, payload);
        self.raw_send(&block).await
    }

    /// Marks `option` successfully negotiated.
    pub fn accept(&mut self, option: TelnetOption) {
        self.conclude(option, NegotiationState::Negotiated);
    }

    /// Marks `option` refused by the peer.
    pub fn reject(&mut self, option: TelnetOption) {
        self.conclude(option, NegotiationState::Rejected);
    }

    /// Marks `option` awaiting further exchange after the peer opened.
    pub fn await_exchange(&mut self, option: TelnetOption) {
        let code = option.code();
        self.channel_mut(option).state = NegotiationState::PendingReceive;
        self.pending.insert(code);
    }

    fn conclude(&mut self, option: TelnetOption, state: NegotiationState) {
        debug!(%option, ?state, "negotiation concluded");
        let code = option.code();
        self.channel_mut(option).state = state;
        self.pending.remove(&code);
        if self.pending.is_empty() {
            if let Some(callback) = self.settled.take() {
                callback();
            }
        }
    }

    async fn open(&mut self, verb: TelnetVerb, option: TelnetOption) -> TelnetResult<()> {
        self.send_command(verb, option).await?;
        self.channel_mut(option).state = NegotiationState::PendingSend;
        self.pending.insert(option.code());
        Ok(())
    }

    /// Writes application bytes, routing them through the compressor when
    /// compression has been negotiated and a compressor is installed.
    ///
    /// Callers are responsible for IAC-escaping their payload (see
    /// [`crate::escape`]); this method transmits `bytes` as-is.
    pub async fn write(&mut self, bytes: &[u8]) -> TelnetResult<()> {
        let compressing = self.state(TelnetOption::Compress2) == NegotiationState::Negotiated;
        if compressing {
            if let Some(compressor) = self.data.compressor.as_mut() {
                compressor.push(bytes).await?;
                return compressor.flush().await;
            }
        }
        self.raw_send(bytes).await
    }

    async fn raw_send(&mut self, bytes: &[u8]) -> TelnetResult<()> {
        if !self.transport.is_open() {
            return Err(TelnetError::LinkClosed);
        }
        self.transport.send(bytes).await
    }
}

/// One connection's telnet negotiation session.
pub struct TelnetSession {
    core: SessionCore,
    handlers: BTreeMap<u8, Box<dyn OptionHandler>>,
    scanner: StreamScanner,
}

impl TelnetSession {
    /// Creates a session over `transport` with no handlers registered.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            core: SessionCore::new(Box::new(transport)),
            handlers: BTreeMap::new(),
            scanner: StreamScanner::default(),
        }
    }

    /// Sets the policy for one option.
    pub fn configure(&mut self, option: TelnetOption, config: OptionConfig) {
        self.core.channel_mut(option).config = config;
    }

    /// Registers the handler for its option, replacing any previous one.
    pub fn register_handler(&mut self, handler: Box<dyn OptionHandler>) {
        self.handlers.insert(handler.option().code(), handler);
    }

    /// Opens negotiation for every registered option configured with
    /// `initiate`, in ascending option-code order.
    ///
    /// Only options still untouched (or previously `Disabled` and since
    /// reconfigured) are opened; anything already in flight or concluded is
    /// left alone.
    pub async fn initiate_negotiations(&mut self) -> TelnetResult<()> {
        let plan: Vec<(TelnetVerb, TelnetOption)> = self
            .handlers
            .values()
            .filter_map(|handler| {
                let option = handler.option();
                let config = self.core.config(option);
                let openable = matches!(
                    self.core.state(option),
                    NegotiationState::None | NegotiationState::Disabled
                );
                (config.wanted && config.initiate && openable)
                    .then(|| (handler.initiator().verb(), option))
            })
            .collect();
        for (verb, option) in plan {
            self.core.open(verb, option).await?;
        }
        Ok(())
    }

    /// Scans a received chunk, dispatching control sequences to handlers
    /// and returning the application data with telnet framing removed.
    ///
    /// Sequences split across chunks are carried until complete. Dispatch
    /// is sequential; replies triggered by a command are on the wire before
    /// the next sequence in the chunk is examined.
    pub async fn scan(&mut self, chunk: &[u8]) -> TelnetResult<BytesMut> {
        self.scanner.extend(chunk);
        let mut out = BytesMut::new();
        loop {
            match next_step(self.scanner.buf()) {
                ScanStep::Literal(n) => {
                    out.unsplit(self.scanner.take(n));
                }
                ScanStep::EscapedIac => {
                    self.scanner.take(2);
                    out.put_u8(consts::IAC);
                }
                ScanStep::Command { verb, option } => {
                    self.scanner.take(3);
                    self.receive_command(verb, TelnetOption::from_code(option))
                        .await?;
                }
                ScanStep::Subnegotiation {
                    option,
                    payload,
                    consumed,
                } => {
                    self.scanner.take(consumed);
                    self.receive_subnegotiation(TelnetOption::from_code(option), &payload)
                        .await?;
                }
                ScanStep::GoAhead => {
                    self.scanner.take(2);
                }
                ScanStep::DropIac => {
                    warn!(
                        following = self.scanner.buf()[1],
                        "dropping IAC before unrecognized byte"
                    );
                    self.scanner.take(1);
                }
                ScanStep::AbortBlock(n) => {
                    warn!(discarded = n, "discarding malformed subnegotiation");
                    self.scanner.take(n);
                }
                ScanStep::Incomplete => break,
            }
        }
        Ok(out)
    }

    /// Writes application bytes via [`SessionCore::write`].
    pub async fn write(&mut self, bytes: &[u8]) -> TelnetResult<()> {
        self.core.write(bytes).await
    }

    /// Current negotiation state of `option`.
    pub fn negotiation_state(&self, option: TelnetOption) -> NegotiationState {
        self.core.state(option)
    }

    /// The per-connection data bag.
    pub fn data(&self) -> &SessionData {
        self.core.data()
    }

    /// Mutable access to the per-connection data bag.
    pub fn data_mut(&mut self) -> &mut SessionData {
        self.core.data_mut()
    }

    /// The session core, for callers driving negotiation outside a handler.
    pub fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }

    /// Runs `callback` once, the first time the pending set becomes empty.
    ///
    /// If nothing is pending now the callback fires immediately. A later
    /// registration replaces an unfired earlier one.
    pub fn on_negotiations_settled(&mut self, callback: impl FnOnce() + Send + 'static) {
        if self.core.pending.is_empty() {
            callback();
        } else {
            self.core.settled = Some(Box::new(callback));
        }
    }

    async fn receive_command(
        &mut self,
        verb: TelnetVerb,
        option: TelnetOption,
    ) -> TelnetResult<()> {
        debug!(%verb, %option, "received negotiation command");
        let state = self.core.state(option);
        if state.is_terminal() {
            // Settled options stay settled for the connection's life; a
            // repeat or contrary verb gets silence, not a reply loop.
            debug!(%option, ?state, "ignoring verb for settled option");
            return Ok(());
        }
        let Some(handler) = self.handlers.get_mut(&option.code()) else {
            return Self::refuse_unhandled(&mut self.core, verb, option).await;
        };
        if !self.core.config(option).wanted {
            if verb.is_affirmative() {
                self.core.send_command(verb.negative(), option).await?;
            }
            self.core.conclude(option, NegotiationState::Disabled);
            return handler.on_rejected(&mut self.core).await;
        }
        let before = self.core.state(option);
        handler.on_command(verb, &mut self.core).await?;
        let after = self.core.state(option);
        if before != after {
            match after {
                NegotiationState::Negotiated => handler.on_accepted(&mut self.core).await?,
                NegotiationState::Rejected => handler.on_rejected(&mut self.core).await?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Refuses an option nothing is registered for. An affirmative request
    /// gets one negative reply; a refusal is recorded silently. Repeats
    /// never reach here - settled options are dropped before dispatch.
    async fn refuse_unhandled(
        core: &mut SessionCore,
        verb: TelnetVerb,
        option: TelnetOption,
    ) -> TelnetResult<()> {
        if verb.is_affirmative() {
            core.send_command(verb.negative(), option).await?;
        }
        core.conclude(option, NegotiationState::Rejected);
        Ok(())
    }

    async fn receive_subnegotiation(
        &mut self,
        option: TelnetOption,
        payload: &[u8],
    ) -> TelnetResult<()> {
        let Some(handler) = self.handlers.get_mut(&option.code()) else {
            debug!(%option, len = payload.len(), "discarding unhandled subnegotiation");
            return Ok(());
        };
        let before = self.core.state(option);
        handler.on_subnegotiation(payload, &mut self.core).await?;
        let after = self.core.state(option);
        if before != after {
            match after {
                NegotiationState::Negotiated => handler.on_accepted(&mut self.core).await?,
                NegotiationState::Rejected => handler.on_rejected(&mut self.core).await?,
                _ => {}
            }
        }
        Ok(())
    }
}
