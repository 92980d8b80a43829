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

//! Telnet option negotiation for MUD servers.
//!
//! `mudwire` sits between a connection's byte stream and the game: it
//! strips and answers telnet control traffic, tracks per-option negotiation
//! state, and routes outbound bytes through MCCP2 compression once both
//! sides agree to it. Application data passes through untouched apart from
//! IAC escaping.
//!
//! A [`TelnetSession`] is created per connection over any [`Transport`]
//! (typically a [`StreamLink`] over the socket's write half). Option
//! behavior lives in [`OptionHandler`] implementations registered on the
//! session; the [`handlers`] module ships the usual MUD set (ECHO, TTYPE,
//! NAWS, COMPRESS2). Feed received bytes to [`TelnetSession::scan`] and
//! send with [`TelnetSession::write`].
//!
//! ```no_run
//! use mudwire::{handlers, OptionConfig, StreamLink, TelnetOption, TelnetSession};
//!
//! # async fn demo(socket: tokio::net::tcp::OwnedWriteHalf) -> mudwire::TelnetResult<()> {
//! let mut session = TelnetSession::new(StreamLink::new(socket));
//! session.register_handler(Box::new(handlers::NawsHandler));
//! session.register_handler(Box::new(handlers::TtypeHandler));
//! session.configure(TelnetOption::Naws, OptionConfig::proactive());
//! session.configure(TelnetOption::TerminalType, OptionConfig::proactive());
//! session.initiate_negotiations().await?;
//! # Ok(())
//! # }
//! ```
#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod consts;
pub mod handlers;

mod command;
mod handler;
mod link;
mod options;
mod result;
mod scanner;
mod session;

pub use crate::command::{escape, negotiation, subnegotiation, TelnetVerb};
pub use crate::handler::{Initiator, OptionHandler, SessionData, WindowSize};
pub use crate::link::{Compressor, SinkCompressor, StreamLink, Transport};
pub use crate::options::TelnetOption;
pub use crate::result::{TelnetError, TelnetResult};
pub use crate::session::{NegotiationState, OptionConfig, SessionCore, TelnetSession};
