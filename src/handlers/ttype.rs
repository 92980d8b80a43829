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

use crate::command::TelnetVerb;
use crate::consts;
use crate::handler::{Initiator, OptionHandler};
use crate::options::TelnetOption;
use crate::result::TelnetResult;
use crate::session::SessionCore;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Terminal Type (RFC 1091).
///
/// The server opens with `IAC DO TTYPE`. A client answering `WILL` is then
/// asked for its name with an `IS/SEND` subnegotiation; the exchange only
/// counts as negotiated once the name actually arrives, so the option stays
/// pending through the subnegotiation round-trip.
#[derive(Debug, Default)]
pub struct TtypeHandler;

#[async_trait]
impl OptionHandler for TtypeHandler {
    fn option(&self) -> TelnetOption {
        TelnetOption::TerminalType
    }

    fn initiator(&self) -> Initiator {
        Initiator::Do
    }

    async fn on_command(&mut self, verb: TelnetVerb, core: &mut SessionCore) -> TelnetResult<()> {
        match verb {
            TelnetVerb::Will => {
                core.await_exchange(self.option());
                core.send_subnegotiation(self.option(), &[consts::ttype::SEND])
                    .await?;
                core.data_mut().terminal_requested = true;
            }
            TelnetVerb::Wont => core.reject(self.option()),
            TelnetVerb::Do => {
                // The server has no terminal of its own to report.
                core.send_command(verb.negative(), self.option()).await?;
            }
            TelnetVerb::Dont => {}
        }
        Ok(())
    }

    async fn on_subnegotiation(
        &mut self,
        payload: &[u8],
        core: &mut SessionCore,
    ) -> TelnetResult<()> {
        match payload.split_first() {
            Some((&consts::ttype::IS, name)) => {
                let terminal = String::from_utf8_lossy(name).into_owned();
                debug!(%terminal, "client reported terminal type");
                core.data_mut().terminal = Some(terminal);
                core.accept(self.option());
            }
            _ => {
                warn!(len = payload.len(), "unexpected terminal-type payload");
            }
        }
        Ok(())
    }
}
