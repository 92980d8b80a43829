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
use crate::handler::{Initiator, OptionHandler};
use crate::options::TelnetOption;
use crate::result::TelnetResult;
use crate::session::SessionCore;
use async_trait::async_trait;

/// Server-side Echo (RFC 857).
///
/// The server offers `IAC WILL ECHO` to take over echoing, typically while
/// a password is being typed so the client stops local echo. A client
/// offering to echo for us (`WILL ECHO`) is always declined.
#[derive(Debug, Default)]
pub struct EchoHandler;

#[async_trait]
impl OptionHandler for EchoHandler {
    fn option(&self) -> TelnetOption {
        TelnetOption::Echo
    }

    fn initiator(&self) -> Initiator {
        Initiator::Will
    }

    async fn on_command(&mut self, verb: TelnetVerb, core: &mut SessionCore) -> TelnetResult<()> {
        match verb {
            TelnetVerb::Do => core.accept(self.option()),
            TelnetVerb::Dont => core.reject(self.option()),
            TelnetVerb::Will => {
                core.send_command(verb.negative(), self.option()).await?;
            }
            TelnetVerb::Wont => {}
        }
        Ok(())
    }
}
