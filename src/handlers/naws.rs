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
use crate::handler::{Initiator, OptionHandler, WindowSize};
use crate::options::TelnetOption;
use crate::result::TelnetResult;
use crate::session::SessionCore;
use async_trait::async_trait;
use bytes::Buf;
use tracing::{debug, warn};

/// Negotiate About Window Size (RFC 1073).
///
/// The server opens with `IAC DO NAWS`; a willing client then reports its
/// dimensions, and again whenever its window is resized, as a four-byte
/// big-endian `width height` subnegotiation.
#[derive(Debug, Default)]
pub struct NawsHandler;

#[async_trait]
impl OptionHandler for NawsHandler {
    fn option(&self) -> TelnetOption {
        TelnetOption::Naws
    }

    fn initiator(&self) -> Initiator {
        Initiator::Do
    }

    async fn on_command(&mut self, verb: TelnetVerb, core: &mut SessionCore) -> TelnetResult<()> {
        match verb {
            TelnetVerb::Will => core.accept(self.option()),
            TelnetVerb::Wont => core.reject(self.option()),
            TelnetVerb::Do => {
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
        let mut buf = payload;
        if buf.len() < 4 {
            warn!(len = buf.len(), "short window-size payload");
            return Ok(());
        }
        let window = WindowSize {
            width: buf.get_u16(),
            height: buf.get_u16(),
        };
        debug!(width = window.width, height = window.height, "window size updated");
        core.data_mut().window = Some(window);
        Ok(())
    }
}
