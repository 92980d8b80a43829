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
use crate::link::Compressor;
use crate::options::TelnetOption;
use crate::result::TelnetResult;
use crate::session::SessionCore;
use async_trait::async_trait;
use tracing::debug;

/// MUD Client Compression Protocol v2 (COMPRESS2).
///
/// The server offers `IAC WILL COMPRESS2`. When the client answers `DO`,
/// the server emits the empty `IAC SB COMPRESS2 IAC SE` marker on the raw
/// transport and installs a compressor from the factory; every byte after
/// the marker is compressed. A `DONT` while the offer is pending rejects
/// the option; either outcome is settled for the connection's life.
pub struct CompressHandler {
    factory: Box<dyn FnMut() -> Box<dyn Compressor> + Send>,
}

impl CompressHandler {
    /// Creates the handler with a factory producing a fresh compression
    /// stream each time compression starts.
    pub fn new(factory: impl FnMut() -> Box<dyn Compressor> + Send + 'static) -> Self {
        Self {
            factory: Box::new(factory),
        }
    }
}

#[async_trait]
impl OptionHandler for CompressHandler {
    fn option(&self) -> TelnetOption {
        TelnetOption::Compress2
    }

    fn initiator(&self) -> Initiator {
        Initiator::Will
    }

    async fn on_command(&mut self, verb: TelnetVerb, core: &mut SessionCore) -> TelnetResult<()> {
        match verb {
            TelnetVerb::Do => {
                // The marker must reach the client uncompressed; only bytes
                // after it belong to the compressed stream.
                core.send_subnegotiation(self.option(), &[]).await?;
                core.data_mut().compressor = Some((self.factory)());
                core.accept(self.option());
                debug!("outbound compression enabled");
            }
            TelnetVerb::Dont => core.reject(self.option()),
            TelnetVerb::Will => {
                // Inbound compression is not supported.
                core.send_command(verb.negative(), self.option()).await?;
            }
            TelnetVerb::Wont => {}
        }
        Ok(())
    }
}
