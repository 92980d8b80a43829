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

//! Built-in handlers for the options a MUD server negotiates in practice:
//! server-side echo suppression, terminal type, window size, and MCCP2
//! compression.

mod compress;
mod echo;
mod naws;
mod ttype;

pub use compress::CompressHandler;
pub use echo::EchoHandler;
pub use naws::NawsHandler;
pub use ttype::TtypeHandler;
