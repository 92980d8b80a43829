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

use async_trait::async_trait;
use mudwire::handlers::{CompressHandler, EchoHandler, NawsHandler, TtypeHandler};
use mudwire::{
    Compressor, NegotiationState, OptionConfig, TelnetError, TelnetOption, TelnetResult,
    TelnetSession, Transport,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory transport recording everything the session sends.
#[derive(Clone, Default)]
struct MemoryLink {
    sent: Arc<Mutex<Vec<u8>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryLink {
    fn take_sent(&self) -> Vec<u8> {
        std::mem::take(&mut self.sent.lock().unwrap())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for MemoryLink {
    async fn send(&mut self, bytes: &[u8]) -> TelnetResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TelnetError::LinkClosed);
        }
        self.sent.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }
}

/// Compressor double recording pushed bytes and flush count.
#[derive(Clone, Default)]
struct RecordingCompressor {
    pushed: Arc<Mutex<Vec<u8>>>,
    flushes: Arc<AtomicUsize>,
}

#[async_trait]
impl Compressor for RecordingCompressor {
    async fn push(&mut self, bytes: &[u8]) -> TelnetResult<()> {
        self.pushed.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }

    async fn flush(&mut self) -> TelnetResult<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn plain_data_passes_through_untouched() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    let out = session.scan(b"look north\r\n").await.unwrap();
    assert_eq!(&out[..], b"look north\r\n");
    assert!(link.take_sent().is_empty());
}

#[tokio::test]
async fn doubled_iac_collapses_to_one_data_byte() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    let out = session.scan(&[b'a', 255, 255, b'b']).await.unwrap();
    assert_eq!(&out[..], &[b'a', 255, b'b']);
    assert!(link.take_sent().is_empty());
}

#[tokio::test]
async fn unhandled_request_refused_exactly_once() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());

    let out = session.scan(&[255, 251, 201]).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(link.take_sent(), vec![255, 252, 201]);
    assert_eq!(
        session.negotiation_state(TelnetOption::Gmcp),
        NegotiationState::Rejected
    );

    // A repeat request for the same option gets silence, not a reply loop.
    session.scan(&[255, 251, 201]).await.unwrap();
    assert!(link.take_sent().is_empty());
}

#[tokio::test]
async fn unhandled_refusal_recorded_without_reply() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    session.scan(&[255, 252, 201]).await.unwrap();
    assert!(link.take_sent().is_empty());
    assert_eq!(
        session.negotiation_state(TelnetOption::Gmcp),
        NegotiationState::Rejected
    );
}

#[tokio::test]
async fn initiation_opens_only_configured_options() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    session.register_handler(Box::new(NawsHandler));
    session.register_handler(Box::new(EchoHandler));
    session.configure(TelnetOption::Naws, OptionConfig::proactive());

    session.initiate_negotiations().await.unwrap();
    assert_eq!(link.take_sent(), vec![255, 253, 31]);
    assert_eq!(
        session.negotiation_state(TelnetOption::Naws),
        NegotiationState::PendingSend
    );
    assert_eq!(
        session.negotiation_state(TelnetOption::Echo),
        NegotiationState::None
    );
}

#[tokio::test]
async fn settled_callback_fires_exactly_once() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    session.register_handler(Box::new(NawsHandler));
    session.configure(TelnetOption::Naws, OptionConfig::proactive());
    session.initiate_negotiations().await.unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    session.on_negotiations_settled(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    session.scan(&[255, 251, 31]).await.unwrap();
    assert_eq!(
        session.negotiation_state(TelnetOption::Naws),
        NegotiationState::Negotiated
    );
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Traffic after settlement never re-fires the callback.
    session.scan(b"more data").await.unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn settled_callback_fires_immediately_when_nothing_pending() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link);
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    session.on_negotiations_settled(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn peer_refusal_settles_as_rejected() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    session.register_handler(Box::new(NawsHandler));
    session.configure(TelnetOption::Naws, OptionConfig::proactive());
    session.initiate_negotiations().await.unwrap();
    link.take_sent();

    session.scan(&[255, 252, 31]).await.unwrap();
    assert_eq!(
        session.negotiation_state(TelnetOption::Naws),
        NegotiationState::Rejected
    );
    assert!(link.take_sent().is_empty());
}

#[tokio::test]
async fn rejected_option_never_reopens() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    session.register_handler(Box::new(NawsHandler));
    session.configure(TelnetOption::Naws, OptionConfig::proactive());
    session.initiate_negotiations().await.unwrap();
    link.take_sent();

    session.scan(&[255, 252, 31]).await.unwrap();
    assert_eq!(
        session.negotiation_state(TelnetOption::Naws),
        NegotiationState::Rejected
    );

    // A later WILL cannot resurrect a settled option.
    session.scan(&[255, 251, 31]).await.unwrap();
    assert_eq!(
        session.negotiation_state(TelnetOption::Naws),
        NegotiationState::Rejected
    );
    assert!(link.take_sent().is_empty());
}

#[tokio::test]
async fn unwanted_option_refused_and_disabled() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    session.register_handler(Box::new(EchoHandler));
    session.configure(TelnetOption::Echo, OptionConfig::refused());

    session.scan(&[255, 253, 1]).await.unwrap();
    assert_eq!(link.take_sent(), vec![255, 254, 1]);
    assert_eq!(
        session.negotiation_state(TelnetOption::Echo),
        NegotiationState::Disabled
    );

    // Repeating the request neither re-refuses nor re-runs the handler.
    session.scan(&[255, 253, 1]).await.unwrap();
    assert!(link.take_sent().is_empty());
    assert_eq!(
        session.negotiation_state(TelnetOption::Echo),
        NegotiationState::Disabled
    );
}

#[tokio::test]
async fn sequence_split_across_reads_is_reassembled() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    session.register_handler(Box::new(TtypeHandler));

    // Client agrees to report; the session asks for the name.
    session.scan(&[255, 251, 24]).await.unwrap();
    assert_eq!(link.take_sent(), vec![255, 250, 24, 1, 255, 240]);
    assert!(session.data().terminal_requested);
    assert_eq!(
        session.negotiation_state(TelnetOption::TerminalType),
        NegotiationState::PendingReceive
    );

    // The IS reply arrives split over two reads; nothing happens until the
    // block completes.
    let out = session.scan(&[255, 250, 24, 0, b'x']).await.unwrap();
    assert!(out.is_empty());
    assert!(session.data().terminal.is_none());

    session.scan(&[b't', b'e', b'r', b'm', 255, 240]).await.unwrap();
    assert_eq!(session.data().terminal.as_deref(), Some("xterm"));
    assert_eq!(
        session.negotiation_state(TelnetOption::TerminalType),
        NegotiationState::Negotiated
    );
}

#[tokio::test]
async fn naws_payload_updates_window_size() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link);
    session.register_handler(Box::new(NawsHandler));

    session.scan(&[255, 251, 31]).await.unwrap();
    session
        .scan(&[255, 250, 31, 0, 80, 0, 24, 255, 240])
        .await
        .unwrap();
    let window = session.data().window.unwrap();
    assert_eq!((window.width, window.height), (80, 24));
}

#[tokio::test]
async fn compression_routes_writes_after_agreement() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    let stream = RecordingCompressor::default();
    let handle = stream.clone();
    session.register_handler(Box::new(CompressHandler::new(move || {
        Box::new(handle.clone())
    })));

    // Before agreement, writes hit the raw transport.
    session.write(b"raw").await.unwrap();
    assert_eq!(link.take_sent(), b"raw");

    // DO COMPRESS2: the empty marker goes out raw, then compression starts.
    session.scan(&[255, 253, 86]).await.unwrap();
    assert_eq!(link.take_sent(), vec![255, 250, 86, 255, 240]);
    assert_eq!(
        session.negotiation_state(TelnetOption::Compress2),
        NegotiationState::Negotiated
    );

    session.write(b"compressed payload").await.unwrap();
    assert!(link.take_sent().is_empty());
    assert_eq!(&stream.pushed.lock().unwrap()[..], b"compressed payload");
    assert!(stream.flushes.load(Ordering::SeqCst) >= 1);

    // Negotiation traffic still bypasses the compressor.
    session.scan(&[255, 251, 201]).await.unwrap();
    assert_eq!(link.take_sent(), vec![255, 252, 201]);

    // A late DONT cannot unsettle the option; writes keep compressing.
    stream.pushed.lock().unwrap().clear();
    session.scan(&[255, 254, 86]).await.unwrap();
    assert_eq!(
        session.negotiation_state(TelnetOption::Compress2),
        NegotiationState::Negotiated
    );
    session.write(b"still compressed").await.unwrap();
    assert!(link.take_sent().is_empty());
    assert_eq!(&stream.pushed.lock().unwrap()[..], b"still compressed");
}

#[tokio::test]
async fn compression_refusal_keeps_writes_raw() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    let stream = RecordingCompressor::default();
    let handle = stream.clone();
    session.register_handler(Box::new(CompressHandler::new(move || {
        Box::new(handle.clone())
    })));
    session.configure(TelnetOption::Compress2, OptionConfig::proactive());
    session.initiate_negotiations().await.unwrap();
    assert_eq!(link.take_sent(), vec![255, 251, 86]);

    // DONT while pending: no marker, no compressor, raw writes.
    session.scan(&[255, 254, 86]).await.unwrap();
    assert_eq!(
        session.negotiation_state(TelnetOption::Compress2),
        NegotiationState::Rejected
    );
    assert!(session.data().compressor.is_none());
    assert!(link.take_sent().is_empty());

    session.write(b"plain").await.unwrap();
    assert_eq!(link.take_sent(), b"plain");
    assert!(stream.pushed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn write_to_closed_link_fails() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    link.close();
    let err = session.write(b"anyone there?").await.unwrap_err();
    assert!(matches!(err, TelnetError::LinkClosed));
}

#[tracing_test::traced_test]
#[tokio::test]
async fn malformed_sequences_recover_to_clean_stream() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());

    // IAC before an unknown byte: the IAC is dropped, the byte survives.
    let out = session.scan(&[b'a', 255, 7, b'b']).await.unwrap();
    assert_eq!(&out[..], &[b'a', 7, b'b']);

    // A subnegotiation broken by a stray command is discarded whole.
    let out = session
        .scan(&[255, 250, 24, 0, 255, 251, 1, b'o', b'k'])
        .await
        .unwrap();
    assert_eq!(&out[..], &[1, b'o', b'k']);

    assert!(logs_contain("dropping IAC"));
    assert!(logs_contain("malformed subnegotiation"));
}

#[tokio::test]
async fn mixed_chunk_dispatches_in_order() {
    let link = MemoryLink::default();
    let mut session = TelnetSession::new(link.clone());
    session.register_handler(Box::new(NawsHandler));
    session.register_handler(Box::new(EchoHandler));

    let chunk = [255, 253, 31, b'h', b'i', 255, 251, 1];
    let out = session.scan(&chunk).await.unwrap();
    assert_eq!(&out[..], b"hi");
    // DO NAWS is declined, then WILL ECHO is declined, in arrival order.
    assert_eq!(link.take_sent(), vec![255, 254, 31, 255, 252, 1]);
}
