//! Common test utilities for integration tests.
//!
//! Provides `StubTransport`, a scripted [`Transport`] that records every
//! request, plus helpers to build kernel-style replies.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use ethnl::netlink::AttrIter;
use ethnl::netlink::genl::ethtool::{ETHTOOL_GENL_VERSION, EthtoolMessage};
use ethnl::{GenlMessage, Transport, TransportError};

type Handler =
    dyn Fn(&GenlMessage, u16) -> Result<Vec<GenlMessage>, TransportError> + Send + Sync;

/// A transport that answers from a closure and remembers what it was sent.
pub struct StubTransport {
    handler: Box<Handler>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(GenlMessage, u16)>>,
}

impl StubTransport {
    /// Answer every request with `handler`.
    pub fn new(
        handler: impl Fn(&GenlMessage, u16) -> Result<Vec<GenlMessage>, TransportError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with the same replies.
    pub fn replying(replies: Vec<GenlMessage>) -> Self {
        Self::new(move |_, _| Ok(replies.clone()))
    }

    /// Fail every request with a kernel errno.
    pub fn failing(errno: i32) -> Self {
        Self::new(move |_, _| Err(TransportError::kernel(-errno)))
    }

    /// Number of `execute` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request and its flags.
    pub fn last_request(&self) -> (GenlMessage, u16) {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for StubTransport {
    fn execute(
        &self,
        request: GenlMessage,
        flags: u16,
    ) -> impl Future<Output = Result<Vec<GenlMessage>, TransportError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = (self.handler)(&request, flags);
        self.requests.lock().unwrap().push((request, flags));
        std::future::ready(result)
    }
}

/// Build the reply message the kernel would send for `record`.
pub fn reply<M: EthtoolMessage>(record: &M) -> GenlMessage {
    GenlMessage::new(
        M::GET as u8,
        ETHTOOL_GENL_VERSION,
        record.encode().expect("encode reply"),
    )
}

/// Top-level attribute types of a message, in wire order.
pub fn attr_types(data: &[u8]) -> Vec<u16> {
    AttrIter::new(data).map(|(t, _)| t).collect()
}

/// Attribute types inside the first top-level attribute (the header nest).
pub fn header_attr_types(data: &[u8]) -> Vec<u16> {
    let (_, header) = AttrIter::new(data).next().expect("header nest");
    attr_types(header)
}

/// Install a test subscriber; `RUST_LOG=ethnl=trace` shows dispatcher logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Assert that a result failed with the given [`ethnl::ErrorKind`].
#[macro_export]
macro_rules! assert_kind {
    ($result:expr, $kind:expr) => {
        match $result {
            Ok(v) => panic!("expected {:?}, got Ok({:?})", $kind, v),
            Err(e) => assert_eq!(e.kind(), $kind, "unexpected error: {e}"),
        }
    };
}
