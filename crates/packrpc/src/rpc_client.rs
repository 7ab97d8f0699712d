use std::sync::{Arc, OnceLock};

use packrpc_client::{
    BackgroundListener, NotificationCallback, RequestCallback, Result, RpcSender, RpcStreamer,
};
use packrpc_message::{
    IdGenerator, Message, RequestBuilder, ResponseMessage, SequentialIdGenerator,
};
use packrpc_transport::RpcConnection;

static DEFAULT_INSTANCE: OnceLock<RpcClient> = OnceLock::new();

/// Ready-made RPC endpoint facade.
///
/// Pure wiring: assembles {sender, listener, id generator} into a streamer
/// and exposes the streamer's operations by delegation. Build one with
/// [`RpcClientBuilder`], or use the instance factories.
pub struct RpcClient {
    streamer: RpcStreamer,
}

impl RpcClient {
    /// Process-wide shared instance, lazily built on first use.
    ///
    /// Every call returns the same endpoint; it shares no state with
    /// instances from [`new_instance`](Self::new_instance).
    pub fn default_instance() -> &'static RpcClient {
        DEFAULT_INSTANCE.get_or_init(|| RpcClientBuilder::new().build())
    }

    /// Fresh standalone instance with default components.
    pub fn new_instance() -> RpcClient {
        RpcClientBuilder::new().build()
    }

    /// See [`RpcStreamer::attach`].
    pub fn attach(&self, connection: &mut dyn RpcConnection) -> Result<()> {
        self.streamer.attach(connection)
    }

    /// See [`RpcStreamer::send`].
    pub fn send(&self, message: &Message) -> Result<()> {
        self.streamer.send(message)
    }

    /// See [`RpcStreamer::send_request`].
    pub fn send_request(&self, request: RequestBuilder) -> Result<u32> {
        self.streamer.send_request(request)
    }

    /// See [`RpcStreamer::send_request_with_callback`].
    pub fn send_request_with_callback(
        &self,
        request: RequestBuilder,
        callback: impl FnOnce(u32, ResponseMessage) + Send + 'static,
    ) -> Result<u32> {
        self.streamer.send_request_with_callback(request, callback)
    }

    /// See [`RpcStreamer::add_request_callback`].
    pub fn add_request_callback(&self, callback: RequestCallback) {
        self.streamer.add_request_callback(callback);
    }

    /// See [`RpcStreamer::remove_request_callback`].
    pub fn remove_request_callback(&self, callback: &RequestCallback) {
        self.streamer.remove_request_callback(callback);
    }

    /// See [`RpcStreamer::add_notification_callback`].
    pub fn add_notification_callback(&self, callback: NotificationCallback) {
        self.streamer.add_notification_callback(callback);
    }

    /// See [`RpcStreamer::remove_notification_callback`].
    pub fn remove_notification_callback(&self, callback: &NotificationCallback) {
        self.streamer.remove_notification_callback(callback);
    }

    /// See [`RpcStreamer::stop`].
    pub fn stop(&self) {
        self.streamer.stop();
    }
}

/// Assembles an [`RpcClient`] from optional custom components.
///
/// Anything not supplied falls back to a fresh default: a new sender, a
/// new listener, a sequential id generator. Supplying a whole streamer
/// overrides the component parts.
#[derive(Default)]
pub struct RpcClientBuilder {
    streamer: Option<RpcStreamer>,
    sender: Option<Arc<RpcSender>>,
    listener: Option<Arc<BackgroundListener>>,
    id_generator: Option<Arc<dyn IdGenerator>>,
}

impl RpcClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-assembled streamer, ignoring the component overrides.
    pub fn with_streamer(mut self, streamer: RpcStreamer) -> Self {
        self.streamer = Some(streamer);
        self
    }

    /// Use a custom sender.
    pub fn with_sender(mut self, sender: Arc<RpcSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Use a custom listener.
    pub fn with_listener(mut self, listener: Arc<BackgroundListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Use a custom id generator.
    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(id_generator);
        self
    }

    pub fn build(self) -> RpcClient {
        let streamer = match self.streamer {
            Some(streamer) => streamer,
            None => {
                let sender = self.sender.unwrap_or_else(|| Arc::new(RpcSender::new()));
                let listener = self
                    .listener
                    .unwrap_or_else(|| Arc::new(BackgroundListener::new()));
                let id_generator = self
                    .id_generator
                    .unwrap_or_else(|| Arc::new(SequentialIdGenerator::new()));
                RpcStreamer::with_id_generator(sender, listener, id_generator)
            }
        };
        RpcClient { streamer }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Write};
    use std::sync::Mutex;

    use packrpc_client::ClientError;
    use packrpc_transport::Result as TransportResult;

    use super::*;

    #[test]
    fn default_instance_is_process_wide() {
        let first = RpcClient::default_instance();
        let second = RpcClient::default_instance();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn new_instances_share_nothing_with_the_default() {
        let fresh = RpcClient::new_instance();
        assert!(!std::ptr::eq(&fresh, RpcClient::default_instance()));
        // Fresh instances are independent endpoints, each with its own
        // sender state.
        assert!(matches!(
            fresh.send_request(RequestBuilder::new("m")),
            Err(ClientError::NotAttached)
        ));
    }

    #[test]
    fn builder_builds_with_defaults() {
        let client = RpcClientBuilder::new().build();
        assert!(matches!(
            client.send_request(RequestBuilder::new("m")),
            Err(ClientError::NotAttached)
        ));
    }

    struct NullConnection;

    impl RpcConnection for NullConnection {
        fn incoming(&mut self) -> TransportResult<Box<dyn Read + Send>> {
            Ok(Box::new(Cursor::new(Vec::new())))
        }
        fn outgoing(&mut self) -> TransportResult<Box<dyn Write + Send>> {
            Ok(Box::new(std::io::sink()))
        }
        fn close(&mut self) -> TransportResult<()> {
            Ok(())
        }
    }

    #[test]
    fn custom_id_generator_is_used_for_stamping() {
        struct FixedIds;
        impl IdGenerator for FixedIds {
            fn next_id(&self) -> u32 {
                25
            }
        }

        let client = RpcClientBuilder::new()
            .with_id_generator(Arc::new(FixedIds))
            .build();
        let mut connection = NullConnection;
        client.attach(&mut connection).unwrap();

        let id = client.send_request(RequestBuilder::new("m")).unwrap();
        assert_eq!(id, 25);
        client.stop();
    }

    #[test]
    fn custom_components_are_wired_in() {
        let sender = Arc::new(RpcSender::new());
        let listener = Arc::new(BackgroundListener::new());
        let client = RpcClientBuilder::new()
            .with_sender(Arc::clone(&sender))
            .with_listener(Arc::clone(&listener))
            .build();

        // Attaching the shared sender directly is observable through the
        // client's delegated send.
        let captured = Arc::new(Mutex::new(Vec::new()));
        #[derive(Clone)]
        struct Sink(Arc<Mutex<Vec<u8>>>);
        impl Write for Sink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        sender.attach(Box::new(Sink(Arc::clone(&captured))));

        client.send_request(RequestBuilder::new("direct")).unwrap();
        assert!(!captured.lock().unwrap().is_empty());
    }

    #[test]
    fn streamer_override_wins() {
        let streamer = RpcStreamer::new(
            Arc::new(RpcSender::new()),
            Arc::new(BackgroundListener::new()),
        );
        let client = RpcClientBuilder::new()
            .with_streamer(streamer)
            .with_id_generator(Arc::new(SequentialIdGenerator::new()))
            .build();
        assert!(matches!(
            client.send_request(RequestBuilder::new("m")),
            Err(ClientError::NotAttached)
        ));
    }
}
