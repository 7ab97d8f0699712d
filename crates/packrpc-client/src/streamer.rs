use std::sync::Arc;

use packrpc_message::{
    IdGenerator, Message, RequestBuilder, ResponseMessage, SequentialIdGenerator,
};
use packrpc_transport::RpcConnection;
use tracing::debug;

use crate::error::Result;
use crate::listener::{BackgroundListener, NotificationCallback, RequestCallback};
use crate::sender::RpcSender;

/// A full RPC endpoint over one connection.
///
/// Ties the sender, the background listener and the id generator together:
/// outgoing requests get stamped with fresh correlation ids, response
/// callbacks are registered before the frame leaves, and inbound traffic
/// is routed through the listener's registries.
///
/// The split keeps the correlation table's writers apart: the decode loop
/// is the only remover, the streamer the only registrar, so neither
/// direction of traffic waits on a lock owned by the other.
pub struct RpcStreamer {
    sender: Arc<RpcSender>,
    listener: Arc<BackgroundListener>,
    id_generator: Arc<dyn IdGenerator>,
}

impl RpcStreamer {
    /// Streamer with a fresh sequential id generator.
    pub fn new(sender: Arc<RpcSender>, listener: Arc<BackgroundListener>) -> Self {
        Self::with_id_generator(sender, listener, Arc::new(SequentialIdGenerator::new()))
    }

    /// Streamer with an explicit id generator.
    pub fn with_id_generator(
        sender: Arc<RpcSender>,
        listener: Arc<BackgroundListener>,
        id_generator: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            sender,
            listener,
            id_generator,
        }
    }

    /// Wire up `connection`: the outgoing stream goes to the sender, the
    /// incoming stream into the listener's decode loop.
    ///
    /// Meaningful at most once per streamer. Re-attaching while already
    /// attached is not defined; avoiding it is the caller's responsibility.
    pub fn attach(&self, connection: &mut dyn RpcConnection) -> Result<()> {
        let outgoing = connection.outgoing()?;
        let incoming = connection.incoming()?;
        // Sender first: a request callback may want to answer immediately.
        self.sender.attach(outgoing);
        self.listener.start(incoming)?;
        debug!("streamer attached");
        Ok(())
    }

    /// Send a pre-built message unchanged. Used for responses and for
    /// notifications built ahead of time; no id is stamped.
    pub fn send(&self, message: &Message) -> Result<()> {
        self.sender.send(message)
    }

    /// Stamp a fresh id onto `request`, send it, and return the id.
    ///
    /// Fire-and-forget: no response callback is registered, so whatever
    /// the peer answers for this id is dropped.
    pub fn send_request(&self, request: RequestBuilder) -> Result<u32> {
        let id = self.id_generator.next_id();
        self.sender
            .send(&Message::Request(request.with_id(id).build()))?;
        Ok(id)
    }

    /// Like [`send_request`](Self::send_request), but registers `callback`
    /// for the response first, so an answer arriving right after the write
    /// cannot be missed.
    pub fn send_request_with_callback(
        &self,
        request: RequestBuilder,
        callback: impl FnOnce(u32, ResponseMessage) + Send + 'static,
    ) -> Result<u32> {
        let id = self.id_generator.next_id();
        self.listener.listen_for_response(id, callback);
        self.sender
            .send(&Message::Request(request.with_id(id).build()))?;
        Ok(id)
    }

    /// Subscribe to requests initiated by the remote peer.
    pub fn add_request_callback(&self, callback: RequestCallback) {
        self.listener.listen_for_requests(callback);
    }

    /// Drop a request subscription, matching by `Arc` identity.
    pub fn remove_request_callback(&self, callback: &RequestCallback) {
        self.listener.remove_request_callback(callback);
    }

    /// Subscribe to notifications from the remote peer.
    pub fn add_notification_callback(&self, callback: NotificationCallback) {
        self.listener.listen_for_notifications(callback);
    }

    /// Drop a notification subscription, matching by `Arc` identity.
    pub fn remove_notification_callback(&self, callback: &NotificationCallback) {
        self.listener.remove_notification_callback(callback);
    }

    /// Stop the listener, then the sender. Idempotent.
    pub fn stop(&self) {
        self.listener.stop();
        self.sender.stop();
    }
}
