use std::collections::HashMap;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use packrpc_message::{Message, NotificationMessage, RequestMessage, ResponseMessage};
use rmpv::decode::read_value;
use rmpv::Value;
use tracing::{debug, error, trace};

use crate::error::{ClientError, Result};

/// Persistent multicast subscriber for inbound requests. Registration is
/// idempotent and removal matches by `Arc` identity.
pub type RequestCallback = Arc<dyn Fn(&RequestMessage) + Send + Sync>;

/// Persistent multicast subscriber for inbound notifications.
pub type NotificationCallback = Arc<dyn Fn(&NotificationMessage) + Send + Sync>;

type ResponseCallback = Box<dyn FnOnce(u32, ResponseMessage) + Send>;

/// Lifecycle of a [`BackgroundListener`]. One-way: Idle → Running →
/// Stopped, never reusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Idle,
    Running,
    Stopped,
}

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_STOPPED: u8 = 2;

/// Owns the incoming stream: decodes one frame at a time on a dedicated
/// thread and routes each by kind.
///
/// Requests and notifications fan out to every registered subscriber;
/// a response goes to the one-shot callback registered for its id, or is
/// silently dropped if there is none. A malformed frame or a read failure
/// is fatal: the loop stops, the fault is recorded (see
/// [`take_fault`](Self::take_fault)) and the connection must be considered
/// dead.
pub struct BackgroundListener {
    shared: Arc<Shared>,
}

struct Shared {
    state: AtomicU8,
    // Held by the decode loop across {state check + dispatch} and taken by
    // `stop`, so a returned `stop` strictly precedes any later dispatch.
    dispatch_gate: Mutex<()>,
    responses: Mutex<HashMap<u32, ResponseCallback>>,
    requests: Mutex<Vec<RequestCallback>>,
    notifications: Mutex<Vec<NotificationCallback>>,
    fault: Mutex<Option<ClientError>>,
}

impl BackgroundListener {
    /// Listener in the idle state, with empty registries.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: AtomicU8::new(STATE_IDLE),
                dispatch_gate: Mutex::new(()),
                responses: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
                notifications: Mutex::new(Vec::new()),
                fault: Mutex::new(None),
            }),
        }
    }

    /// Start the decode loop over `input` on a dedicated thread.
    ///
    /// Always asynchronous: this returns as soon as the thread is spawned,
    /// so decode failures never propagate out of `start` — they surface
    /// through [`take_fault`](Self::take_fault) and the log. Fails with
    /// [`ClientError::AlreadyStarted`] unless the listener is idle.
    pub fn start(&self, input: Box<dyn Read + Send>) -> Result<()> {
        self.shared
            .state
            .compare_exchange(
                STATE_IDLE,
                STATE_RUNNING,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map_err(|_| ClientError::AlreadyStarted)?;

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("packrpc-listener".into())
            .spawn(move || decode_loop(&shared, input));
        if let Err(err) = spawned {
            self.shared.state.store(STATE_STOPPED, Ordering::SeqCst);
            return Err(ClientError::Io(err));
        }
        debug!("listener started");
        Ok(())
    }

    /// Stop dispatching. Idempotent.
    ///
    /// Once this returns no callback fires again, even for frames already
    /// buffered or mid-decode; the decode thread abandons its pending read
    /// when the stream next yields. Must not be called from inside a
    /// dispatch callback.
    pub fn stop(&self) {
        let _gate = self.shared.lock_gate();
        let previous = self.shared.state.swap(STATE_STOPPED, Ordering::SeqCst);
        if previous == STATE_RUNNING {
            debug!("listener stopped");
        }
    }

    /// Current lifecycle state. Reaches `Stopped` on its own when the
    /// stream ends or the loop hits a fatal decode error.
    pub fn state(&self) -> ListenerState {
        match self.shared.state.load(Ordering::SeqCst) {
            STATE_IDLE => ListenerState::Idle,
            STATE_RUNNING => ListenerState::Running,
            _ => ListenerState::Stopped,
        }
    }

    /// Register the one-shot callback for the response carrying `id`.
    ///
    /// A second registration for the same id before the response arrives
    /// replaces the first.
    pub fn listen_for_response(
        &self,
        id: u32,
        callback: impl FnOnce(u32, ResponseMessage) + Send + 'static,
    ) {
        self.shared.lock_responses().insert(id, Box::new(callback));
    }

    /// Subscribe to inbound requests. Adding the same `Arc` twice is a
    /// no-op, so a subscriber is never invoked twice per frame.
    pub fn listen_for_requests(&self, callback: RequestCallback) {
        let mut requests = self.shared.lock_requests();
        if !requests.iter().any(|existing| Arc::ptr_eq(existing, &callback)) {
            requests.push(callback);
        }
    }

    /// Drop a request subscription, matching by `Arc` identity.
    ///
    /// A dispatch that picked its subscriber set before this call may
    /// still deliver once; no dispatch that starts afterwards will.
    pub fn remove_request_callback(&self, callback: &RequestCallback) {
        self.shared
            .lock_requests()
            .retain(|existing| !Arc::ptr_eq(existing, callback));
    }

    /// Subscribe to inbound notifications. Same set semantics as
    /// [`listen_for_requests`](Self::listen_for_requests).
    pub fn listen_for_notifications(&self, callback: NotificationCallback) {
        let mut notifications = self.shared.lock_notifications();
        if !notifications
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &callback))
        {
            notifications.push(callback);
        }
    }

    /// Drop a notification subscription, matching by `Arc` identity.
    pub fn remove_notification_callback(&self, callback: &NotificationCallback) {
        self.shared
            .lock_notifications()
            .retain(|existing| !Arc::ptr_eq(existing, callback));
    }

    /// Take the fatal decode-loop failure, if one occurred.
    pub fn take_fault(&self) -> Option<ClientError> {
        self.shared.lock_fault().take()
    }
}

impl Default for BackgroundListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Shared {
    fn fail(&self, err: ClientError) {
        error!(error = %err, "decode loop failed; listener is dead");
        *self.lock_fault() = Some(err);
    }

    fn dispatch(&self, message: Message) {
        match message {
            Message::Request(request) => {
                // Snapshot, then invoke outside the lock: a subscriber being
                // removed right now may still see this frame, but never a
                // later one.
                let subscribers = self.lock_requests().clone();
                trace!(
                    method = request.method(),
                    subscribers = subscribers.len(),
                    "dispatching request"
                );
                for callback in subscribers {
                    callback(&request);
                }
            }
            Message::Notification(notification) => {
                let subscribers = self.lock_notifications().clone();
                trace!(
                    name = notification.name(),
                    subscribers = subscribers.len(),
                    "dispatching notification"
                );
                for callback in subscribers {
                    callback(&notification);
                }
            }
            Message::Response(response) => {
                let callback = self.lock_responses().remove(&response.id());
                match callback {
                    Some(callback) => callback(response.id(), response),
                    None => {
                        trace!(id = response.id(), "dropping unclaimed response");
                    }
                }
            }
        }
    }

    fn lock_gate(&self) -> MutexGuard<'_, ()> {
        self.dispatch_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_responses(&self) -> MutexGuard<'_, HashMap<u32, ResponseCallback>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_requests(&self) -> MutexGuard<'_, Vec<RequestCallback>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_notifications(&self) -> MutexGuard<'_, Vec<NotificationCallback>> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_fault(&self) -> MutexGuard<'_, Option<ClientError>> {
        self.fault
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn decode_loop(shared: &Shared, input: Box<dyn Read + Send>) {
    debug!("decode loop running");
    let mut reader = BufReader::new(input);
    loop {
        if shared.state.load(Ordering::SeqCst) != STATE_RUNNING {
            break;
        }
        let value = match next_frame(&mut reader) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("incoming stream ended");
                break;
            }
            Err(err) => {
                shared.fail(err);
                break;
            }
        };
        let message = match Message::from_value(value) {
            Ok(message) => message,
            Err(err) => {
                shared.fail(ClientError::Message(err));
                break;
            }
        };
        let _gate = shared.lock_gate();
        if shared.state.load(Ordering::SeqCst) != STATE_RUNNING {
            break;
        }
        shared.dispatch(message);
    }
    shared.state.store(STATE_STOPPED, Ordering::SeqCst);
    debug!("decode loop exited");
}

/// Read the next frame, distinguishing clean end-of-input (EOF between
/// frames) from EOF inside a frame, which `read_value` reports as an error.
fn next_frame<R: BufRead>(reader: &mut R) -> Result<Option<Value>> {
    loop {
        match reader.fill_buf() {
            Ok(buffer) if buffer.is_empty() => return Ok(None),
            Ok(_) => break,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ClientError::Io(err)),
        }
    }
    Ok(Some(read_value(reader)?))
}
