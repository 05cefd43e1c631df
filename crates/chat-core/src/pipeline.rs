//! Send pipeline: the optimistic-update / reconciliation protocol.
//!
//! One invocation:
//! 1. Reject with `Busy` if a send is already in flight
//! 2. Append the user message and an assistant placeholder, mark sending
//! 3. Call the remote assistant (the only suspension point), bounded by a timeout
//! 4. Resolve the placeholder with the reply, or with the apology on failure
//! 5. Clear the sending flag, then write through to storage
//!
//! Store borrows never straddle an await.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{self, Either};

use chat_types::{
    ChatError, Result,
    config::ChatConfig,
    event::ChatEvent,
    message::{new_message_id, Message, MessagePatch},
};
use crate::event_bus::EventBus;
use crate::persistence::{PersistSnapshot, PersistenceBridge};
use crate::ports::{RemoteChatPort, RemoteReply, RemoteRequest, TimerPort};
use crate::store::SessionStore;

pub struct SendPipeline {
    remote: Rc<dyn RemoteChatPort>,
    timer: Rc<dyn TimerPort>,
    timeout_ms: u64,
    reply_fallback: String,
    failure_apology: String,
}

impl SendPipeline {
    pub fn new(
        config: &ChatConfig,
        remote: Rc<dyn RemoteChatPort>,
        timer: Rc<dyn TimerPort>,
    ) -> Self {
        Self {
            remote,
            timer,
            timeout_ms: config.remote.timeout_ms,
            reply_fallback: config.reply_fallback.clone(),
            failure_apology: config.failure_apology.clone(),
        }
    }

    /// Run one send. On failure the placeholder is resolved to the apology
    /// text and the session persisted before the error is returned.
    pub async fn run(
        &self,
        store: &RefCell<SessionStore>,
        bridge: &PersistenceBridge,
        events: &EventBus,
        text: &str,
    ) -> Result<RemoteReply> {
        let (request, mut guard) = self.begin(store, events, text)?;

        let outcome = self.call_remote(request).await;

        let snapshot = {
            let mut store = store.borrow_mut();
            guard.disarm();

            if store.epoch() != guard.epoch {
                log::info!(
                    "[chat send] session was reset while awaiting reply; dropping result for {}",
                    guard.placeholder_id
                );
                return outcome;
            }

            match &outcome {
                Ok(reply) => {
                    if let Some(id) = reply.session_id.as_deref() {
                        if store.session_id() != Some(id) {
                            store.set_session_id(id);
                        }
                    }
                    let content = if reply.reply_text.is_empty() {
                        self.reply_fallback.clone()
                    } else {
                        reply.reply_text.clone()
                    };
                    store.update_message(&guard.placeholder_id, MessagePatch::resolve(content));
                    events.emit(ChatEvent::ReplyReceived {
                        placeholder_id: guard.placeholder_id.clone(),
                        session_id: store.session_id().map(String::from),
                    });
                }
                Err(e) => {
                    log::error!("[chat send] remote call failed: {}", e);
                    store.update_message(
                        &guard.placeholder_id,
                        MessagePatch::resolve(self.failure_apology.clone()),
                    );
                    events.emit(ChatEvent::SendFailed {
                        placeholder_id: guard.placeholder_id.clone(),
                        error: e.to_string(),
                    });
                }
            }

            store.set_sending(false);
            PersistSnapshot::capture(&store)
        };

        if let Err(e) = bridge.persist(snapshot).await {
            log::warn!("[chat send] failed to persist session: {}", e);
        }

        outcome
    }

    /// Synchronous prelude: busy check, optimistic appends, sending flag.
    fn begin<'a>(
        &self,
        store: &'a RefCell<SessionStore>,
        events: &EventBus,
        text: &str,
    ) -> Result<(RemoteRequest, SendingGuard<'a>)> {
        let mut s = store.borrow_mut();
        if s.is_sending() {
            log::warn!("[chat send] rejected: another send is in flight");
            return Err(ChatError::Busy);
        }

        let user = Message::user(new_message_id(), text);
        let user_message_id = user.id.clone();
        s.append_message(user);

        let placeholder = Message::placeholder(new_message_id());
        let placeholder_id = placeholder.id.clone();
        s.append_message(placeholder);

        s.set_sending(true);

        log::info!(
            "[chat send] sending via {} (session: {:?})",
            self.remote.backend_name(),
            s.session_id()
        );
        events.emit(ChatEvent::SendStarted {
            user_message_id,
            placeholder_id: placeholder_id.clone(),
        });

        let request = RemoteRequest {
            message: text.to_string(),
            session_id: s.session_id().map(String::from),
        };
        let guard = SendingGuard {
            store,
            placeholder_id,
            apology: self.failure_apology.clone(),
            epoch: s.epoch(),
            armed: true,
        };
        Ok((request, guard))
    }

    async fn call_remote(&self, request: RemoteRequest) -> Result<RemoteReply> {
        let call = self.remote.send_message(request);
        let deadline = self.timer.sleep(self.timeout_ms);

        match future::select(call, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                log::warn!("[chat send] remote call timed out after {}ms", self.timeout_ms);
                Err(ChatError::Timeout(self.timeout_ms))
            }
        }
    }
}

/// Restores a consistent store if the send future is dropped mid-flight:
/// the placeholder is resolved to the apology and the sending flag cleared.
struct SendingGuard<'a> {
    store: &'a RefCell<SessionStore>,
    placeholder_id: String,
    apology: String,
    epoch: u64,
    armed: bool,
}

impl SendingGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(mut store) = self.store.try_borrow_mut() else {
            log::error!("[chat send] store busy while abandoning send {}", self.placeholder_id);
            return;
        };
        if store.epoch() != self.epoch {
            return;
        }
        log::warn!("[chat send] send abandoned before reply; resolving placeholder");
        store.update_message(
            &self.placeholder_id,
            MessagePatch::resolve(std::mem::take(&mut self.apology)),
        );
        store.set_sending(false);
    }
}
