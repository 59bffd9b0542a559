//! Browser Socket Driver
//!
//! Wires a `web_sys::WebSocket` into the connection manager. Frames and
//! closes arrive through JS callbacks; reconnects are scheduled with
//! `gloo-timers`. Listeners run after the manager borrow is released, so they
//! may call back into the handle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use taskhub_realtime::{
    ClientEvent, ConnectionManager, ConnectionState, RealtimeError, RealtimeResult, ReconnectPolicy,
    ReconnectStep, SendPlan, SocketEvent, Transport,
};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

/// Callbacks filled in once the owning handle exists
#[derive(Default)]
struct Hooks {
    on_frame: RefCell<Option<Box<dyn Fn(String)>>>,
    on_close: RefCell<Option<Box<dyn Fn()>>>,
}

pub struct WsTransport {
    socket: Option<WebSocket>,
    hooks: Rc<Hooks>,
    on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
    on_close: Option<Closure<dyn FnMut(CloseEvent)>>,
}

impl WsTransport {
    fn new(hooks: Rc<Hooks>) -> Self {
        Self { socket: None, hooks, on_message: None, on_close: None }
    }

    /// Silence and close the previous socket so its late close event is not
    /// mistaken for a drop of the new one
    fn detach(&mut self) {
        if let Some(ws) = self.socket.take() {
            ws.set_onmessage(None);
            ws.set_onclose(None);
            let _ = ws.close();
        }
        self.on_message = None;
        self.on_close = None;
    }
}

impl Transport for WsTransport {
    fn open(&mut self, url: &str) -> RealtimeResult<()> {
        self.detach();
        let ws = WebSocket::new(url).map_err(|e| RealtimeError::Transport(format!("{:?}", e)))?;

        let hooks = self.hooks.clone();
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            if let Some(text) = ev.data().as_string() {
                if let Some(callback) = hooks.on_frame.borrow().as_ref() {
                    callback(text);
                }
            }
        });
        let hooks = self.hooks.clone();
        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
            debug!(code = ev.code(), "websocket closed");
            if let Some(callback) = hooks.on_close.borrow().as_ref() {
                callback();
            }
        });

        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        self.socket = Some(ws);
        self.on_message = Some(on_message);
        self.on_close = Some(on_close);
        Ok(())
    }

    fn send(&mut self, frame: &str) -> RealtimeResult<()> {
        let ws = self.socket.as_ref().ok_or(RealtimeError::NotConnected)?;
        ws.send_with_str(frame).map_err(|e| RealtimeError::Transport(format!("{:?}", e)))
    }

    /// Handlers stay attached: the close event drives the reconnect decision
    fn close(&mut self) {
        if let Some(ws) = self.socket.as_ref() {
            let _ = ws.close();
        }
    }
}

struct SocketInner {
    manager: RefCell<ConnectionManager<WsTransport>>,
    listeners: RefCell<Vec<Rc<dyn Fn(&SocketEvent)>>>,
    /// Bumped to invalidate scheduled retries
    retry_generation: Cell<u64>,
}

/// Shared handle to one namespace connection
#[derive(Clone)]
pub struct SocketHandle {
    inner: Rc<SocketInner>,
}

impl SocketHandle {
    pub fn new(base_url: &str, namespace: &str, policy: ReconnectPolicy) -> Self {
        let hooks = Rc::new(Hooks::default());
        let manager = ConnectionManager::new(WsTransport::new(hooks.clone()), base_url, namespace, policy);
        let inner = Rc::new(SocketInner {
            manager: RefCell::new(manager),
            listeners: RefCell::new(Vec::new()),
            retry_generation: Cell::new(0),
        });

        let weak = Rc::downgrade(&inner);
        *hooks.on_frame.borrow_mut() = Some(Box::new(move |frame: String| {
            if let Some(inner) = weak.upgrade() {
                SocketHandle { inner }.on_frame(&frame);
            }
        }));
        let weak = Rc::downgrade(&inner);
        *hooks.on_close.borrow_mut() = Some(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                SocketHandle { inner }.on_closed();
            }
        }));

        Self { inner }
    }

    pub fn subscribe(&self, listener: impl Fn(&SocketEvent) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.manager.borrow().state()
    }

    pub fn connect(&self, token: &str) {
        let result = self.inner.manager.borrow_mut().connect(token);
        match result {
            Ok(()) | Err(RealtimeError::MissingToken) => {}
            Err(e) => {
                warn!(error = %e, "socket open failed");
                self.on_closed();
            }
        }
    }

    /// Logout teardown; cancels any pending retry
    pub fn disconnect(&self) {
        self.cancel_retry();
        self.inner.manager.borrow_mut().disconnect();
    }

    pub fn join_room(&self, room_id: u32) {
        let result = self.inner.manager.borrow_mut().join_room(room_id);
        if let Err(e) = result {
            debug!(room_id, error = %e, "room join deferred");
        }
    }

    pub fn emit(&self, event: &ClientEvent) -> RealtimeResult<()> {
        self.inner.manager.borrow_mut().emit(event)
    }

    pub fn plan_send(&self) -> SendPlan {
        self.inner.manager.borrow().plan_send()
    }

    pub fn force_reconnect(&self) {
        self.cancel_retry();
        let result = self.inner.manager.borrow_mut().force_reconnect();
        match result {
            Ok(()) => {}
            Err(RealtimeError::NotConnected) => debug!("forced reconnect without session"),
            Err(e) => {
                warn!(error = %e, "forced reconnect failed");
                self.on_closed();
            }
        }
    }

    fn cancel_retry(&self) {
        self.inner.retry_generation.set(self.inner.retry_generation.get() + 1);
    }

    fn on_frame(&self, frame: &str) {
        let result = self.inner.manager.borrow_mut().handle_frame(frame);
        match result {
            Ok(events) => self.dispatch(&events),
            Err(e) => warn!(error = %e, "dropped socket frame"),
        }
    }

    fn on_closed(&self) {
        let step = self.inner.manager.borrow_mut().transport_closed();
        match step {
            ReconnectStep::Idle => {}
            ReconnectStep::RetryAfter(delay) => {
                let weak = Rc::downgrade(&self.inner);
                let generation = self.inner.retry_generation.get();
                Timeout::new(delay.as_millis() as u32, move || {
                    let Some(inner) = weak.upgrade() else { return };
                    if inner.retry_generation.get() == generation {
                        SocketHandle { inner }.retry();
                    }
                })
                .forget();
            }
            ReconnectStep::GiveUp => self.dispatch(&[SocketEvent::Failed]),
        }
    }

    fn retry(&self) {
        let result = self.inner.manager.borrow_mut().retry();
        if let Err(e) = result {
            warn!(error = %e, "reconnect attempt failed");
            self.on_closed();
        }
    }

    fn dispatch(&self, events: &[SocketEvent]) {
        if events.is_empty() {
            return;
        }
        let listeners: Vec<_> = self.inner.listeners.borrow().clone();
        for event in events {
            for listener in &listeners {
                listener(event);
            }
        }
    }
}
