//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag, and the pointer's
//! half of the hovered row to decide between inserting above or below it.

mod reorder;

pub use reorder::{reorder, DropPosition};

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Hovered row and which half of it the pointer is in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropTarget<K> {
    pub key: K,
    pub position: DropPosition,
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals<K: Copy + PartialEq + Send + Sync + 'static> {
    pub dragging_read: ReadSignal<Option<K>>,
    pub dragging_write: WriteSignal<Option<K>>,
    pub drop_target_read: ReadSignal<Option<DropTarget<K>>>,
    pub drop_target_write: WriteSignal<Option<DropTarget<K>>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending key (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<K>>,
    pub pending_write: WriteSignal<Option<K>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

pub fn create_dnd_signals<K: Copy + PartialEq + Send + Sync + 'static>() -> DndSignals<K> {
    let (dragging_read, dragging_write) = signal(None::<K>);
    let (drop_target_read, drop_target_write) = signal(None::<DropTarget<K>>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<K>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    DndSignals {
        dragging_read,
        dragging_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_read,
        pending_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
    }
}

impl<K: Copy + PartialEq + Send + Sync + 'static> DndSignals<K> {
    pub fn is_dragging(&self, key: K) -> bool {
        self.dragging_read.get() == Some(key)
    }

    /// Position indicator for a row, if it is the current drop target
    pub fn indicator(&self, key: K) -> Option<DropPosition> {
        self.drop_target_read
            .get()
            .filter(|target| target.key == key)
            .map(|target| target.position)
    }
}

/// End drag operation
pub fn end_drag<K: Copy + PartialEq + Send + Sync + 'static>(dnd: &DndSignals<K>) {
    dnd.dragging_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_write.set(None);
    dnd.drag_just_ended_write.set(true);

    // Swallow the click that follows mouseup
    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable rows
/// Records pending drag with start position
pub fn make_on_mousedown<K: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<K>,
    key: K,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() == 0 {
            // Ignore if target is input or button
            if let Some(target) = ev.target() {
                if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
                if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            }
            ev.stop_propagation();
            dnd.pending_write.set(Some(key));
            dnd.start_x_write.set(ev.client_x());
            dnd.start_y_write.set(ev.client_y());
        }
    }
}

/// Create mousemove handler for a row - tracks which half the pointer is in
pub fn make_on_row_mousemove<K: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<K>,
    key: K,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        let Some(dragging) = dnd.dragging_read.get_untracked() else { return };
        if dragging == key {
            return;
        }
        let Some(element) = ev.current_target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) else {
            return;
        };
        // Nested rows: the innermost one wins
        ev.stop_propagation();
        let rect = element.get_bounding_client_rect();
        let position = DropPosition::from_pointer(ev.client_y() as f64, rect.top(), rect.height());
        let target = Some(DropTarget { key, position });
        if dnd.drop_target_read.get_untracked() != target {
            dnd.drop_target_write.set(target);
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave<K: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<K>,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Create mousemove handler for document - starts drag if moved enough
fn bind_global_mousemove<K: Copy + PartialEq + Send + Sync + 'static>(dnd: DndSignals<K>) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        // Handlers outlive the component; skip once its signals are disposed
        let Some(pending) = dnd.pending_read.try_get_untracked() else { return };

        if pending.is_some() && dnd.dragging_read.get_untracked().is_none() {
            let dx = (ev.client_x() - dnd.start_x_read.get_untracked()).abs();
            let dy = (ev.client_y() - dnd.start_y_read.get_untracked()).abs();

            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                dnd.dragging_write.set(pending);
            }
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        }
    }
    on_mousemove.forget();
}

/// Bind global mouseup handler for drop detection
pub fn bind_global_mouseup<K, F>(dnd: DndSignals<K>, on_drop: F)
where
    K: Copy + PartialEq + Send + Sync + 'static,
    F: Fn(K, DropTarget<K>) + Clone + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let Some(dragging) = dnd.dragging_read.try_get_untracked() else { return };
        let drop_target = dnd.drop_target_read.get_untracked();

        dnd.pending_write.set(None);

        // Only a real drag produces a drop; a plain click falls through
        if let (Some(dragged), Some(target)) = (dragging, drop_target) {
            end_drag(&dnd);
            on_drop(dragged, target);
        } else {
            end_drag(&dnd);
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}
