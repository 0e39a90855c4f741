#![forbid(unsafe_code)]

//! Window manager: the collection of live panels inside one container.
//!
//! The manager owns the content constructor registry, the stacking order,
//! selection, and the routing of host pointer signals to the single panel
//! that holds the open gesture session. Signals after pointer-down are routed
//! by session, not by hit target, so a drag keeps tracking once the pointer
//! leaves its panel.
//!
//! Every notification is published on the manager's [`EventChannel`] as a
//! [`ManagerEvent`]. Gesture notifications are additionally published on the
//! owning panel's channel.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut wm = WindowManager::new(container, schema, WindowManagerOptions::default())?;
//! wm.register_constructor("notes", |panel| render_notes(panel.id()))?;
//! wm.init()?;
//! wm.pointer_down(id, HitTarget::Header, 1, PointerButton::Primary, point)?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use panelwm_core::{ContainerRect, EventChannel, PixelPoint, Subscription};
use panelwm_layout::{ResizeEdge, SnapZone, StackChange, StackOrder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ResolvedOptions, WindowManagerOptions};
use crate::error::WmError;
use crate::gesture::{
    CaptureCommand, GestureContext, GestureDispatch, GestureEffect, GestureIgnoredReason,
    PointerButton,
};
use crate::panel::{
    ContentCtor, ExpandToggle, Panel, PanelEvent, PanelHandle, PanelId, PanelSchema,
};

/// Part of a panel hit by a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// Content area: selects only.
    Body,
    /// Title strip: selects and starts a drag.
    Header,
    /// Edge or corner handle: selects and starts a resize.
    Resizer(ResizeEdge),
}

/// Notification published on the manager channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManagerEvent {
    Closed { id: PanelId },
    Selected { id: PanelId },
    Unselected { id: PanelId },
    Panel { id: PanelId, event: PanelEvent },
}

/// Outcome of closing a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedPanel {
    pub id: PanelId,
    /// Capture release for a session the close interrupted.
    pub release: Option<CaptureCommand>,
}

/// Collection of panels sharing one container.
pub struct WindowManager {
    container: ContainerRect,
    options: ResolvedOptions,
    schema: Vec<PanelSchema>,
    constructors: BTreeMap<String, ContentCtor>,
    panels: BTreeMap<PanelId, Panel>,
    stack: StackOrder<PanelId>,
    next_id: PanelId,
    selected: Option<PanelId>,
    active: Option<PanelId>,
    snap_preview: Option<SnapZone>,
    events: EventChannel<ManagerEvent>,
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowManager")
            .field("container", &self.container)
            .field("options", &self.options)
            .field("constructors", &self.constructors.keys().collect::<Vec<_>>())
            .field("stack", &self.stack)
            .field("selected", &self.selected)
            .field("active", &self.active)
            .field("snap_preview", &self.snap_preview)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    /// Create an empty manager for `container`.
    ///
    /// `schema` is kept for [`init`](Self::init). Fails on a degenerate
    /// container or invalid options.
    pub fn new(
        container: ContainerRect,
        schema: Vec<PanelSchema>,
        options: WindowManagerOptions,
    ) -> Result<Self, WmError> {
        check_container(container)?;
        let options = options.resolve()?;
        Ok(Self {
            container,
            options,
            schema,
            constructors: BTreeMap::new(),
            panels: BTreeMap::new(),
            stack: StackOrder::new(),
            next_id: PanelId::MIN,
            selected: None,
            active: None,
            snap_preview: None,
            events: EventChannel::new(),
        })
    }

    /// Register the content constructor for panels named `name`.
    pub fn register_constructor(
        &mut self,
        name: impl Into<String>,
        ctor: impl Fn(&PanelHandle<'_>) + 'static,
    ) -> Result<(), WmError> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(WmError::DuplicateConstructor { name });
        }
        debug!(name = %name, "wm: constructor registered");
        self.constructors.insert(name, Rc::new(ctor));
        Ok(())
    }

    #[must_use]
    pub fn has_constructor(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Build every panel of the initial schema, bottom to top.
    ///
    /// All constructor names are checked before any panel is created.
    pub fn init(&mut self) -> Result<Vec<PanelId>, WmError> {
        if let Some(missing) = self
            .schema
            .iter()
            .find(|schema| self.resolve_ctor(schema).is_none())
        {
            return Err(WmError::MissingConstructor {
                name: missing.name.clone(),
            });
        }
        let schema = self.schema.clone();
        schema
            .into_iter()
            .map(|panel| self.add_window(panel))
            .collect()
    }

    /// Create a panel on top of the stack and run its content constructor.
    ///
    /// A constructor carried by the schema wins over the registry entry for
    /// its name.
    pub fn add_window(&mut self, schema: PanelSchema) -> Result<PanelId, WmError> {
        let Some(ctor) = self.resolve_ctor(&schema) else {
            return Err(WmError::MissingConstructor { name: schema.name });
        };
        let id = self.next_id;
        self.next_id = id.checked_next()?;

        let stack_order = self.stack.push(id);
        let panel = Panel::new(id, schema, stack_order);
        debug!(panel = id.get(), name = %panel.name(), stack_order, "wm: panel added");
        ctor(&panel.handle());
        self.panels.insert(id, panel);
        Ok(id)
    }

    /// Remove a panel, canceling its open session first.
    ///
    /// Returns `None` for unknown ids. The closable flag only governs the
    /// host's close button; programmatic closes always proceed.
    pub fn close_window(&mut self, id: PanelId) -> Option<ClosedPanel> {
        let ctx = self.gesture_context();
        let mut panel = self.panels.remove(&id)?;
        let canceled = panel.force_cancel(&ctx);
        if let Some(dispatch) = &canceled {
            self.publish(id, dispatch);
        }
        if self.active == Some(id) {
            self.end_session();
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.stack.remove(id);
        self.sync_stack_order();
        drop(panel);

        debug!(panel = id.get(), "wm: panel closed");
        self.events.emit(&ManagerEvent::Closed { id });
        Some(ClosedPanel {
            id,
            release: canceled.and_then(|dispatch| dispatch.capture_command),
        })
    }

    /// Raise a panel to the top and select it.
    ///
    /// `Selected` is emitted even when the panel was already on top.
    pub fn bring_to_front(&mut self, id: PanelId) -> Result<StackChange, WmError> {
        self.require(id)?;
        let change = self.stack.bring_to_front(id);
        self.sync_stack_order();
        self.select(id);
        Ok(change)
    }

    /// Lower a panel to the bottom and select it.
    pub fn send_to_back(&mut self, id: PanelId) -> Result<StackChange, WmError> {
        self.require(id)?;
        let change = self.stack.send_to_back(id);
        self.sync_stack_order();
        self.select(id);
        Ok(change)
    }

    /// Route a host pointer-down on `id`.
    ///
    /// A press of any button selects the panel. Header and resizer hits then
    /// try to open a session, which only the primary button does; body hits
    /// return `None`. While any panel holds a session, presses are ignored
    /// with `SessionAlreadyOpen` and nothing is selected.
    pub fn pointer_down(
        &mut self,
        id: PanelId,
        hit: HitTarget,
        pointer_id: u32,
        button: PointerButton,
        position: PixelPoint,
    ) -> Result<Option<GestureDispatch>, WmError> {
        let bounds = self.require(id)?.bounds();
        if let Some(active) = self.active {
            warn!(
                panel = id.get(),
                active_panel = active.get(),
                pointer_id,
                "wm: pointer down while a session is open"
            );
            return Ok(Some(GestureDispatch::ignored(
                GestureIgnoredReason::SessionAlreadyOpen,
                bounds,
            )));
        }
        self.bring_to_front(id)?;

        let Some(panel) = self.panels.get_mut(&id) else {
            return Err(WmError::UnknownPanel { id });
        };
        let dispatch = match hit {
            HitTarget::Body => return Ok(None),
            HitTarget::Header => panel.begin_drag(pointer_id, button, position),
            HitTarget::Resizer(edge) => panel.begin_resize(edge, pointer_id, button, position),
        };
        let opened = panel.gesture().is_active();
        self.publish(id, &dispatch);
        if opened {
            self.active = Some(id);
        }
        Ok(Some(dispatch))
    }

    /// Route a pointer move to the session owner. `None` when idle.
    pub fn pointer_move(&mut self, pointer_id: u32, position: PixelPoint) -> Option<GestureDispatch> {
        let ctx = self.gesture_context();
        self.route(|panel| panel.pointer_move(pointer_id, position, &ctx))
    }

    /// Route a pointer release to the session owner. `None` when idle.
    pub fn pointer_up(&mut self, pointer_id: u32, button: PointerButton) -> Option<GestureDispatch> {
        let ctx = self.gesture_context();
        self.route(|panel| panel.pointer_up(pointer_id, button, &ctx))
    }

    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> Option<GestureDispatch> {
        let ctx = self.gesture_context();
        self.route(|panel| panel.pointer_cancel(pointer_id, &ctx))
    }

    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> Option<GestureDispatch> {
        let ctx = self.gesture_context();
        self.route(|panel| panel.lost_pointer_capture(pointer_id, &ctx))
    }

    /// Host window lost focus.
    pub fn blur(&mut self) -> Option<GestureDispatch> {
        let ctx = self.gesture_context();
        self.route(|panel| panel.blur(&ctx))
    }

    /// Flip expanded mode on `id`.
    pub fn toggle_expand(&mut self, id: PanelId) -> Result<ExpandToggle, WmError> {
        let ctx = self.gesture_context();
        let Some(panel) = self.panels.get_mut(&id) else {
            return Err(WmError::UnknownPanel { id });
        };
        let toggle = panel.toggle_expand(&ctx)?;
        if let Some(dispatch) = &toggle.canceled {
            self.publish(id, dispatch);
            self.end_session();
        }
        self.events.emit(&ManagerEvent::Panel {
            id,
            event: PanelEvent::Expanded {
                is_maximized: toggle.is_maximized,
            },
        });
        Ok(toggle)
    }

    /// Replace the container rectangle used by subsequent gestures.
    pub fn set_container(&mut self, container: ContainerRect) -> Result<(), WmError> {
        check_container(container)?;
        debug!(
            width = container.width,
            height = container.height,
            "wm: container updated"
        );
        self.container = container;
        Ok(())
    }

    /// Live panels bottom to top, as schemas.
    #[must_use]
    pub fn to_schema(&self) -> Vec<PanelSchema> {
        self.panels().map(Panel::to_schema).collect()
    }

    /// [`to_schema`](Self::to_schema) rendered as JSON.
    pub fn to_json(&self) -> Result<String, WmError> {
        serde_json::to_string(&self.to_schema()).map_err(WmError::Serialize)
    }

    /// Close every panel and drop manager listeners and constructors.
    pub fn destroy(&mut self) -> Vec<ClosedPanel> {
        let ids: Vec<PanelId> = self.stack.iter().collect();
        let closed = ids
            .into_iter()
            .filter_map(|id| self.close_window(id))
            .collect();
        self.events.clear();
        self.constructors.clear();
        debug!("wm: destroyed");
        closed
    }

    /// Listen to manager notifications.
    pub fn subscribe(&self, listener: impl Fn(&ManagerEvent) + 'static) -> Subscription {
        self.events.subscribe(listener)
    }

    #[must_use]
    pub const fn events(&self) -> &EventChannel<ManagerEvent> {
        &self.events
    }

    #[must_use]
    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(&id)
    }

    /// Live panels bottom to top.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> + '_ {
        self.stack.iter().filter_map(|id| self.panels.get(&id))
    }

    #[must_use]
    pub fn stack(&self) -> &[PanelId] {
        self.stack.as_slice()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    #[must_use]
    pub const fn selected(&self) -> Option<PanelId> {
        self.selected
    }

    /// Panel holding the open gesture session.
    #[must_use]
    pub const fn active_panel(&self) -> Option<PanelId> {
        self.active
    }

    /// Snap zone the current drag would commit to on release.
    #[must_use]
    pub const fn snap_preview(&self) -> Option<SnapZone> {
        self.snap_preview
    }

    #[must_use]
    pub const fn container(&self) -> ContainerRect {
        self.container
    }

    #[must_use]
    pub const fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    #[must_use]
    pub const fn gesture_context(&self) -> GestureContext {
        self.options.gesture_context(self.container)
    }

    fn resolve_ctor(&self, schema: &PanelSchema) -> Option<ContentCtor> {
        match &schema.ctor {
            Some(own) => Some(own.ctor()),
            None => self.constructors.get(&schema.name).map(Rc::clone),
        }
    }

    fn require(&self, id: PanelId) -> Result<&Panel, WmError> {
        self.panels.get(&id).ok_or(WmError::UnknownPanel { id })
    }

    fn select(&mut self, id: PanelId) {
        if let Some(previous) = self.selected
            && previous != id
        {
            self.events.emit(&ManagerEvent::Unselected { id: previous });
        }
        self.selected = Some(id);
        debug!(panel = id.get(), "wm: panel selected");
        self.events.emit(&ManagerEvent::Selected { id });
    }

    fn route(
        &mut self,
        step: impl FnOnce(&mut Panel) -> GestureDispatch,
    ) -> Option<GestureDispatch> {
        let id = self.active?;
        let Some(panel) = self.panels.get_mut(&id) else {
            self.end_session();
            return None;
        };
        let dispatch = step(panel);
        let still_open = panel.gesture().is_active();
        self.publish(id, &dispatch);
        if still_open {
            if let GestureEffect::DragMoved { snap, .. } = dispatch.effect {
                self.snap_preview = snap;
            }
        } else {
            self.end_session();
        }
        Some(dispatch)
    }

    fn end_session(&mut self) {
        self.active = None;
        self.snap_preview = None;
    }

    fn publish(&self, id: PanelId, dispatch: &GestureDispatch) {
        if let Some(event) = PanelEvent::from_dispatch(dispatch) {
            self.events.emit(&ManagerEvent::Panel { id, event });
        }
    }

    fn sync_stack_order(&mut self) {
        for (id, ordinal) in self.stack.ordinals() {
            if let Some(panel) = self.panels.get_mut(&id) {
                panel.set_stack_order(ordinal);
            }
        }
    }
}

fn check_container(container: ContainerRect) -> Result<(), WmError> {
    if container.size().is_degenerate() {
        return Err(WmError::InvalidContainer {
            width: container.width,
            height: container.height,
        });
    }
    Ok(())
}
