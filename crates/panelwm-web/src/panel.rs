#![forbid(unsafe_code)]

//! One managed panel: committed bounds, flags, stack ordinal, and its gesture
//! machine.
//!
//! A panel publishes [`PanelEvent`]s on its own [`EventChannel`]. Content
//! created for the panel subscribes through the [`PanelHandle`] passed to its
//! constructor; those subscriptions live exactly as long as the panel.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use panelwm_core::{Bounds, EventChannel, PixelPoint, Subscription};
use panelwm_layout::{PresetBound, ResizeEdge, SnapZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DEFAULT_IS_CLOSABLE, DEFAULT_IS_EXPANDABLE};
use crate::error::{PanelIdError, WmError};
use crate::gesture::{
    CancelReason, GestureContext, GestureDispatch, GestureEffect, GestureKind, GestureMachine,
    PointerButton,
};

/// Stable identifier for a panel within one manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(u64);

impl PanelId {
    /// Lowest valid panel ID.
    pub const MIN: Self = Self(1);

    /// Create a new panel ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, PanelIdError> {
        if raw == 0 {
            return Err(PanelIdError::Zero);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, PanelIdError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(PanelIdError::Overflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content constructor invoked once per created panel.
pub type ContentCtor = Rc<dyn Fn(&PanelHandle<'_>)>;

/// Constructor carried by a schema, taking precedence over the registry.
///
/// Compares by identity.
#[derive(Clone)]
pub struct SchemaCtor(ContentCtor);

impl SchemaCtor {
    pub fn new(ctor: impl Fn(&PanelHandle<'_>) + 'static) -> Self {
        Self(Rc::new(ctor))
    }

    #[must_use]
    pub fn ctor(&self) -> ContentCtor {
        Rc::clone(&self.0)
    }
}

impl From<ContentCtor> for SchemaCtor {
    fn from(ctor: ContentCtor) -> Self {
        Self(ctor)
    }
}

impl PartialEq for SchemaCtor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SchemaCtor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SchemaCtor(..)")
    }
}

/// Initial description of a panel.
///
/// `width`, `height` and `position` are container percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSchema {
    pub title: String,
    /// Content constructor name.
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// `[left, top]`.
    pub position: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_closable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expandable: Option<bool>,
    /// Opaque host data handed to the content constructor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Value>,
    /// Own content constructor. Never serialized.
    #[serde(skip)]
    pub ctor: Option<SchemaCtor>,
}

impl PanelSchema {
    pub fn new(title: impl Into<String>, name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            width: bounds.width,
            height: bounds.height,
            position: [bounds.left, bounds.top],
            is_closable: None,
            is_expandable: None,
            props: None,
            ctor: None,
        }
    }

    #[must_use]
    pub fn closable(mut self, closable: bool) -> Self {
        self.is_closable = Some(closable);
        self
    }

    #[must_use]
    pub fn expandable(mut self, expandable: bool) -> Self {
        self.is_expandable = Some(expandable);
        self
    }

    #[must_use]
    pub fn with_props(mut self, props: serde_json::Value) -> Self {
        self.props = Some(props);
        self
    }

    /// Attach a constructor used instead of the one registered for `name`.
    #[must_use]
    pub fn with_ctor(mut self, ctor: impl Fn(&PanelHandle<'_>) + 'static) -> Self {
        self.ctor = Some(SchemaCtor::new(ctor));
        self
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height, self.position[0], self.position[1])
    }
}

/// Notification published on a panel's channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PanelEvent {
    DragStarted,
    Dragged {
        bounds: Bounds,
        snap: Option<SnapZone>,
        applied: bool,
    },
    DragEnded {
        bounds: Bounds,
        snapped: Option<PresetBound>,
    },
    ResizeStarted {
        edge: ResizeEdge,
    },
    Resized {
        edge: ResizeEdge,
        bounds: Bounds,
        applied: bool,
    },
    ResizeEnded {
        edge: ResizeEdge,
        bounds: Bounds,
    },
    GestureCanceled {
        kind: GestureKind,
        reason: CancelReason,
        bounds: Bounds,
    },
    Expanded {
        is_maximized: bool,
    },
}

impl PanelEvent {
    /// Event for a gesture dispatch, `None` for ignored dispatches.
    #[must_use]
    pub fn from_dispatch(dispatch: &GestureDispatch) -> Option<Self> {
        let bounds = dispatch.bounds;
        let event = match dispatch.effect {
            GestureEffect::DragStarted { .. } => Self::DragStarted,
            GestureEffect::DragMoved { snap, .. } => Self::Dragged {
                bounds,
                snap,
                applied: dispatch.applied,
            },
            GestureEffect::DragEnded { snapped, .. } => Self::DragEnded { bounds, snapped },
            GestureEffect::ResizeStarted { edge, .. } => Self::ResizeStarted { edge },
            GestureEffect::ResizeMoved { edge, .. } => Self::Resized {
                edge,
                bounds,
                applied: dispatch.applied,
            },
            GestureEffect::ResizeEnded { edge, .. } => Self::ResizeEnded { edge, bounds },
            GestureEffect::Canceled { kind, reason, .. } => Self::GestureCanceled {
                kind,
                reason,
                bounds,
            },
            GestureEffect::Ignored { .. } => return None,
        };
        Some(event)
    }
}

/// Borrowed view of a panel handed to content constructors.
pub struct PanelHandle<'a> {
    id: PanelId,
    schema: &'a PanelSchema,
    events: &'a EventChannel<PanelEvent>,
    retained: &'a RefCell<Vec<Subscription>>,
}

impl PanelHandle<'_> {
    #[must_use]
    pub const fn id(&self) -> PanelId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.schema.title
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    #[must_use]
    pub fn schema(&self) -> &PanelSchema {
        self.schema
    }

    #[must_use]
    pub fn props(&self) -> Option<&serde_json::Value> {
        self.schema.props.as_ref()
    }

    /// Listen to this panel's events for as long as the panel lives.
    pub fn subscribe(&self, listener: impl Fn(&PanelEvent) + 'static) {
        let subscription = self.events.subscribe(listener);
        self.retained.borrow_mut().push(subscription);
    }
}

impl fmt::Debug for PanelHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelHandle")
            .field("id", &self.id)
            .field("name", &self.schema.name)
            .finish_non_exhaustive()
    }
}

/// A live panel.
#[derive(Debug)]
pub struct Panel {
    id: PanelId,
    schema: PanelSchema,
    bounds: Bounds,
    is_closable: bool,
    is_expandable: bool,
    expanded: bool,
    stack_order: usize,
    gesture: GestureMachine,
    events: EventChannel<PanelEvent>,
    content_subscriptions: RefCell<Vec<Subscription>>,
}

impl Panel {
    /// Build a panel from its schema. Flags left unset take the defaults.
    #[must_use]
    pub fn new(id: PanelId, schema: PanelSchema, stack_order: usize) -> Self {
        Self {
            id,
            bounds: schema.bounds(),
            is_closable: schema.is_closable.unwrap_or(DEFAULT_IS_CLOSABLE),
            is_expandable: schema.is_expandable.unwrap_or(DEFAULT_IS_EXPANDABLE),
            expanded: false,
            stack_order,
            gesture: GestureMachine::new(id),
            events: EventChannel::new(),
            content_subscriptions: RefCell::new(Vec::new()),
            schema,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PanelId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.schema.title
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Schema the panel was created from.
    #[must_use]
    pub const fn schema(&self) -> &PanelSchema {
        &self.schema
    }

    /// Stored bounds. Preserved while expanded.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Bounds the host should render: the maximized preset while expanded.
    #[must_use]
    pub const fn rendered_bounds(&self) -> Bounds {
        if self.expanded {
            PresetBound::Maximized.bounds()
        } else {
            self.bounds
        }
    }

    #[must_use]
    pub const fn is_closable(&self) -> bool {
        self.is_closable
    }

    #[must_use]
    pub const fn is_expandable(&self) -> bool {
        self.is_expandable
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Paint-order ordinal (0 = bottom).
    #[must_use]
    pub const fn stack_order(&self) -> usize {
        self.stack_order
    }

    /// CSS-style z-index derived from the stack ordinal.
    #[must_use]
    pub const fn z_index(&self) -> usize {
        self.stack_order + 1
    }

    pub(crate) fn set_stack_order(&mut self, stack_order: usize) {
        self.stack_order = stack_order;
    }

    #[must_use]
    pub const fn gesture(&self) -> &GestureMachine {
        &self.gesture
    }

    /// This panel's event channel.
    #[must_use]
    pub const fn events(&self) -> &EventChannel<PanelEvent> {
        &self.events
    }

    #[must_use]
    pub fn handle(&self) -> PanelHandle<'_> {
        PanelHandle {
            id: self.id,
            schema: &self.schema,
            events: &self.events,
            retained: &self.content_subscriptions,
        }
    }

    /// Current state as a schema, positions taken from the stored bounds.
    #[must_use]
    pub fn to_schema(&self) -> PanelSchema {
        PanelSchema {
            width: self.bounds.width,
            height: self.bounds.height,
            position: [self.bounds.left, self.bounds.top],
            is_closable: Some(self.is_closable),
            is_expandable: Some(self.is_expandable),
            ..self.schema.clone()
        }
    }

    pub fn begin_drag(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        position: PixelPoint,
    ) -> GestureDispatch {
        let dispatch = self.gesture.begin_drag(pointer_id, button, position, &self.bounds);
        self.publish(&dispatch);
        dispatch
    }

    pub fn begin_resize(
        &mut self,
        edge: ResizeEdge,
        pointer_id: u32,
        button: PointerButton,
        position: PixelPoint,
    ) -> GestureDispatch {
        let dispatch = self
            .gesture
            .begin_resize(edge, pointer_id, button, position, &self.bounds);
        self.publish(&dispatch);
        dispatch
    }

    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        position: PixelPoint,
        ctx: &GestureContext,
    ) -> GestureDispatch {
        let dispatch = self
            .gesture
            .pointer_move(pointer_id, position, &mut self.bounds, ctx);
        self.publish(&dispatch);
        dispatch
    }

    pub fn pointer_up(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        ctx: &GestureContext,
    ) -> GestureDispatch {
        let dispatch = self
            .gesture
            .pointer_up(pointer_id, button, &mut self.bounds, ctx);
        self.publish(&dispatch);
        dispatch
    }

    pub fn pointer_cancel(
        &mut self,
        pointer_id: Option<u32>,
        ctx: &GestureContext,
    ) -> GestureDispatch {
        let dispatch = self
            .gesture
            .pointer_cancel(pointer_id, &mut self.bounds, ctx);
        self.publish(&dispatch);
        dispatch
    }

    pub fn lost_pointer_capture(&mut self, pointer_id: u32, ctx: &GestureContext) -> GestureDispatch {
        let dispatch = self
            .gesture
            .lost_pointer_capture(pointer_id, &mut self.bounds, ctx);
        self.publish(&dispatch);
        dispatch
    }

    pub fn blur(&mut self, ctx: &GestureContext) -> GestureDispatch {
        let dispatch = self.gesture.blur(&mut self.bounds, ctx);
        self.publish(&dispatch);
        dispatch
    }

    /// Cancel an open session from a teardown path. `None` when idle.
    pub fn force_cancel(&mut self, ctx: &GestureContext) -> Option<GestureDispatch> {
        let dispatch = self.gesture.force_cancel(&mut self.bounds, ctx)?;
        self.publish(&dispatch);
        Some(dispatch)
    }

    /// Flip expanded mode.
    ///
    /// An open session is canceled first and its dispatch returned so the
    /// caller can forward the capture release.
    pub fn toggle_expand(&mut self, ctx: &GestureContext) -> Result<ExpandToggle, WmError> {
        if !self.is_expandable {
            return Err(WmError::NotExpandable { id: self.id });
        }
        let canceled = self.force_cancel(ctx);
        self.expanded = !self.expanded;
        self.gesture.set_available(!self.expanded);
        debug!(panel = self.id.get(), expanded = self.expanded, "panel: expand toggled");
        self.events.emit(&PanelEvent::Expanded {
            is_maximized: self.expanded,
        });
        Ok(ExpandToggle {
            is_maximized: self.expanded,
            canceled,
        })
    }

    fn publish(&self, dispatch: &GestureDispatch) {
        if let Some(event) = PanelEvent::from_dispatch(dispatch) {
            self.events.emit(&event);
        }
    }
}

/// Outcome of [`Panel::toggle_expand`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandToggle {
    pub is_maximized: bool,
    /// Session canceled by the toggle, if one was open.
    pub canceled: Option<GestureDispatch>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedOptions;
    use panelwm_core::ContainerRect;
    use std::rc::Rc;

    fn ctx() -> GestureContext {
        ResolvedOptions::default().gesture_context(ContainerRect::from_size(1000.0, 800.0))
    }

    fn schema() -> PanelSchema {
        PanelSchema::new("Notes", "notes", Bounds::new(30.0, 25.0, 20.0, 18.75))
    }

    #[test]
    fn panel_id_rejects_zero_and_overflow() {
        assert_eq!(PanelId::new(0), Err(PanelIdError::Zero));
        assert_eq!(PanelId::MIN.checked_next().map(PanelId::get), Ok(2));
        let max = PanelId::new(u64::MAX).expect("non-zero");
        assert_eq!(
            max.checked_next(),
            Err(PanelIdError::Overflow { current: max })
        );
    }

    #[test]
    fn schema_flags_default_when_unset() {
        let panel = Panel::new(PanelId::MIN, schema(), 0);
        assert!(panel.is_closable());
        assert!(panel.is_expandable());
        assert_eq!(panel.z_index(), 1);

        let locked = Panel::new(PanelId::MIN, schema().closable(false).expandable(false), 3);
        assert!(!locked.is_closable());
        assert!(!locked.is_expandable());
        assert_eq!(locked.z_index(), 4);
    }

    #[test]
    fn schema_json_uses_camel_case_and_skips_unset() {
        let json = serde_json::to_value(schema().closable(false)).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Notes",
                "name": "notes",
                "width": 30.0,
                "height": 25.0,
                "position": [20.0, 18.75],
                "isClosable": false,
            })
        );
        let back: PanelSchema = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back.is_expandable, None);
    }

    #[test]
    fn own_constructor_is_kept_but_never_serialized() {
        let with_ctor = schema().with_ctor(|_| {});
        let json = serde_json::to_value(&with_ctor).expect("serialize");
        assert_eq!(json, serde_json::to_value(schema()).expect("serialize"));

        let panel = Panel::new(PanelId::MIN, with_ctor.clone(), 0);
        assert_eq!(panel.to_schema().ctor, with_ctor.ctor);
        let back: PanelSchema = serde_json::from_value(json).expect("deserialize");
        assert!(back.ctor.is_none());
    }

    #[test]
    fn gesture_dispatches_are_published() {
        let mut panel = Panel::new(PanelId::MIN, schema(), 0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            panel.events().subscribe(move |e| seen.borrow_mut().push(*e))
        };

        panel.begin_drag(1, PointerButton::Primary, PixelPoint::new(300.0, 160.0));
        panel.pointer_move(1, PixelPoint::new(350.0, 190.0), &ctx());
        panel.pointer_move(2, PixelPoint::new(0.0, 0.0), &ctx());
        panel.pointer_up(1, PointerButton::Primary, &ctx());

        let moved = Bounds::new(30.0, 25.0, 25.0, 22.5);
        assert_eq!(
            *seen.borrow(),
            vec![
                PanelEvent::DragStarted,
                PanelEvent::Dragged {
                    bounds: moved,
                    snap: None,
                    applied: true
                },
                PanelEvent::DragEnded {
                    bounds: moved,
                    snapped: None
                },
            ]
        );
        assert_eq!(panel.bounds(), moved);
    }

    #[test]
    fn expand_renders_maximized_and_preserves_stored_bounds() {
        let mut panel = Panel::new(PanelId::MIN, schema(), 0);
        let stored = panel.bounds();

        let toggle = panel.toggle_expand(&ctx()).expect("expandable");
        assert!(toggle.is_maximized);
        assert_eq!(toggle.canceled, None);
        assert_eq!(panel.rendered_bounds(), PresetBound::Maximized.bounds());
        assert_eq!(panel.bounds(), stored);

        let blocked = panel.begin_drag(1, PointerButton::Primary, PixelPoint::new(0.0, 0.0));
        assert!(blocked.is_ignored());

        let toggle = panel.toggle_expand(&ctx()).expect("expandable");
        assert!(!toggle.is_maximized);
        assert_eq!(panel.rendered_bounds(), stored);
        assert!(
            !panel
                .begin_drag(1, PointerButton::Primary, PixelPoint::new(0.0, 0.0))
                .is_ignored()
        );
    }

    #[test]
    fn expand_cancels_open_session() {
        let mut panel = Panel::new(PanelId::MIN, schema(), 0);
        panel.begin_resize(ResizeEdge::Left, 9, PointerButton::Primary, PixelPoint::new(0.0, 0.0));
        let toggle = panel.toggle_expand(&ctx()).expect("expandable");
        let canceled = toggle.canceled.expect("session was open");
        assert!(matches!(
            canceled.effect,
            GestureEffect::Canceled {
                reason: CancelReason::Programmatic,
                ..
            }
        ));
        assert!(!panel.gesture().is_active());
    }

    #[test]
    fn non_expandable_panel_refuses_toggle() {
        let mut panel = Panel::new(PanelId::MIN, schema().expandable(false), 0);
        let err = panel.toggle_expand(&ctx()).unwrap_err();
        assert!(matches!(err, WmError::NotExpandable { .. }));
        assert!(!panel.is_expanded());
    }

    #[test]
    fn handle_subscriptions_live_with_the_panel() {
        let panel = Panel::new(PanelId::MIN, schema().with_props(serde_json::json!({"n": 1})), 0);
        let handle = panel.handle();
        assert_eq!(handle.title(), "Notes");
        assert_eq!(handle.props(), Some(&serde_json::json!({"n": 1})));
        handle.subscribe(|_| {});
        assert_eq!(panel.events().listener_count(), 1);

        let to_schema = panel.to_schema();
        assert_eq!(to_schema.is_closable, Some(true));
        assert_eq!(to_schema.position, [20.0, 18.75]);
    }
}
