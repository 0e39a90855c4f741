#![forbid(unsafe_code)]

//! End-to-end window manager scenarios driven the way a host page would:
//! pointer signals in, capture commands and notifications out.

use std::cell::RefCell;
use std::rc::Rc;

use panelwm_core::{Bounds, ContainerRect, PixelPoint};
use panelwm_layout::{PresetBound, ResizeEdge, SnapZone};
use panelwm_web::{
    CancelReason, CaptureCommand, GestureKind, HitTarget, ManagerEvent, PanelEvent, PanelId,
    PanelSchema, PointerButton, WindowManager, WindowManagerOptions,
};
use pretty_assertions::assert_eq;

fn container() -> ContainerRect {
    ContainerRect::from_size(1000.0, 800.0)
}

fn pt(x: f64, y: f64) -> PixelPoint {
    PixelPoint::new(x, y)
}

fn id(raw: u64) -> PanelId {
    PanelId::new(raw).expect("non-zero")
}

fn desktop() -> WindowManager {
    let schema = vec![
        PanelSchema::new("Inbox", "list", Bounds::new(30.0, 25.0, 20.0, 18.75)),
        PanelSchema::new("Chart", "chart", Bounds::new(40.0, 50.0, 50.0, 10.0)).closable(false),
        PanelSchema::new("Log", "list", Bounds::new(25.0, 30.0, 5.0, 60.0)).expandable(false),
    ];
    let mut wm = WindowManager::new(container(), schema, WindowManagerOptions::default())
        .expect("valid container");
    wm.register_constructor("list", |_| {}).expect("register list");
    wm.register_constructor("chart", |_| {}).expect("register chart");
    wm.init().expect("init");
    wm
}

fn recorder(wm: &WindowManager) -> (Rc<RefCell<Vec<ManagerEvent>>>, panelwm_core::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sub = {
        let seen = Rc::clone(&seen);
        wm.subscribe(move |event| seen.borrow_mut().push(*event))
    };
    (seen, sub)
}

#[test]
fn drag_scenario_reports_start_move_end() {
    let mut wm = desktop();
    let (seen, _sub) = recorder(&wm);

    wm.pointer_down(id(1), HitTarget::Header, 1, PointerButton::Primary, pt(300.0, 160.0))
        .expect("live panel");
    wm.pointer_move(1, pt(350.0, 190.0));
    wm.pointer_up(1, PointerButton::Primary);

    let moved = Bounds::new(30.0, 25.0, 25.0, 22.5);
    assert_eq!(
        *seen.borrow(),
        vec![
            ManagerEvent::Selected { id: id(1) },
            ManagerEvent::Panel {
                id: id(1),
                event: PanelEvent::DragStarted,
            },
            ManagerEvent::Panel {
                id: id(1),
                event: PanelEvent::Dragged {
                    bounds: moved,
                    snap: None,
                    applied: true,
                },
            },
            ManagerEvent::Panel {
                id: id(1),
                event: PanelEvent::DragEnded {
                    bounds: moved,
                    snapped: None,
                },
            },
        ]
    );
    assert_eq!(wm.stack(), &[id(2), id(3), id(1)]);
}

#[test]
fn drag_above_top_edge_holds_last_valid_frame() {
    let mut wm = desktop();
    wm.pointer_down(id(1), HitTarget::Header, 1, PointerButton::Primary, pt(300.0, 160.0))
        .expect("live panel");
    let above = wm.pointer_move(1, pt(300.0, 5.0)).expect("routed");
    assert!(!above.applied);
    assert_eq!(above.bounds, Bounds::new(30.0, 25.0, 20.0, 18.75));

    // Deltas stay relative to the last pointer position.
    let next = wm.pointer_move(1, pt(300.0, 15.0)).expect("routed");
    assert!(next.applied);
    assert_eq!(next.bounds.top, 20.0);
}

#[test]
fn snap_to_top_right_quadrant_on_release() {
    let mut wm = desktop();
    let (seen, _sub) = recorder(&wm);

    wm.pointer_down(id(2), HitTarget::Header, 3, PointerButton::Primary, pt(600.0, 90.0))
        .expect("live panel");
    wm.pointer_move(3, pt(995.0, 400.0));
    assert_eq!(wm.snap_preview(), Some(SnapZone::Right));
    wm.pointer_move(3, pt(995.0, 85.0));
    wm.pointer_move(3, pt(995.0, 6.0));
    assert_eq!(wm.snap_preview(), Some(SnapZone::TopRight));

    let up = wm.pointer_up(3, PointerButton::Primary).expect("routed");
    assert_eq!(up.capture_command, Some(CaptureCommand::Release { pointer_id: 3 }));
    assert_eq!(up.bounds, PresetBound::TopRight.bounds());
    assert_eq!(wm.snap_preview(), None);
    assert_eq!(
        seen.borrow().last(),
        Some(&ManagerEvent::Panel {
            id: id(2),
            event: PanelEvent::DragEnded {
                bounds: PresetBound::TopRight.bounds(),
                snapped: Some(PresetBound::TopRight),
            },
        })
    );
}

#[test]
fn bottom_right_resize_scenario() {
    let mut wm = desktop();
    wm.pointer_down(
        id(1),
        HitTarget::Resizer(ResizeEdge::BottomRight),
        5,
        PointerButton::Primary,
        pt(500.0, 350.0),
    )
    .expect("live panel")
    .expect("resizer opens a session");
    let moved = wm.pointer_move(5, pt(600.0, 400.0)).expect("routed");
    assert!(moved.applied);
    assert_eq!(moved.bounds, Bounds::new(40.0, 31.25, 20.0, 18.75));
    wm.pointer_up(5, PointerButton::Primary);
    assert_eq!(
        wm.panel(id(1)).map(|p| p.bounds()),
        Some(Bounds::new(40.0, 31.25, 20.0, 18.75))
    );
}

#[test]
fn resize_below_minimum_is_discarded() {
    let mut wm = desktop();
    wm.pointer_down(
        id(1),
        HitTarget::Resizer(ResizeEdge::Right),
        5,
        PointerButton::Primary,
        pt(500.0, 300.0),
    )
    .expect("live panel");
    // 300px wide panel, minimum 200px.
    let shrunk = wm.pointer_move(5, pt(390.0, 300.0)).expect("routed");
    assert!(!shrunk.applied);
    assert_eq!(shrunk.bounds.width, 30.0);
}

#[test]
fn drag_end_pulls_header_back_into_view() {
    let mut wm = desktop();
    wm.pointer_down(id(1), HitTarget::Header, 1, PointerButton::Primary, pt(300.0, 160.0))
        .expect("live panel");
    let low = wm.pointer_move(1, pt(300.0, 790.0)).expect("routed");
    assert_eq!(low.bounds.top, 97.5);

    let up = wm.pointer_up(1, PointerButton::Primary).expect("routed");
    assert_eq!(up.bounds.top, 96.0);
    assert_eq!(wm.panel(id(1)).map(|p| p.bounds().top), Some(96.0));
}

#[test]
fn lost_capture_cancels_without_release() {
    let mut wm = desktop();
    let (seen, _sub) = recorder(&wm);
    wm.pointer_down(id(3), HitTarget::Header, 9, PointerButton::Primary, pt(80.0, 500.0))
        .expect("live panel");
    wm.pointer_move(9, pt(5.0, 400.0));
    assert_eq!(wm.snap_preview(), Some(SnapZone::Left));

    let lost = wm.lost_pointer_capture(9).expect("routed");
    assert_eq!(lost.capture_command, None);
    assert_eq!(wm.snap_preview(), None);
    assert_eq!(wm.active_panel(), None);
    assert!(matches!(
        seen.borrow().last(),
        Some(ManagerEvent::Panel {
            event: PanelEvent::GestureCanceled {
                kind: GestureKind::Drag,
                reason: CancelReason::LostPointerCapture,
                ..
            },
            ..
        })
    ));
    assert_ne!(wm.panel(id(3)).map(|p| p.bounds()), Some(PresetBound::Left.bounds()));
}

#[test]
fn blur_mid_resize_releases_capture() {
    let mut wm = desktop();
    wm.pointer_down(
        id(2),
        HitTarget::Resizer(ResizeEdge::Top),
        2,
        PointerButton::Primary,
        pt(700.0, 80.0),
    )
    .expect("live panel");
    let blur = wm.blur().expect("routed");
    assert_eq!(blur.capture_command, Some(CaptureCommand::Release { pointer_id: 2 }));
    assert_eq!(wm.blur(), None);
}

#[test]
fn content_subscriptions_follow_panel_lifetime() {
    let schema = vec![PanelSchema::new(
        "Inbox",
        "list",
        Bounds::new(30.0, 25.0, 20.0, 18.75),
    )];
    let mut wm =
        WindowManager::new(container(), schema, WindowManagerOptions::default()).expect("wm");
    let expanded = Rc::new(RefCell::new(Vec::new()));
    {
        let expanded = Rc::clone(&expanded);
        wm.register_constructor("list", move |panel| {
            let expanded = Rc::clone(&expanded);
            panel.subscribe(move |event| {
                if let PanelEvent::Expanded { is_maximized } = event {
                    expanded.borrow_mut().push(*is_maximized);
                }
            });
        })
        .expect("register");
    }
    wm.init().expect("init");

    wm.toggle_expand(id(1)).expect("expandable");
    wm.toggle_expand(id(1)).expect("expandable");
    assert_eq!(*expanded.borrow(), vec![true, false]);

    let closed = wm.close_window(id(1)).expect("live panel");
    assert_eq!(closed.release, None);
    assert_eq!(Rc::strong_count(&expanded), 2);
}

#[test]
fn non_expandable_panel_reports_error() {
    let mut wm = desktop();
    let err = wm.toggle_expand(id(3)).unwrap_err();
    assert_eq!(err.to_string(), "panel 3 is not expandable");
}

#[test]
fn export_reflects_live_state_and_parses_back() {
    let mut wm = desktop();
    wm.pointer_down(id(1), HitTarget::Header, 1, PointerButton::Primary, pt(300.0, 160.0))
        .expect("live panel");
    wm.pointer_move(1, pt(350.0, 190.0));
    wm.pointer_up(1, PointerButton::Primary);
    wm.close_window(id(3));

    let json = wm.to_json().expect("serialize");
    let parsed: Vec<PanelSchema> = serde_json::from_str(&json).expect("parse back");
    assert_eq!(parsed, wm.to_schema());

    let summary: Vec<(String, [f64; 2], Option<bool>)> = parsed
        .into_iter()
        .map(|s| (s.title, s.position, s.is_closable))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Chart".to_owned(), [50.0, 10.0], Some(false)),
            ("Inbox".to_owned(), [25.0, 22.5], Some(true)),
        ]
    );
}

#[test]
fn destroy_mid_drag_releases_and_closes_all() {
    let mut wm = desktop();
    wm.pointer_down(id(2), HitTarget::Header, 8, PointerButton::Primary, pt(600.0, 90.0))
        .expect("live panel");
    let closed = wm.destroy();
    let releases: Vec<_> = closed.iter().filter_map(|c| c.release).collect();
    assert_eq!(releases, vec![CaptureCommand::Release { pointer_id: 8 }]);
    assert_eq!(closed.len(), 3);
    assert!(wm.is_empty());
    assert_eq!(wm.pointer_move(8, pt(0.0, 0.0)), None);
}
