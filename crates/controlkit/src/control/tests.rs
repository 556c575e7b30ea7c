//! Tests for controls.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use controlkit_core::{ControlError, Point, Rect, Size};

use super::*;
use crate::behavior::{CompositeBehavior, FocusableBehavior, PlainBehavior};
use crate::event::TraversalIntent;
use crate::headless::HeadlessPlatform;
use crate::native::NativePlatform;

fn setup() -> (Rc<HeadlessPlatform>, Display, Control) {
    let platform = Rc::new(HeadlessPlatform::new());
    let display = Display::new(platform.clone());
    let shell = display.create_shell().unwrap();
    (platform, display, shell)
}

fn counter(control: &Control, tag: EventType) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let seen = count.clone();
    control
        .add_listener(tag, Listener::new(move |_| seen.set(seen.get() + 1)))
        .unwrap();
    count
}

/// Traverses whichever way it is asked and remembers the direction.
#[derive(Debug, Default)]
struct GroupWalker {
    last: Cell<Option<bool>>,
}

impl ControlBehavior for GroupWalker {
    fn is_tab_group(&self) -> bool {
        true
    }

    fn traverse_group(&self, _control: &Control, next: bool) -> bool {
        self.last.set(Some(next));
        true
    }
}

// =========================================================================
// Creation and tree
// =========================================================================

#[test]
fn test_create_child() {
    let (platform, display, shell) = setup();
    let child = Control::new(&shell, PlainBehavior).unwrap();

    assert_eq!(child.parent().unwrap(), Some(shell.clone()));
    assert_eq!(shell.children().unwrap(), vec![child.clone()]);
    assert_eq!(child.shell().unwrap(), shell);
    assert_eq!(display.find_control(child.handle().unwrap()), Some(child.clone()));
    assert!(!platform.hooked_kinds(child.handle().unwrap()).is_empty());
    assert_eq!(display.control_count(), 2);
}

#[test]
fn test_create_under_disposed_parent() {
    let (_platform, _display, shell) = setup();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    panel.dispose();

    assert_eq!(
        Control::new(&panel, PlainBehavior).unwrap_err(),
        ControlError::InvalidArgument
    );
}

#[test]
fn test_create_under_leaf() {
    let (_platform, _display, shell) = setup();
    let leaf = Control::new(&shell, PlainBehavior).unwrap();

    assert_eq!(
        Control::new(&leaf, PlainBehavior).unwrap_err(),
        ControlError::InvalidParent
    );
}

#[test]
fn test_create_without_handles() {
    let (platform, display, shell) = setup();
    platform.set_refuse_handles(true);

    assert_eq!(
        Control::new(&shell, PlainBehavior).unwrap_err(),
        ControlError::NoHandles
    );
    assert_eq!(display.control_count(), 1);
}

#[test]
fn test_path_starts_below_shell() {
    let (_platform, _display, shell) = setup();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    let leaf = Control::new(&panel, PlainBehavior).unwrap();

    assert_eq!(leaf.path().unwrap(), vec![panel, leaf.clone()]);
    assert!(shell.path().unwrap().is_empty());
}

// =========================================================================
// State
// =========================================================================

#[test]
fn test_enabled_flag_is_immediate() {
    let (platform, _display, shell) = setup();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    let leaf = Control::new(&panel, PlainBehavior).unwrap();

    panel.set_enabled(false).unwrap();

    assert!(!panel.get_enabled().unwrap());
    assert!(!platform.is_view_enabled(panel.handle().unwrap()));
    assert!(leaf.get_enabled().unwrap());
    assert!(!leaf.is_enabled().unwrap());

    panel.set_enabled(true).unwrap();
    assert!(leaf.is_enabled().unwrap());
}

#[test]
fn test_visibility_sends_show_and_hide() {
    let (_platform, _display, shell) = setup();
    let leaf = Control::new(&shell, PlainBehavior).unwrap();
    let shown = counter(&leaf, EventType::Show);
    let hidden = counter(&leaf, EventType::Hide);

    leaf.set_visible(false).unwrap();
    leaf.set_visible(false).unwrap();
    assert!(!leaf.get_visible().unwrap());
    assert!(!leaf.is_visible().unwrap());
    assert_eq!(hidden.get(), 1);

    leaf.set_visible(true).unwrap();
    assert!(leaf.get_visible().unwrap());
    assert_eq!(shown.get(), 1);
}

#[test]
fn test_is_visible_follows_ancestors() {
    let (_platform, _display, shell) = setup();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    let leaf = Control::new(&panel, PlainBehavior).unwrap();

    panel.set_visible(false).unwrap();

    assert!(leaf.get_visible().unwrap());
    assert!(!leaf.is_visible().unwrap());
}

// =========================================================================
// Resources
// =========================================================================

#[test]
fn test_colors_fall_back_to_system() {
    let (_platform, _display, shell) = setup();

    assert_eq!(shell.get_foreground().unwrap().components(), (0, 0, 0));
    assert_eq!(shell.get_background().unwrap().components(), (255, 255, 255));

    shell.set_background(Some(Color::rgb(1, 2, 3))).unwrap();
    assert_eq!(shell.get_background().unwrap().components(), (1, 2, 3));

    shell.set_background(None).unwrap();
    assert_eq!(shell.get_background().unwrap().components(), (255, 255, 255));
}

#[test]
fn test_disposed_resources_rejected() {
    let (_platform, _display, shell) = setup();
    let color = Color::rgb(9, 9, 9);
    color.dispose();
    let cursor = Cursor::new(cursor_icon::CursorIcon::Pointer);
    cursor.dispose();

    assert_eq!(shell.set_foreground(Some(color)).unwrap_err(), ControlError::InvalidArgument);
    assert_eq!(shell.set_cursor(Some(cursor)).unwrap_err(), ControlError::InvalidArgument);
    assert!(shell.get_cursor().unwrap().is_none());
}

#[test]
fn test_tool_tip_and_layout_data() {
    let (_platform, _display, shell) = setup();

    shell.set_tool_tip_text(Some("Save")).unwrap();
    assert_eq!(shell.get_tool_tip_text().unwrap().as_deref(), Some("Save"));
    shell.set_tool_tip_text(None).unwrap();
    assert_eq!(shell.get_tool_tip_text().unwrap(), None);

    shell.set_layout_data(Some(Rc::new(42_u32))).unwrap();
    let data = shell.get_layout_data().unwrap().unwrap();
    assert_eq!(data.downcast_ref::<u32>(), Some(&42));
}

#[test]
fn test_set_menu_checks_in_order() {
    let (_platform, display, shell) = setup();
    let leaf = Control::new(&shell, PlainBehavior).unwrap();
    let other_shell = display.create_shell().unwrap();

    let disposed_bar = Menu::new(&shell, MenuStyle::Bar).unwrap();
    disposed_bar.dispose();
    assert_eq!(leaf.set_menu(Some(disposed_bar)).unwrap_err(), ControlError::InvalidArgument);

    let bar = Menu::new(&shell, MenuStyle::Bar).unwrap();
    assert_eq!(leaf.set_menu(Some(bar)).unwrap_err(), ControlError::MenuNotPopup);

    let foreign = Menu::new(&other_shell, MenuStyle::PopUp).unwrap();
    assert_eq!(leaf.set_menu(Some(foreign)).unwrap_err(), ControlError::InvalidParent);

    let popup = Menu::new(&shell, MenuStyle::PopUp).unwrap();
    leaf.set_menu(Some(popup.clone())).unwrap();
    assert_eq!(leaf.get_menu().unwrap(), Some(popup));

    leaf.set_menu(None).unwrap();
    assert_eq!(leaf.get_menu().unwrap(), None);
}

// =========================================================================
// Listeners
// =========================================================================

#[test]
fn test_null_listener_rejected() {
    let (_platform, _display, shell) = setup();

    assert_eq!(
        shell.add_listener(EventType::Move, None).unwrap_err(),
        ControlError::NullArgument
    );
    assert_eq!(
        shell.remove_listener_kind(ListenerKind::Mouse, None).unwrap_err(),
        ControlError::NullArgument
    );
}

#[test]
fn test_compound_listener_leaves_no_residue() {
    let (_platform, _display, shell) = setup();
    let listener = Listener::new(|_| {});

    shell.add_listener_kind(ListenerKind::Mouse, listener.clone()).unwrap();
    assert_eq!(shell.listener_count().unwrap(), 3);
    assert!(shell.is_listening(EventType::MouseDoubleClick).unwrap());

    shell.remove_listener_kind(ListenerKind::Mouse, listener).unwrap();
    assert_eq!(shell.listener_count().unwrap(), 0);
    for tag in ListenerKind::Mouse.tags() {
        assert!(!shell.is_listening(*tag).unwrap());
    }
}

#[test]
fn test_typed_listener_removed_by_object() {
    struct Moves(Cell<u32>);

    impl ControlListener for Moves {
        fn control_moved(&self, _event: &mut Event) {
            self.0.set(self.0.get() + 1);
        }
    }

    let (_platform, _display, shell) = setup();
    let moves = Rc::new(Moves(Cell::new(0)));

    shell.add_control_listener(&moves).unwrap();
    shell.notify_listeners(EventType::Move, &mut Event::new(EventType::Move)).unwrap();
    shell.notify_listeners(EventType::Resize, &mut Event::new(EventType::Resize)).unwrap();
    assert_eq!(moves.0.get(), 1);

    shell.remove_control_listener(&moves).unwrap();
    assert_eq!(shell.listener_count().unwrap(), 0);
}

#[test]
fn test_duplicate_listener_needs_two_removals() {
    let (_platform, _display, shell) = setup();
    let count = Rc::new(Cell::new(0));
    let seen = count.clone();
    let listener = Listener::new(move |_| seen.set(seen.get() + 1));

    shell.add_listener(EventType::Help, listener.clone()).unwrap();
    shell.add_listener(EventType::Help, listener.clone()).unwrap();
    shell.notify_listeners(EventType::Help, &mut Event::new(EventType::Help)).unwrap();
    assert_eq!(count.get(), 2);

    shell.remove_listener(EventType::Help, listener.clone()).unwrap();
    assert!(shell.is_listening(EventType::Help).unwrap());
    shell.remove_listener(EventType::Help, listener).unwrap();
    assert!(!shell.is_listening(EventType::Help).unwrap());
}

#[test]
fn test_notify_reports_veto() {
    let (_platform, _display, shell) = setup();
    shell
        .add_listener(EventType::KeyDown, Listener::new(|event| event.doit = false))
        .unwrap();

    let mut event = Event::new(EventType::KeyDown);
    assert_eq!(shell.notify_listeners(EventType::KeyDown, &mut event), Ok(Delivery::Vetoed));
    assert_eq!(event.widget, Some(shell.clone()));
}

// =========================================================================
// Coordinates
// =========================================================================

#[test]
fn test_bounds_are_parent_relative() {
    let (platform, _display, shell) = setup();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    let leaf = Control::new(&panel, PlainBehavior).unwrap();

    panel.set_bounds(Rect::new(10, 20, 100, 100)).unwrap();
    leaf.set_bounds(Rect::new(5, 5, 30, 15)).unwrap();

    assert_eq!(platform.control_bounds(leaf.handle().unwrap()), Rect::new(15, 25, 30, 15));
    assert_eq!(leaf.get_bounds().unwrap(), Rect::new(5, 5, 30, 15));
    assert_eq!(leaf.get_location().unwrap(), Point::new(5, 5));
    assert_eq!(panel.get_bounds().unwrap(), Rect::new(10, 20, 100, 100));
}

#[test]
fn test_set_bounds_clamps_and_keeps_hidden() {
    let (platform, _display, shell) = setup();
    let leaf = Control::new(&shell, PlainBehavior).unwrap();
    leaf.set_visible(false).unwrap();

    leaf.set_bounds(Rect::new(1, 2, -5, 7)).unwrap();

    assert_eq!(leaf.get_size().unwrap(), Size::new(0, 7));
    assert!(!platform.is_view_visible(leaf.handle().unwrap()));
}

#[test]
fn test_point_translation_round_trip() {
    let (platform, _display, shell) = setup();
    platform.set_window_bounds(shell.handle().unwrap(), Rect::new(100, 200, 800, 600));
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    panel.set_bounds(Rect::new(10, 20, 300, 300)).unwrap();

    let screen = panel.to_display(Point::new(1, 2)).unwrap();
    assert_eq!(screen, Point::new(111, 222));
    assert_eq!(panel.to_control(screen).unwrap(), Point::new(1, 2));

    let local = panel.to_control(Point::new(5, 5)).unwrap();
    assert_eq!(panel.to_display(local).unwrap(), Point::new(5, 5));
}

#[test]
fn test_compute_size_adds_border() {
    #[derive(Debug)]
    struct Bordered;

    impl ControlBehavior for Bordered {
        fn border_width(&self) -> i32 {
            2
        }
    }

    let (_platform, display, shell) = setup();
    let leaf = Control::new(&shell, Bordered).unwrap();
    let default = display.config().default_size;

    assert_eq!(
        leaf.compute_size(None, Some(10), true).unwrap(),
        Size::new(default.width + 4, 14)
    );

    leaf.pack().unwrap();
    assert_eq!(leaf.get_size().unwrap(), Size::new(default.width + 4, default.height + 4));
}

// =========================================================================
// Redraw and z-order
// =========================================================================

#[test]
fn test_nested_redraw_toggles_once() {
    let (platform, _display, shell) = setup();
    let handle = shell.handle().unwrap();

    shell.set_redraw(false).unwrap();
    shell.set_redraw(false).unwrap();
    assert!(!shell.get_redraw().unwrap());
    shell.set_redraw(true).unwrap();
    assert!(!platform.is_drawing_enabled(handle));
    shell.set_redraw(true).unwrap();
    shell.set_redraw(true).unwrap();

    assert!(shell.get_redraw().unwrap());
    assert_eq!(platform.drawing_changes(handle), vec![false, true]);
    assert_eq!(platform.invalidations(handle), vec![None]);
}

#[test]
fn test_redraw_area_and_update() {
    let (platform, _display, shell) = setup();
    let handle = shell.handle().unwrap();

    shell.redraw().unwrap();
    shell.redraw_area(Rect::new(1, 1, 4, 4), false).unwrap();
    shell.update().unwrap();

    assert_eq!(platform.invalidations(handle), vec![None, Some(Rect::new(1, 1, 4, 4))]);
}

#[test]
fn test_move_above_and_below() {
    let (platform, _display, shell) = setup();
    let a = Control::new(&shell, PlainBehavior).unwrap();
    let b = Control::new(&shell, PlainBehavior).unwrap();
    let c = Control::new(&shell, PlainBehavior).unwrap();

    c.move_above(None).unwrap();
    assert_eq!(shell.children().unwrap(), vec![c.clone(), a.clone(), b.clone()]);

    a.move_below(Some(&b)).unwrap();
    assert_eq!(shell.children().unwrap(), vec![c.clone(), b.clone(), a.clone()]);

    let handles: Vec<_> = shell
        .children()
        .unwrap()
        .iter()
        .map(|child| child.handle().unwrap())
        .collect();
    assert_eq!(platform.subviews(shell.handle().unwrap()), handles);
}

#[test]
fn test_move_relative_to_stranger_is_ignored() {
    let (_platform, display, shell) = setup();
    let a = Control::new(&shell, PlainBehavior).unwrap();
    let b = Control::new(&shell, PlainBehavior).unwrap();
    let stranger = Control::new(&display.create_shell().unwrap(), PlainBehavior).unwrap();

    b.move_above(Some(&stranger)).unwrap();
    assert_eq!(shell.children().unwrap(), vec![a.clone(), b.clone()]);

    stranger.dispose();
    assert_eq!(b.move_above(Some(&stranger)).unwrap_err(), ControlError::InvalidArgument);
}

#[test]
fn test_set_parent_is_unsupported() {
    let (_platform, display, shell) = setup();
    let leaf = Control::new(&shell, PlainBehavior).unwrap();
    let other = display.create_shell().unwrap();

    assert!(!leaf.is_reparentable().unwrap());
    assert_eq!(leaf.set_parent(&other), Ok(false));
    other.dispose();
    assert_eq!(leaf.set_parent(&other).unwrap_err(), ControlError::InvalidArgument);
}

// =========================================================================
// Focus and traversal
// =========================================================================

#[test]
fn test_tab_list_order() {
    let (_platform, _display, shell) = setup();
    let a = Control::new(&shell, FocusableBehavior).unwrap();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    let b = Control::new(&panel, FocusableBehavior).unwrap();
    let _label = Control::new(&shell, PlainBehavior).unwrap();

    assert_eq!(
        shell.compute_tab_list().unwrap(),
        vec![shell.clone(), a.clone(), panel.clone(), b.clone()]
    );

    shell.set_tab_list(Some(&[panel.clone(), a.clone()])).unwrap();
    assert_eq!(
        shell.compute_tab_list().unwrap(),
        vec![shell.clone(), panel.clone(), b.clone(), a.clone()]
    );

    b.set_visible(false).unwrap();
    a.set_enabled(false).unwrap();
    assert_eq!(shell.compute_tab_list().unwrap(), vec![shell.clone(), panel.clone()]);
}

#[test]
fn test_tab_list_empty_when_hidden() {
    let (_platform, _display, shell) = setup();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    Control::new(&panel, FocusableBehavior).unwrap();

    panel.set_visible(false).unwrap();
    assert!(panel.compute_tab_list().unwrap().is_empty());
}

#[test]
fn test_set_tab_list_validation() {
    let (_platform, _display, shell) = setup();
    let leaf = Control::new(&shell, FocusableBehavior).unwrap();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    let nested = Control::new(&panel, FocusableBehavior).unwrap();
    let gone = Control::new(&shell, FocusableBehavior).unwrap();
    gone.dispose();

    assert_eq!(leaf.set_tab_list(None).unwrap_err(), ControlError::InvalidArgument);
    assert_eq!(
        shell.set_tab_list(Some(&[nested])).unwrap_err(),
        ControlError::InvalidParent
    );
    assert_eq!(
        shell.set_tab_list(Some(&[leaf.clone(), gone])).unwrap_err(),
        ControlError::InvalidArgument
    );

    shell.set_tab_list(Some(&[leaf.clone()])).unwrap();
    assert_eq!(shell.get_tab_list().unwrap(), vec![leaf.clone()]);

    shell.set_tab_list(None).unwrap();
    assert_eq!(shell.get_tab_list().unwrap(), vec![leaf, panel]);
}

#[test]
fn test_disposed_child_leaves_tab_list() {
    let (_platform, _display, shell) = setup();
    let a = Control::new(&shell, FocusableBehavior).unwrap();
    let b = Control::new(&shell, FocusableBehavior).unwrap();
    shell.set_tab_list(Some(&[b.clone(), a.clone()])).unwrap();

    b.dispose();
    assert_eq!(shell.get_tab_list().unwrap(), vec![a]);
}

#[test]
fn test_tab_group_and_root() {
    let (_platform, _display, shell) = setup();
    let a = Control::new(&shell, FocusableBehavior).unwrap();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    let label = Control::new(&panel, PlainBehavior).unwrap();

    assert_eq!(label.compute_tab_group().unwrap(), panel);
    assert_eq!(a.compute_tab_group().unwrap(), a);
    assert!(shell.is_tab_group().unwrap());
    assert!(!label.is_tab_item().unwrap());

    assert_eq!(label.compute_tab_root().unwrap(), shell);
    shell.set_tab_list(Some(&[a.clone()])).unwrap();
    assert_eq!(panel.compute_tab_root().unwrap(), panel);
    assert_eq!(label.compute_tab_root().unwrap(), panel);
    assert_eq!(a.compute_tab_root().unwrap(), shell);
}

#[test]
fn test_focus_follows_native_acceptance() {
    let (platform, display, shell) = setup();
    let a = Control::new(&shell, FocusableBehavior).unwrap();

    assert!(a.set_focus().unwrap());
    assert!(a.is_focus_control().unwrap());
    assert_eq!(display.focus_control(), Some(a.clone()));

    platform.set_refuse_focus(true);
    assert!(!shell.force_focus().unwrap());
    assert!(!shell.is_focus_control().unwrap());
}

#[test]
fn test_traverse_runs_behavior_handler() {
    let (_platform, _display, shell) = setup();
    let walker = Rc::new(GroupWalker::default());
    let control = Control::with_behavior(&shell, walker.clone()).unwrap();
    let traverses = counter(&control, EventType::Traverse);

    assert!(control.traverse(TraversalIntent::TabPrevious).unwrap());
    assert_eq!(walker.last.get(), Some(false));
    assert_eq!(traverses.get(), 1);

    assert!(!control.traverse(TraversalIntent::Escape).unwrap());
    assert!(control.traverse(TraversalIntent::None).unwrap());
}

#[test]
fn test_traverse_listener_redirects_intent() {
    let (_platform, _display, shell) = setup();
    let walker = Rc::new(GroupWalker::default());
    let control = Control::with_behavior(&shell, walker.clone()).unwrap();
    control
        .add_listener(
            EventType::Traverse,
            Listener::new(|event| event.detail = TraversalIntent::Escape),
        )
        .unwrap();

    assert!(!control.traverse(TraversalIntent::TabNext).unwrap());
    assert_eq!(walker.last.get(), None);
}

#[test]
fn test_traverse_listener_redirects_to_group() {
    let (_platform, _display, shell) = setup();
    let walker = Rc::new(GroupWalker::default());
    let control = Control::with_behavior(&shell, walker.clone()).unwrap();
    control
        .add_listener(
            EventType::Traverse,
            Listener::new(|event| event.detail = TraversalIntent::TabPrevious),
        )
        .unwrap();

    assert!(control.traverse(TraversalIntent::Escape).unwrap());
    assert_eq!(walker.last.get(), Some(false));
}

#[test]
fn test_traverse_veto_skips_handler() {
    let (_platform, _display, shell) = setup();
    let walker = Rc::new(GroupWalker::default());
    let control = Control::with_behavior(&shell, walker.clone()).unwrap();
    control
        .add_listener(EventType::Traverse, Listener::new(|event| event.doit = false))
        .unwrap();

    assert!(!control.traverse(TraversalIntent::TabNext).unwrap());
    assert_eq!(walker.last.get(), None);
}

#[test]
fn test_traverse_without_focus_does_nothing() {
    let (platform, _display, shell) = setup();
    let control = Control::new(&shell, FocusableBehavior).unwrap();
    let traverses = counter(&control, EventType::Traverse);
    platform.set_refuse_focus(true);

    assert!(!control.traverse(TraversalIntent::None).unwrap());
    assert_eq!(traverses.get(), 0);
}

#[test]
fn test_traverse_disposed_by_listener() {
    let (_platform, _display, shell) = setup();
    let walker = Rc::new(GroupWalker::default());
    let control = Control::with_behavior(&shell, walker.clone()).unwrap();
    let target = control.clone();
    control
        .add_listener(EventType::Traverse, Listener::new(move |_| target.dispose()))
        .unwrap();

    assert!(!control.traverse(TraversalIntent::TabNext).unwrap());
    assert_eq!(walker.last.get(), None);
    assert!(control.is_disposed());
}

// =========================================================================
// Disposal
// =========================================================================

#[test]
fn test_dispose_cascades_children_first() {
    let (platform, display, shell) = setup();
    let a = Control::new(&shell, PlainBehavior).unwrap();
    let panel = Control::new(&shell, CompositeBehavior).unwrap();
    let b = Control::new(&panel, PlainBehavior).unwrap();
    let handles: Vec<_> = [&a, &b, &panel, &shell]
        .iter()
        .map(|control| control.handle().unwrap())
        .collect();

    shell.dispose();

    assert_eq!(platform.disposed_handles(), handles);
    assert_eq!(platform.view_count(), 0);
    assert_eq!(display.control_count(), 0);
    assert!(b.is_disposed());
    assert!(handles.iter().all(|&h| display.find_control(h).is_none()));
}

#[test]
fn test_dispose_is_idempotent() {
    let (platform, _display, shell) = setup();
    let leaf = Control::new(&shell, PlainBehavior).unwrap();
    let popup = Menu::new(&shell, MenuStyle::PopUp).unwrap();
    let disposals = Rc::new(Cell::new(0));
    let sink = disposals.clone();
    popup.set_dispose_observer(move |_| sink.set(sink.get() + 1));
    leaf.set_menu(Some(popup.clone())).unwrap();

    leaf.dispose();
    leaf.dispose();

    assert_eq!(disposals.get(), 1);
    assert_eq!(platform.disposed_handles().len(), 1);
    assert!(shell.children().unwrap().is_empty());
}

#[test]
fn test_disposed_control_fails_fast() {
    let (_platform, _display, shell) = setup();
    let leaf = Control::new(&shell, PlainBehavior).unwrap();
    leaf.dispose();

    assert_eq!(leaf.get_bounds().unwrap_err(), ControlError::WidgetDisposed);
    assert_eq!(leaf.set_visible(true).unwrap_err(), ControlError::WidgetDisposed);
    assert_eq!(leaf.traverse(TraversalIntent::None).unwrap_err(), ControlError::WidgetDisposed);
    assert_eq!(
        leaf.add_listener(EventType::Move, Listener::new(|_| {})).unwrap_err(),
        ControlError::WidgetDisposed
    );
}

#[test]
fn test_dispose_drops_listeners_outside_borrow() {
    struct DisposeOnDrop(Control, Rc<RefCell<Vec<bool>>>);

    impl Drop for DisposeOnDrop {
        fn drop(&mut self) {
            // Runs while the owning control is being released.
            self.1.borrow_mut().push(self.0.is_disposed());
        }
    }

    let (_platform, _display, shell) = setup();
    let leaf = Control::new(&shell, PlainBehavior).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let guard = DisposeOnDrop(shell.clone(), log.clone());
    leaf.add_listener(EventType::Move, Listener::new(move |_| {
        let _keep = &guard;
    }))
    .unwrap();

    leaf.dispose();

    assert_eq!(*log.borrow(), vec![false]);
}
