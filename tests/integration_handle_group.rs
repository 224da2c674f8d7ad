use std::cell::RefCell;
use std::rc::{Rc, Weak};

use grab_handles::client::{HandleSlot, WindowClient, WindowState};
use grab_handles::config::GroupConfig;
use grab_handles::constants::{FADE_MSEC, OPACITY_MAX};
use grab_handles::geometry::Geometry;
use grab_handles::handle::{
    Direction, FadeState, GrabHandle, GrabHandleGroup, HandleFactories, HandleImpl,
    HandlePosition, HandleSet, HandleTexture, ImplFactory, PositionFlags, TextureFactory,
    TextureSize,
};
use grab_handles::layout::{ActionsMask, MaximizedMask};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Show(HandlePosition),
    Hide(HandlePosition),
    Press(HandlePosition, i32, i32, u32),
    Lock(HandlePosition, i32, i32, PositionFlags),
    Damage(HandlePosition, Geometry),
}

type Log = Rc<RefCell<Vec<Call>>>;

struct RecordingImpl {
    position: HandlePosition,
    log: Log,
}

impl HandleImpl for RecordingImpl {
    fn show(&mut self) {
        self.log.borrow_mut().push(Call::Show(self.position));
    }

    fn hide(&mut self) {
        self.log.borrow_mut().push(Call::Hide(self.position));
    }

    fn button_press(&self, x: i32, y: i32, button: u32) {
        self.log
            .borrow_mut()
            .push(Call::Press(self.position, x, y, button));
    }

    fn lock_position(&mut self, x: i32, y: i32, flags: PositionFlags) {
        self.log
            .borrow_mut()
            .push(Call::Lock(self.position, x, y, flags));
    }

    fn damage(&mut self, rect: Geometry) {
        self.log.borrow_mut().push(Call::Damage(self.position, rect));
    }
}

struct RecordingFactory {
    log: Log,
}

impl ImplFactory for RecordingFactory {
    fn create(&self, position: HandlePosition) -> Box<dyn HandleImpl> {
        Box::new(RecordingImpl {
            position,
            log: Rc::clone(&self.log),
        })
    }
}

#[derive(Debug)]
struct StubTexture {
    size: TextureSize,
    ready: bool,
}

impl HandleTexture for StubTexture {
    fn size(&self) -> TextureSize {
        self.size
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

struct StubTextures {
    ready: bool,
}

impl TextureFactory for StubTextures {
    fn create(&self) -> Rc<dyn HandleTexture> {
        Rc::new(StubTexture {
            size: TextureSize::new(100, 100),
            ready: self.ready,
        })
    }
}

#[derive(Default)]
struct RecordingClient {
    requests: RefCell<Vec<(i32, i32, Direction, u32)>>,
    raised: RefCell<Vec<HandlePosition>>,
}

impl WindowClient for RecordingClient {
    fn request_movement(&self, x: i32, y: i32, direction: Direction, button: u32) {
        self.requests.borrow_mut().push((x, y, direction, button));
    }

    fn raise_grab_handle(&self, handle: &GrabHandle) {
        self.raised.borrow_mut().push(handle.position());
    }
}

struct Fixture {
    log: Log,
    client: Rc<RecordingClient>,
    factories: HandleFactories,
}

impl Fixture {
    fn new() -> Self {
        Self::with_texture(true)
    }

    fn with_texture(ready: bool) -> Self {
        let log: Log = Rc::default();
        let factories = HandleFactories::new(
            RecordingFactory {
                log: Rc::clone(&log),
            },
            StubTextures { ready },
        );
        Self {
            log,
            client: Rc::new(RecordingClient::default()),
            factories,
        }
    }

    fn owner(&self) -> Weak<dyn WindowClient> {
        let client: Rc<dyn WindowClient> = self.client.clone();
        Rc::downgrade(&client)
    }

    fn group(&self) -> GrabHandleGroup {
        GrabHandleGroup::create(self.owner(), &self.factories)
    }

    fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

const WINDOW: Geometry = Geometry::new(250, 250, 1000, 1000);

#[test]
fn relayout_centers_handles_on_window_vertices() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.relayout(WINDOW, false);

    let expected = [
        (HandlePosition::TopLeft, 200, 200),
        (HandlePosition::Top, 700, 200),
        (HandlePosition::TopRight, 1200, 200),
        (HandlePosition::Right, 1200, 700),
        (HandlePosition::BottomRight, 1200, 1200),
        (HandlePosition::Bottom, 700, 1200),
        (HandlePosition::BottomLeft, 200, 1200),
        (HandlePosition::Left, 200, 700),
        (HandlePosition::Middle, 700, 700),
    ];

    let locks: Vec<_> = fx
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Lock(position, x, y, flags) => {
                assert_eq!(flags, PositionFlags::SET_X | PositionFlags::SET_Y);
                Some((position, x, y))
            }
            _ => None,
        })
        .collect();
    assert_eq!(locks, expected);

    for (position, x, y) in expected {
        assert_eq!(group.handle(position).rect(), Geometry::new(x, y, 100, 100));
    }
}

#[test]
fn relayout_with_animation_flags_the_lock() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.relayout(WINDOW, true);
    assert!(fx.calls().iter().all(|call| matches!(
        call,
        Call::Lock(_, _, _, flags) if flags.contains(PositionFlags::ANIMATE)
    )));
}

#[test]
fn relayout_skips_inactive_handles() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.set_active_handles(HandleSet::LEFT | HandleSet::RIGHT);
    fx.clear();
    group.relayout(WINDOW, false);
    let positioned: Vec<_> = fx
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Lock(position, ..) => Some(position),
            _ => None,
        })
        .collect();
    assert_eq!(positioned, vec![HandlePosition::Right, HandlePosition::Left]);
}

#[test]
fn degenerate_window_keeps_handle_sizes() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.relayout(Geometry::from_signed(10, 10, -50, -50), false);
    for handle in group.handles() {
        assert_eq!(handle.rect(), Geometry::new(-40, -40, 100, 100));
    }
}

#[test]
fn fade_in_reaches_full_opacity_within_fade_duration() {
    let fx = Fixture::new();
    let mut group = fx.group();
    assert_eq!(group.state(), FadeState::Idle);
    assert!(!group.animate(1));
    assert_eq!(group.opacity(), 0);

    group.show_all();
    assert!(group.needs_animate());

    let mut previous = group.opacity();
    for step in 1..=FADE_MSEC {
        group.animate(1);
        assert!(group.opacity() >= previous);
        previous = group.opacity();
        if step == FADE_MSEC - 2 {
            assert!(group.needs_animate());
            assert!(group.opacity() < OPACITY_MAX);
        }
    }

    assert!(!group.needs_animate());
    assert_eq!(group.opacity(), OPACITY_MAX);
    assert!(group.visible());
}

#[test]
fn fade_out_reaches_zero_one_step_early() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.show_all();
    while group.animate(1) {}
    assert_eq!(group.opacity(), OPACITY_MAX);

    group.hide();
    assert_eq!(group.state(), FadeState::FadeOut);

    let mut previous = group.opacity();
    for _ in 0..FADE_MSEC - 1 {
        group.animate(1);
        assert!(group.opacity() <= previous);
        previous = group.opacity();
    }

    assert!(!group.needs_animate());
    assert!(!group.visible());
    assert_eq!(group.opacity(), 0);
}

#[test]
fn reversing_mid_fade_keeps_current_opacity() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.show_all();
    group.animate(100);
    let midway = group.opacity();
    assert!(midway > 0 && midway < OPACITY_MAX);

    group.hide();
    assert_eq!(group.state(), FadeState::FadeOut);
    assert_eq!(group.opacity(), midway);

    group.animate(50);
    let lower = group.opacity();
    assert!(lower < midway);

    group.show_all();
    assert_eq!(group.state(), FadeState::FadeIn);
    assert_eq!(group.opacity(), lower);
    group.animate(1);
    assert!(group.opacity() > lower);
}

#[test]
fn hide_at_zero_and_show_at_full_stay_idle() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.hide();
    assert_eq!(group.state(), FadeState::Idle);

    group.show_all();
    while group.animate(16) {}
    group.show_all();
    assert_eq!(group.state(), FadeState::Idle);
    assert!(!group.needs_animate());
}

#[test]
fn fade_duration_comes_from_config() {
    let fx = Fixture::new();
    let config = GroupConfig::new(10).unwrap();
    let mut group = GrabHandleGroup::with_config(fx.owner(), &fx.factories, config);
    group.show_all();
    assert!(group.animate(5));
    assert!(!group.animate(5));
    assert_eq!(group.opacity(), OPACITY_MAX);
}

#[test]
fn repeated_show_hide_toggles_reach_the_impls() {
    let fx = Fixture::new();
    let mut group = fx.group();

    group.show(HandleSet::TOP_LEFT);
    group.show(HandleSet::TOP);
    group.show(HandleSet::MIDDLE);
    group.hide();
    group.show_all();
    group.hide();

    let calls = fx.calls();
    let shows = calls.iter().filter(|c| matches!(c, Call::Show(_))).count();
    let hides = calls.iter().filter(|c| matches!(c, Call::Hide(_))).count();
    assert_eq!(shows, 3 + 9);
    assert_eq!(hides, 3 + 9);

    let top_left: Vec<_> = calls
        .iter()
        .filter(|c| {
            matches!(
                c,
                Call::Show(HandlePosition::TopLeft) | Call::Hide(HandlePosition::TopLeft)
            )
        })
        .cloned()
        .collect();
    assert_eq!(
        top_left,
        vec![
            Call::Show(HandlePosition::TopLeft),
            Call::Hide(HandlePosition::TopLeft),
            Call::Show(HandlePosition::TopLeft),
            Call::Hide(HandlePosition::TopLeft),
        ]
    );
}

#[test]
fn show_marks_the_handle_region_for_redraw() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.relayout(WINDOW, false);
    fx.clear();
    group.show(HandleSet::MIDDLE);
    assert_eq!(
        fx.calls(),
        vec![
            Call::Show(HandlePosition::Middle),
            Call::Damage(HandlePosition::Middle, Geometry::new(700, 700, 100, 100)),
        ]
    );
}

#[test]
fn middle_press_requests_a_pure_move() {
    let fx = Fixture::new();
    let group = fx.group();
    group.handle(HandlePosition::Middle).button_press(700, 720, 1);

    assert_eq!(
        *fx.client.requests.borrow(),
        vec![(700, 720, Direction::MOVE, 1)]
    );
    assert_eq!(*fx.client.raised.borrow(), vec![HandlePosition::Middle]);
    assert!(
        fx.calls()
            .contains(&Call::Press(HandlePosition::Middle, 700, 720, 1))
    );
}

#[test]
fn corner_press_requests_resize_on_both_edges() {
    let fx = Fixture::new();
    let group = fx.group();
    group.handle(HandlePosition::TopRight).button_press(1, 2, 3);

    let requests = fx.client.requests.borrow();
    let (_, _, direction, _) = requests[0];
    assert_eq!(direction, Direction::NORTH | Direction::EAST);
    assert!(!direction.contains(Direction::MOVE));
}

#[test]
fn press_is_routed_by_hit_test() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.relayout(WINDOW, false);
    // unmapped handles take no input
    assert!(!group.button_press_at(205, 205, 1));

    group.show_all();
    assert_eq!(group.handle_at(205, 205), Some(HandlePosition::TopLeft));
    assert_eq!(group.handle_at(750, 750), Some(HandlePosition::Middle));
    assert_eq!(group.handle_at(500, 500), None);

    assert!(group.button_press_at(1250, 1290, 1));
    assert_eq!(
        *fx.client.requests.borrow(),
        vec![(1250, 1290, Direction::SOUTH | Direction::EAST, 1)]
    );
}

#[test]
fn press_after_window_is_gone_is_ignored() {
    let fx = Fixture::new();
    let group = fx.group();
    let Fixture { client, log, .. } = fx;
    drop(client);
    group.handle(HandlePosition::Left).button_press(0, 0, 1);
    assert_eq!(
        *log.borrow(),
        vec![Call::Press(HandlePosition::Left, 0, 0, 1)]
    );
}

#[test]
fn deactivated_handles_are_unmapped_and_return_when_reactivated() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.show_all();
    fx.clear();

    group.set_active_handles(HandleSet::MIDDLE);
    let hides = fx
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::Hide(_)))
        .count();
    assert_eq!(hides, 8);
    assert!(group.handle(HandlePosition::Middle).is_mapped());

    fx.clear();
    group.set_active_handles(HandleSet::all());
    let shows = fx
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::Show(_)))
        .count();
    assert_eq!(shows, 8);
}

#[test]
fn reactivated_handles_return_at_the_current_window() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.relayout(WINDOW, false);
    group.show_all();
    group.set_active_handles(HandleSet::MIDDLE);
    group.relayout(Geometry::new(0, 0, 400, 400), false);
    fx.clear();

    group.set_active_handles(HandleSet::all());
    let moved = Geometry::new(-50, -50, 100, 100);
    assert_eq!(group.handle(HandlePosition::TopLeft).rect(), moved);
    let top_left: Vec<_> = fx
        .calls()
        .into_iter()
        .filter(|call| {
            matches!(
                call,
                Call::Lock(HandlePosition::TopLeft, ..)
                    | Call::Show(HandlePosition::TopLeft)
                    | Call::Damage(HandlePosition::TopLeft, _)
            )
        })
        .collect();
    assert_eq!(
        top_left,
        vec![
            Call::Lock(
                HandlePosition::TopLeft,
                -50,
                -50,
                PositionFlags::SET_X | PositionFlags::SET_Y
            ),
            Call::Show(HandlePosition::TopLeft),
            Call::Damage(HandlePosition::TopLeft, moved),
        ]
    );
}

#[test]
fn inactive_handles_are_not_shown() {
    let fx = Fixture::new();
    let mut group = fx.group();
    group.set_active_handles(HandleSet::TOP | HandleSet::BOTTOM);
    group.show_all();
    let mapped: Vec<_> = group
        .handles()
        .filter(|h| h.is_mapped())
        .map(|h| h.position())
        .collect();
    assert_eq!(mapped, vec![HandlePosition::Top, HandlePosition::Bottom]);
}

#[test]
fn drawable_handles_follow_the_fade() {
    let fx = Fixture::new();
    let mut group = fx.group();
    assert_eq!(group.drawable_handles().count(), 0);

    group.show_all();
    // shown but still transparent
    assert_eq!(group.drawable_handles().count(), 0);
    group.animate(10);
    assert_eq!(group.drawable_handles().count(), 9);

    group.hide();
    // still painted while fading out
    assert_eq!(group.drawable_handles().count(), 9);
    while group.animate(10) {}
    assert_eq!(group.drawable_handles().count(), 0);
}

#[test]
fn unready_texture_does_not_block_layout_or_fade() {
    let fx = Fixture::with_texture(false);
    let mut group = fx.group();
    group.relayout(WINDOW, false);
    group.show_all();
    while group.animate(50) {}
    assert_eq!(group.opacity(), OPACITY_MAX);
    assert_eq!(
        group.handle(HandlePosition::Middle).rect(),
        Geometry::new(700, 700, 100, 100)
    );
    assert_eq!(group.drawable_handles().count(), 0);
}

#[test]
fn slot_follows_window_eligibility() {
    let fx = Fixture::new();
    let owner = fx.owner();
    let mut slot = HandleSlot::new();
    let mut state = WindowState {
        geometry: WINDOW,
        maximized: MaximizedMask::VERT,
        actions: ActionsMask::MOVE | ActionsMask::RESIZE,
        fullscreen: false,
        decorated: true,
    };

    let group = slot.sync(&state, &owner, &fx.factories, false).unwrap();
    assert_eq!(
        group.active_handles(),
        HandleSet::LEFT | HandleSet::RIGHT | HandleSet::MIDDLE
    );
    assert_eq!(
        group.handle(HandlePosition::Right).rect(),
        Geometry::new(1200, 700, 100, 100)
    );

    state.fullscreen = true;
    assert!(slot.sync(&state, &owner, &fx.factories, false).is_none());
    assert!(slot.group().is_none());

    state.fullscreen = false;
    assert!(slot.sync(&state, &owner, &fx.factories, false).is_some());
    slot.clear();
    assert!(slot.group().is_none());
}
