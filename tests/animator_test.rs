use particle_fields::animator::{Animator, RunState};
use particle_fields::field_engine::{Effect, EffectConfig, FieldConfig, ParticleField, Vec2};
use particle_fields::host::{EventBus, EventTarget, HostEvent, SimulatedHost};
use particle_fields::renderer_engine::{DrawCommand, RecordingSurface, Surface};
use particle_fields::theme::Theme;
use std::cell::RefCell;
use std::rc::Rc;

mod helpers;
use helpers::{seeded_field, LoggingEffect};

fn mounted_field() -> Animator<RecordingSurface, ParticleField> {
    Animator::mounted(
        "hero",
        seeded_field(FieldConfig::constellation(), 20, 12),
        RecordingSurface::new(800, 600),
    )
}

fn run_frames<E: Effect>(
    animator: &mut Animator<RecordingSurface, E>,
    host: &mut SimulatedHost,
    frames: usize,
) {
    for _ in 0..frames {
        for handle in host.tick() {
            animator.on_frame(host, handle);
        }
    }
}

#[test]
fn test_double_start_registers_a_single_frame() {
    let mut host = SimulatedHost::default();
    let mut animator = mounted_field();

    assert!(animator.start(&mut host));
    assert!(!animator.start(&mut host));

    assert_eq!(host.registrations(), 1);
    assert_eq!(host.pending(), 1);
    assert!(animator.is_running());
}

#[test]
fn test_each_frame_reschedules_exactly_once() {
    let mut host = SimulatedHost::default();
    let mut animator = mounted_field();
    animator.start(&mut host);

    run_frames(&mut animator, &mut host, 10);

    assert_eq!(animator.frames(), 10);
    assert_eq!(host.pending(), 1);
    assert_eq!(host.registrations(), 11);
}

#[test]
fn test_frame_clears_then_draws_then_presents() {
    let mut host = SimulatedHost::default();
    let mut animator = mounted_field();
    animator.start(&mut host);
    run_frames(&mut animator, &mut host, 3);

    let surface = animator.surface().unwrap();
    let commands = surface.commands();
    assert_eq!(commands.first(), Some(&DrawCommand::Clear));
    assert_eq!(commands.last(), Some(&DrawCommand::Present));
    assert_eq!(surface.circles().count(), 20);
    assert_eq!(surface.frames_presented(), 3);
}

#[test]
fn test_no_motion_after_stop() {
    let mut host = SimulatedHost::default();
    let mut animator = mounted_field();
    animator.start(&mut host);
    run_frames(&mut animator, &mut host, 5);

    animator.stop(&mut host);
    let frozen = animator.effect().particles().to_vec();
    let presented = animator.surface().unwrap().frames_presented();

    run_frames(&mut animator, &mut host, 50);

    assert_eq!(animator.effect().particles(), &frozen[..]);
    assert_eq!(animator.surface().unwrap().frames_presented(), presented);
    assert_eq!(host.pending(), 0);
    assert_eq!(animator.state(), RunState::Stopped);
}

#[test]
fn test_stop_is_idempotent() {
    let mut host = SimulatedHost::default();
    let mut animator = mounted_field();
    animator.start(&mut host);

    animator.stop(&mut host);
    animator.stop(&mut host);

    assert_eq!(host.cancellations(), 1);
    assert!(!animator.is_running());
    assert!(animator.pending_frame().is_none());
}

#[test]
fn test_stale_handle_is_ignored() {
    let mut host = SimulatedHost::default();
    let mut animator = mounted_field();
    animator.start(&mut host);
    let stale = animator.pending_frame().unwrap();
    animator.stop(&mut host);
    animator.start(&mut host);

    assert!(animator.on_frame(&mut host, stale).is_none());
    assert_eq!(animator.frames(), 0);
    assert_ne!(animator.pending_frame(), Some(stale));
}

#[test]
fn test_start_without_surface_is_a_noop() {
    let mut host = SimulatedHost::default();
    let mut animator: Animator<RecordingSurface, ParticleField> =
        Animator::new("missing", seeded_field(FieldConfig::default(), 5, 1));

    assert!(!animator.start(&mut host));
    assert!(!animator.is_running());
    assert_eq!(host.registrations(), 0);

    animator.mount(RecordingSurface::new(320, 200));
    assert_eq!(animator.effect().bounds(), Vec2::new(320.0, 200.0));
    assert!(animator.start(&mut host));
}

#[test]
fn test_events_are_drained_at_frame_start() {
    let log = Rc::new(RefCell::new(vec![]));
    let mut host = SimulatedHost::default();
    let mut bus = EventBus::new();
    let mut animator = Animator::mounted(
        "hero",
        LoggingEffect::new(log.clone()),
        RecordingSurface::new(800, 600),
    );
    animator.attach(bus.subscribe());
    animator.start(&mut host);
    log.borrow_mut().clear();

    bus.publish(HostEvent::PointerMove {
        target: EventTarget::container("hero"),
        position: Vec2::new(10.0, 20.0),
    });
    bus.publish(HostEvent::PointerMove {
        target: EventTarget::container("other"),
        position: Vec2::new(1.0, 1.0),
    });
    bus.publish(HostEvent::PointerMove {
        target: EventTarget::Window,
        position: Vec2::new(2.0, 2.0),
    });
    bus.publish(HostEvent::PointerLeave {
        target: EventTarget::container("hero"),
    });
    bus.publish(HostEvent::ThemeChange(Theme::Light));
    // rien n'est appliqué avant la frame
    assert!(log.borrow().is_empty());

    run_frames(&mut animator, &mut host, 1);

    assert_eq!(
        *log.borrow(),
        vec!["pointer 10,20", "pointer none", "palette", "update", "draw"]
    );
}

#[test]
fn test_window_listener_ignores_container_events() {
    let log = Rc::new(RefCell::new(vec![]));
    let mut animator = Animator::mounted(
        "background",
        LoggingEffect::new(log.clone()).on_window(),
        RecordingSurface::new(800, 600),
    );
    log.borrow_mut().clear();

    animator.handle_event(&HostEvent::PointerMove {
        target: EventTarget::container("background"),
        position: Vec2::new(5.0, 5.0),
    });
    animator.handle_event(&HostEvent::PointerMove {
        target: EventTarget::Window,
        position: Vec2::new(7.0, 8.0),
    });

    assert_eq!(*log.borrow(), vec!["pointer 7,8"]);
}

#[test]
fn test_stop_releases_subscription() {
    let mut host = SimulatedHost::default();
    let mut bus = EventBus::new();
    let mut animator = mounted_field();
    animator.attach(bus.subscribe());
    animator.start(&mut host);
    assert_eq!(bus.subscriber_count(), 1);

    animator.stop(&mut host);
    assert!(!animator.is_subscribed());
    assert_eq!(bus.publish(HostEvent::ThemeChange(Theme::Dark)), 0);
}

#[test]
fn test_resize_event_updates_surface_and_bounds() {
    let mut host = SimulatedHost::default();
    let mut bus = EventBus::new();
    let mut animator = mounted_field();
    animator.attach(bus.subscribe());
    animator.start(&mut host);

    bus.publish(HostEvent::Resize {
        target: EventTarget::container("hero"),
        width: 400,
        height: 300,
    });
    run_frames(&mut animator, &mut host, 1);

    assert_eq!(animator.effect().bounds(), Vec2::new(400.0, 300.0));
    assert_eq!(
        animator.surface().unwrap().size(),
        Vec2::new(400.0, 300.0)
    );
    assert_eq!(animator.effect().particles().len(), 20);
}

#[test]
fn test_configure_swaps_batch_between_frames() {
    let mut host = SimulatedHost::default();
    let mut animator = mounted_field();
    animator.start(&mut host);
    run_frames(&mut animator, &mut host, 2);

    animator
        .configure(&EffectConfig::Particles(FieldConfig {
            particle_count: 7,
            ..FieldConfig::default()
        }))
        .unwrap();
    run_frames(&mut animator, &mut host, 1);

    let surface = animator.surface().unwrap();
    assert_eq!(surface.circles().count(), 7);
    assert!(animator.is_running());
}
