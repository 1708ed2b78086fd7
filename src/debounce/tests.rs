use super::*;
use crate::gesture::{Action, Key, ProfileKind};
use crate::injector::RecordingInjector;
use std::time::{Duration, Instant};

fn hold_debouncer(ambiguous: AmbiguousPolicy) -> ActionDebouncer {
    ActionDebouncer::new(
        DebouncePolicy::Hold,
        ambiguous,
        ProfileKind::Driving.default_bindings(),
    )
}

fn tap_debouncer() -> ActionDebouncer {
    ActionDebouncer::new(
        DebouncePolicy::Tap {
            cooldown: Duration::from_millis(200),
            tap_duration: Duration::from_millis(50),
        },
        AmbiguousPolicy::Hold,
        ProfileKind::Runner.default_bindings(),
    )
}

fn ms(start: Instant, offset: u64) -> Instant {
    start + Duration::from_millis(offset)
}

#[test]
fn test_same_action_presses_once() {
    let mut debouncer = hold_debouncer(AmbiguousPolicy::Hold);
    let mut injector = RecordingInjector::new();
    let now = Instant::now();

    debouncer.update(Action::Gas, now, &mut injector).unwrap();
    let second = debouncer.update(Action::Gas, now, &mut injector).unwrap();

    assert!(second.is_empty());
    assert_eq!(injector.presses(), vec![Key::Right]);
    assert!(injector.releases().is_empty());
    assert_eq!(debouncer.active(), Some(Action::Gas));
}

#[test]
fn test_transition_releases_before_press() {
    let mut debouncer = hold_debouncer(AmbiguousPolicy::Hold);
    let mut injector = RecordingInjector::new();
    let now = Instant::now();

    debouncer.update(Action::Gas, now, &mut injector).unwrap();
    let events = debouncer.update(Action::Brake, now, &mut injector).unwrap();

    assert_eq!(
        events,
        vec![KeyEvent::release(Key::Right), KeyEvent::press(Key::Left)]
    );
    assert_eq!(
        injector.events(),
        vec![
            KeyEvent::press(Key::Right),
            KeyEvent::release(Key::Right),
            KeyEvent::press(Key::Left),
        ]
    );
    assert_eq!(injector.held_keys(), vec![Key::Left]);
    assert_eq!(debouncer.held_keys(), &[Key::Left]);
}

#[test]
fn test_never_two_key_sets_held() {
    let mut debouncer = hold_debouncer(AmbiguousPolicy::Hold);
    let mut injector = RecordingInjector::new();
    let now = Instant::now();

    let sequence = [
        Action::Gas,
        Action::Brake,
        Action::LeanForward,
        Action::None,
        Action::Gas,
        Action::Idle,
        Action::Brake,
    ];
    for action in sequence {
        debouncer.update(action, now, &mut injector).unwrap();
        assert!(injector.held_keys().len() <= 1);
        assert_eq!(injector.held_keys(), debouncer.held_keys().to_vec());
    }
}

#[test]
fn test_idle_releases_active_keys() {
    let mut debouncer = hold_debouncer(AmbiguousPolicy::Hold);
    let mut injector = RecordingInjector::new();
    let now = Instant::now();

    debouncer.update(Action::LeanForward, now, &mut injector).unwrap();
    let events = debouncer.update(Action::Idle, now, &mut injector).unwrap();

    assert_eq!(events, vec![KeyEvent::release(Key::Up)]);
    assert_eq!(debouncer.active(), None);

    // Nothing active, nothing to release
    let events = debouncer.update(Action::Idle, now, &mut injector).unwrap();
    assert!(events.is_empty());
}

#[test]
fn test_ambiguous_holds_by_default() {
    let mut debouncer = hold_debouncer(AmbiguousPolicy::Hold);
    let mut injector = RecordingInjector::new();
    let now = Instant::now();

    debouncer.update(Action::Gas, now, &mut injector).unwrap();
    let events = debouncer.update(Action::None, now, &mut injector).unwrap();

    assert!(events.is_empty());
    assert_eq!(debouncer.active(), Some(Action::Gas));

    // Returning to the held gesture does not press again
    debouncer.update(Action::Gas, now, &mut injector).unwrap();
    assert_eq!(injector.presses(), vec![Key::Right]);
}

#[test]
fn test_ambiguous_release_policy() {
    let mut debouncer = hold_debouncer(AmbiguousPolicy::Release);
    let mut injector = RecordingInjector::new();
    let now = Instant::now();

    debouncer.update(Action::Gas, now, &mut injector).unwrap();
    let events = debouncer.update(Action::None, now, &mut injector).unwrap();

    assert_eq!(events, vec![KeyEvent::release(Key::Right)]);
    assert_eq!(debouncer.active(), None);
}

#[test]
fn test_shutdown_releases_full_vocabulary_once() {
    let mut debouncer = hold_debouncer(AmbiguousPolicy::Hold);
    let mut injector = RecordingInjector::new();
    let now = Instant::now();

    debouncer.update(Action::Brake, now, &mut injector).unwrap();
    debouncer.update(Action::Gas, now, &mut injector).unwrap();
    injector.clear();

    let events = debouncer.shutdown(&mut injector).unwrap();

    assert_eq!(events.len(), Key::ALL.len());
    let mut released = injector.releases();
    released.sort();
    assert_eq!(released, Key::ALL.to_vec());
    assert!(injector.presses().is_empty());
    assert_eq!(debouncer.active(), None);
}

#[test]
fn test_shutdown_with_nothing_active() {
    let mut debouncer = tap_debouncer();
    let mut injector = RecordingInjector::new();

    debouncer.shutdown(&mut injector).unwrap();
    assert_eq!(injector.releases().len(), 4);
}

#[test]
fn test_tap_cooldown_suppresses_repeat() {
    let mut debouncer = tap_debouncer();
    let mut injector = RecordingInjector::new();
    let start = Instant::now();

    let first = debouncer.update(Action::Jump, start, &mut injector).unwrap();
    assert_eq!(first, vec![KeyEvent::press(Key::Up)]);

    // Within the cooldown: the pending release fires, no new press
    let second = debouncer
        .update(Action::Jump, ms(start, 100), &mut injector)
        .unwrap();
    assert_eq!(second, vec![KeyEvent::release(Key::Up)]);
    assert_eq!(injector.presses().len(), 1);

    // After the cooldown a new tap starts
    let third = debouncer
        .update(Action::Jump, ms(start, 250), &mut injector)
        .unwrap();
    assert_eq!(third, vec![KeyEvent::press(Key::Up)]);
    assert_eq!(injector.presses(), vec![Key::Up, Key::Up]);
    assert_eq!(injector.releases(), vec![Key::Up]);
}

#[test]
fn test_tap_release_waits_for_duration() {
    let mut debouncer = tap_debouncer();
    let mut injector = RecordingInjector::new();
    let start = Instant::now();

    debouncer.update(Action::Slide, start, &mut injector).unwrap();

    assert!(debouncer.poll(ms(start, 20), &mut injector).unwrap().is_empty());
    assert_eq!(debouncer.active(), Some(Action::Slide));

    let events = debouncer.poll(ms(start, 50), &mut injector).unwrap();
    assert_eq!(events, vec![KeyEvent::release(Key::Down)]);
    assert_eq!(debouncer.active(), None);
}

#[test]
fn test_tap_cooldown_is_shared_across_actions() {
    let mut debouncer = tap_debouncer();
    let mut injector = RecordingInjector::new();
    let start = Instant::now();

    debouncer.update(Action::MoveLeft, start, &mut injector).unwrap();
    debouncer
        .update(Action::MoveRight, ms(start, 150), &mut injector)
        .unwrap();
    assert_eq!(injector.presses(), vec![Key::Left]);

    debouncer
        .update(Action::MoveRight, ms(start, 210), &mut injector)
        .unwrap();
    assert_eq!(injector.presses(), vec![Key::Left, Key::Right]);
    assert_eq!(injector.releases(), vec![Key::Left]);
}

#[test]
fn test_tap_idle_lets_tap_finish() {
    let mut debouncer = tap_debouncer();
    let mut injector = RecordingInjector::new();
    let start = Instant::now();

    debouncer.update(Action::Jump, start, &mut injector).unwrap();
    let early = debouncer
        .update(Action::Idle, ms(start, 30), &mut injector)
        .unwrap();
    assert!(early.is_empty());

    let late = debouncer
        .update(Action::Idle, ms(start, 60), &mut injector)
        .unwrap();
    assert_eq!(late, vec![KeyEvent::release(Key::Up)]);
}
