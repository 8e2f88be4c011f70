//! Delayed actions, queue draining and the clock.
//!
//! The countdown is pre-decrement: a delay of `d` fires on the `d`-th
//! call, so a delay of 1 fires immediately.

use idle_core::{
    action::Action,
    config::EngineConfig,
    engine::GameEngine,
    message::Message,
    queue::DelayedAction,
};

fn build() -> GameEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    GameEngine::new(EngineConfig::default_test())
}

fn contents(engine: &GameEngine) -> Vec<String> {
    engine.state.messages.iter().map(|m| m.content().to_string()).collect()
}

#[test]
fn delayed_action_fires_on_exactly_the_dth_call() {
    for d in 1..=6u64 {
        let mut engine = build();
        let mut delayed = DelayedAction::new(Action::message("go"), d);

        for call in 1..d {
            let fired = delayed.perform(&mut engine).unwrap();
            assert!(!fired, "delay {d} fired early on call {call}");
            assert!(engine.state.messages.is_empty(), "action ran before firing (delay {d})");
        }

        assert!(delayed.perform(&mut engine).unwrap(), "delay {d} did not fire on call {d}");
        assert_eq!(engine.state.messages.len(), 1);
    }
}

#[test]
fn enqueued_message_appears_on_second_tick() {
    let mut engine = build();
    assert_eq!(engine.state.time(), 0);
    assert!(engine.state.queue.is_empty());

    engine.perform_actions([Action::enqueue(Action::message("hi"), 2)]).unwrap();

    engine.tick().unwrap();
    assert!(engine.state.messages.is_empty(), "fired a tick early");

    engine.tick().unwrap();
    let log: Vec<&Message> = engine.state.messages.iter().collect();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].content(), "hi");
    assert_eq!(log[0].time(), 2);
    assert!(engine.state.queue.is_empty(), "fired entry should be removed");
}

#[test]
fn enqueue_does_not_run_the_action() {
    let mut engine = build();
    engine.perform_actions([Action::enqueue(Action::message("later"), 1)]).unwrap();

    assert!(engine.state.messages.is_empty());
    assert_eq!(engine.state.queue.len(), 1);
    assert_eq!(engine.state.time(), 0);
}

#[test]
fn entries_due_on_the_same_tick_fire_in_insertion_order() {
    let mut engine = build();
    engine
        .perform_actions([
            Action::enqueue(Action::message("a"), 2),
            Action::enqueue(Action::message("b"), 2),
        ])
        .unwrap();

    engine.tick().unwrap();
    engine.tick().unwrap();

    // Newest first: "b" fired after "a".
    assert_eq!(contents(&engine), vec!["b", "a"]);
}

#[test]
fn fire_tick_depends_only_on_each_countdown() {
    let mut engine = build();
    engine
        .perform_actions([
            Action::enqueue(Action::message("slow"), 3),
            Action::enqueue(Action::message("fast"), 1),
        ])
        .unwrap();

    engine.tick().unwrap();
    assert_eq!(contents(&engine), vec!["fast"]);
    let remaining: Vec<u64> = engine.state.queue.iter().map(DelayedAction::delay).collect();
    assert_eq!(remaining, vec![2], "retained entry keeps its decremented delay");

    engine.tick().unwrap();
    engine.tick().unwrap();
    assert_eq!(contents(&engine), vec!["slow", "fast"]);
}

#[test]
fn entries_enqueued_while_draining_wait_for_the_next_tick() {
    let mut engine = build();
    let chained = Action::enqueue(Action::message("echo"), 1);
    engine.perform_actions([Action::enqueue(chained, 1)]).unwrap();

    engine.tick().unwrap();
    assert!(engine.state.messages.is_empty());
    assert_eq!(engine.state.queue.len(), 1);

    engine.tick().unwrap();
    assert_eq!(engine.state.messages.latest().map(Message::time), Some(2));
}

#[test]
fn failing_entry_keeps_the_rest_of_the_queue() {
    let mut engine = build();
    let hidden = engine.state.buttons.define("Hidden", vec![]);
    engine
        .perform_actions([
            Action::enqueue(Action::DisableButton(hidden), 1),
            Action::enqueue(Action::message("survivor"), 2),
        ])
        .unwrap();

    assert!(engine.tick().is_err());
    let remaining: Vec<u64> = engine.state.queue.iter().map(DelayedAction::delay).collect();
    assert_eq!(remaining, vec![2], "un-attempted entry keeps its delay");

    engine.tick().unwrap();
    engine.tick().unwrap();
    assert_eq!(contents(&engine), vec!["survivor"]);
}

#[test]
fn time_increments_by_one_per_tick() {
    let mut engine = build();
    for expected in 1..=10 {
        engine.tick().unwrap();
        assert_eq!(engine.state.time(), expected);
    }
}

#[test]
fn tick_runs_even_when_paused() {
    let mut engine = build();
    assert!(engine.toggle_pause());
    engine.perform_actions([Action::pass_time(2)]).unwrap();
    assert_eq!(engine.state.time(), 2);
}

#[test]
fn pump_converts_real_time_into_ticks() {
    let mut engine = build();

    assert_eq!(engine.pump(2500).unwrap(), 2);
    assert_eq!(engine.state.time(), 2);

    engine.toggle_pause();
    assert_eq!(engine.pump(5000).unwrap(), 0, "paused clock must not tick");

    engine.toggle_pause();
    engine.set_time_factor(2.0).unwrap();
    assert_eq!(engine.pump(1000).unwrap(), 2);
    assert_eq!(engine.state.time(), 4);
}

#[test]
fn start_paused_config_is_honoured() {
    let config = EngineConfig { start_paused: true, time_factor: 3.0, ..EngineConfig::default_test() };
    let mut engine = GameEngine::new(config);
    assert!(engine.state.clock.paused);
    assert_eq!(engine.state.clock.time_factor(), 3.0);
    assert_eq!(engine.pump(10_000).unwrap(), 0);
}

#[test]
fn invalid_time_factor_is_rejected() {
    let mut engine = build();
    assert!(engine.set_time_factor(-1.0).is_err());
    assert_eq!(engine.state.clock.time_factor(), 1.0);
}

#[test]
fn queued_pass_time_counts_down_the_other_entries() {
    let mut engine = build();
    engine
        .perform_actions([
            Action::enqueue(Action::pass_time(1), 1),
            Action::enqueue(Action::message("c"), 1),
            Action::enqueue(Action::message("b"), 2),
        ])
        .unwrap();

    engine.tick().unwrap();

    assert_eq!(engine.state.time(), 2);
    let fired: Vec<(String, u64)> = engine
        .state
        .messages
        .iter()
        .map(|m| (m.content().to_string(), m.time()))
        .collect();
    assert_eq!(fired, vec![("b".to_string(), 2), ("c".to_string(), 1)]);
    assert!(engine.state.queue.is_empty(), "every entry saw both ticks");
}

#[test]
fn queued_pass_time_leaves_later_entries_with_correct_delays() {
    let mut engine = build();
    engine
        .perform_actions([
            Action::enqueue(Action::message("early"), 4),
            Action::enqueue(Action::pass_time(2), 1),
            Action::enqueue(Action::message("late"), 5),
        ])
        .unwrap();

    engine.tick().unwrap();

    assert_eq!(engine.state.time(), 3);
    let remaining: Vec<u64> = engine.state.queue.iter().map(DelayedAction::delay).collect();
    assert_eq!(remaining, vec![1, 2]);
}

#[test]
fn delayed_variant_keeps_its_countdown_between_performs() {
    for d in 1..=4u64 {
        let mut engine = build();
        let mut delayed = Action::delayed(Action::message("go"), d);

        for call in 1..d {
            delayed.perform(&mut engine).unwrap();
            assert!(engine.state.messages.is_empty(), "delay {d} fired early on call {call}");
        }
        delayed.perform(&mut engine).unwrap();
        assert_eq!(engine.state.messages.len(), 1, "delay {d} did not fire on call {d}");
    }
}

#[test]
fn delayed_variant_inside_bulk_keeps_its_countdown() {
    let mut engine = build();
    let mut bulk = Action::bulk([Action::message("tick"), Action::delayed(Action::message("boom"), 3)]);

    bulk.perform(&mut engine).unwrap();
    bulk.perform(&mut engine).unwrap();
    assert!(engine.state.messages.iter().all(|m| m.content() == "tick"));

    bulk.perform(&mut engine).unwrap();
    assert_eq!(contents(&engine), vec!["boom", "tick", "tick", "tick"]);
}
