//! Snapshot read model as a host UI would consume it.

use idle_core::{
    action::Action,
    config::EngineConfig,
    engine::GameEngine,
    flag::{Flag, FlagHooks},
};

fn build() -> GameEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    GameEngine::new(EngineConfig { message_display_limit: 3, ..EngineConfig::default_test() })
}

#[test]
fn snapshot_lists_only_active_resources_and_buttons() {
    let mut engine = build();
    let wood = engine.state.resources.define("wood", 2.0);
    let _idle = engine.state.resources.define("iron", 0.0);
    let chop = engine.state.buttons.define("Chop", vec![Action::add_resource(wood, 1.0)]);
    let _unused = engine.state.buttons.define("Smelt", vec![]);

    engine.perform_actions([Action::EnableButton(chop)]).unwrap();
    engine.press_button(chop).unwrap();

    let snap = engine.snapshot();
    assert_eq!(snap.resources.len(), 1);
    assert_eq!(snap.resources[0].name, "wood");
    assert_eq!(snap.resources[0].amount, 3.0);
    assert_eq!(snap.buttons.len(), 1);
    assert_eq!(snap.buttons[0].label, "Chop");
    assert_eq!(snap.visible_buttons().count(), 1);
}

#[test]
fn snapshot_truncates_messages_to_display_limit() {
    let mut engine = build();
    for i in 0..5 {
        engine.perform_actions([Action::message(format!("m{i}"))]).unwrap();
    }

    let snap = engine.snapshot();
    let shown: Vec<&str> = snap.messages.iter().map(|m| m.content()).collect();
    assert_eq!(shown, vec!["m4", "m3", "m2"]);
    assert_eq!(engine.state.messages.len(), 5, "the log itself is not truncated");
}

#[test]
fn snapshot_serializes_flags_and_counts() {
    let mut engine = build();
    let alter_time: Flag<bool> = engine.state.flags.define("alter_time", FlagHooks::noop());
    let _unset: Flag<u32> = engine.state.flags.define("era", FlagHooks::noop());
    engine
        .perform_actions([alter_time.set(true), Action::enqueue(Action::message("soon"), 5)])
        .unwrap();

    let json = serde_json::to_value(engine.snapshot()).unwrap();
    assert_eq!(json["time"], 0);
    assert_eq!(json["paused"], false);
    assert_eq!(json["flags"].as_array().map(Vec::len), Some(1), "unset flags are omitted");
    assert_eq!(json["flags"][0]["name"], "alter_time");
    assert_eq!(json["flags"][0]["value"], true);
    assert_eq!(json["queued_actions"], 1);
    assert_eq!(json["pending_conditions"], 0);
}

#[test]
fn flags_sharing_a_name_both_appear() {
    let mut engine = build();
    let first: Flag<u32> = engine.state.flags.define("level", FlagHooks::noop());
    let second: Flag<u32> = engine.state.flags.define("level", FlagHooks::noop());
    engine.perform_actions([first.set(1), second.set(2)]).unwrap();

    let snap = engine.snapshot();
    let ids: Vec<_> = snap.flags.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
    assert_eq!(snap.flag("level"), Some(&serde_json::json!(1)));
}
