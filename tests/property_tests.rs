//! Property-based tests for the transition engine.
//!
//! These tests use proptest to fire random trigger sequences at a
//! hierarchical machine and check the invariants that must hold after
//! every call.

use hsm::{state_enum, trigger_enum, StateMachine, StateMachineBuilder, Transition};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

state_enum! {
    enum TestState {
        Idle,
        Active,
        Paused,
        Deep,
        Done,
    }
}

trigger_enum! {
    enum TestTrigger {
        Start,
        Pause,
        Dive,
        Resume,
        Finish,
        Ping,
        Reset,
    }
}

type Log = Arc<Mutex<Vec<String>>>;

/// Idle -> Active; Paused is a substate of Active and Deep of Paused.
fn machine() -> (StateMachine<TestState, TestTrigger>, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let mut builder = StateMachineBuilder::new(TestState::Idle);

    for state in [
        TestState::Idle,
        TestState::Active,
        TestState::Paused,
        TestState::Deep,
        TestState::Done,
    ] {
        let entry = Arc::clone(&log);
        let exit = Arc::clone(&log);
        builder
            .configure(state)
            .on_entry(move |_t: &Transition<_, _>| {
                entry.lock().unwrap().push(format!("enter {state:?}"))
            })
            .on_exit(move |_t: &Transition<_, _>| {
                exit.lock().unwrap().push(format!("exit {state:?}"))
            });
    }

    let ping = Arc::clone(&log);
    builder
        .configure(TestState::Idle)
        .permit(TestTrigger::Start, TestState::Active);
    builder
        .configure(TestState::Active)
        .permit(TestTrigger::Pause, TestState::Paused)
        .permit(TestTrigger::Finish, TestState::Done)
        .internal_transition(TestTrigger::Ping, move |_t: &Transition<_, _>| {
            ping.lock().unwrap().push("ping".to_string())
        });
    builder
        .configure(TestState::Paused)
        .substate_of(TestState::Active)
        .permit(TestTrigger::Dive, TestState::Deep)
        .permit(TestTrigger::Resume, TestState::Active);
    builder
        .configure(TestState::Deep)
        .substate_of(TestState::Paused)
        .permit_reentry(TestTrigger::Dive);
    builder
        .configure(TestState::Done)
        .permit(TestTrigger::Reset, TestState::Idle);

    let observed = Arc::clone(&log);
    builder.on_transitioned(move |_t| {
        observed.lock().unwrap().push("observed".to_string())
    });

    (builder.build().unwrap(), log)
}

prop_compose! {
    fn arbitrary_trigger()(variant in 0..7u8) -> TestTrigger {
        match variant {
            0 => TestTrigger::Start,
            1 => TestTrigger::Pause,
            2 => TestTrigger::Dive,
            3 => TestTrigger::Resume,
            4 => TestTrigger::Finish,
            5 => TestTrigger::Ping,
            _ => TestTrigger::Reset,
        }
    }
}

proptest! {
    #[test]
    fn rejected_triggers_change_nothing(
        triggers in prop::collection::vec(arbitrary_trigger(), 1..40)
    ) {
        let (mut machine, log) = machine();

        for trigger in triggers {
            let before = machine.current_state();
            let logged = log.lock().unwrap().len();
            let permitted = machine.can_fire(&trigger);

            let result = machine.fire(trigger);

            prop_assert_eq!(result.is_ok(), permitted);
            if let Err(err) = result {
                prop_assert!(err.is_invalid_transition());
                prop_assert_eq!(machine.current_state(), before);
                prop_assert_eq!(log.lock().unwrap().len(), logged);
            }
        }
    }

    #[test]
    fn every_successful_fire_ends_with_one_observation(
        triggers in prop::collection::vec(arbitrary_trigger(), 1..40)
    ) {
        let (mut machine, log) = machine();

        for trigger in triggers {
            let logged = log.lock().unwrap().len();
            if machine.fire(trigger).is_ok() {
                let entries = log.lock().unwrap();
                let added = &entries[logged..];
                prop_assert_eq!(added.last().map(String::as_str), Some("observed"));
                prop_assert_eq!(added.iter().filter(|e| *e == "observed").count(), 1);
            }
        }
    }

    #[test]
    fn ping_never_runs_entry_or_exit_hooks(
        triggers in prop::collection::vec(arbitrary_trigger(), 0..20)
    ) {
        let (mut machine, log) = machine();
        for trigger in triggers {
            let _ = machine.fire(trigger);
        }

        let before = machine.current_state();
        let logged = log.lock().unwrap().len();
        if machine.fire(TestTrigger::Ping).is_ok() {
            prop_assert_eq!(machine.current_state(), before);
            let entries = log.lock().unwrap();
            prop_assert_eq!(
                &entries[logged..],
                &["ping".to_string(), "observed".to_string()][..]
            );
        }
    }

    #[test]
    fn current_state_is_always_in_itself_and_its_ancestors(
        triggers in prop::collection::vec(arbitrary_trigger(), 0..40)
    ) {
        let (mut machine, _log) = machine();
        for trigger in triggers {
            let _ = machine.fire(trigger);

            let current = machine.current_state();
            prop_assert!(machine.is_in_state(&current));
            let nested = matches!(current, TestState::Paused | TestState::Deep);
            prop_assert_eq!(
                machine.is_in_state(&TestState::Active),
                nested || current == TestState::Active
            );
        }
    }

    #[test]
    fn exits_precede_entries(
        triggers in prop::collection::vec(arbitrary_trigger(), 1..40)
    ) {
        let (mut machine, log) = machine();

        for trigger in triggers {
            let logged = log.lock().unwrap().len();
            if machine.fire(trigger).is_ok() {
                let entries = log.lock().unwrap();
                let added = &entries[logged..];
                let last_exit = added.iter().rposition(|e| e.starts_with("exit"));
                let first_entry = added.iter().position(|e| e.starts_with("enter"));
                if let (Some(exit), Some(entry)) = (last_exit, first_entry) {
                    prop_assert!(exit < entry);
                }
            }
        }
    }
}
