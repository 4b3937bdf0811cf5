//! Telephone Call
//!
//! This example wires a phone call through a hierarchical state machine.
//!
//! Key concepts:
//! - Parameterized triggers (the callee number, the volume level)
//! - Entry and exit hooks (a call timer)
//! - Internal transitions (mute/unmute without leaving the call)
//! - Substates inheriting transitions (OnHold inside Connected)
//!
//! Run with: cargo run --example phone_call
//! Set RUST_LOG=hsm=debug to see the engine's own tracing.

use chrono::Utc;
use hsm::{
    state_enum, trigger_enum, FireError, StateMachine, StateMachineBuilder, Transition,
    TypedTrigger,
};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum CallState {
        OffHook,
        Ringing,
        Connected,
        OnHold,
        PhoneDestroyed,
    }
}

trigger_enum! {
    enum CallTrigger {
        CallDialed,
        CallConnected,
        LeftMessage,
        PlacedOnHold,
        TakenOffHold,
        PhoneHurledAgainstWall,
        MuteMicrophone,
        UnmuteMicrophone,
        SetVolume,
    }
}

struct PhoneCall {
    caller: String,
    callee: Arc<Mutex<Option<String>>>,
    machine: StateMachine<CallState, CallTrigger>,
    set_volume: TypedTrigger<CallTrigger, i32>,
    set_callee: TypedTrigger<CallTrigger, String>,
}

impl PhoneCall {
    fn new(caller: &str) -> Self {
        let callee = Arc::new(Mutex::new(None));
        let mut builder = StateMachineBuilder::new(CallState::OffHook);

        let set_volume = builder.set_trigger_parameters::<i32>(CallTrigger::SetVolume);
        let set_callee = builder.set_trigger_parameters::<String>(CallTrigger::CallDialed);

        builder
            .configure(CallState::OffHook)
            .permit(CallTrigger::CallDialed, CallState::Ringing);

        let dialed = Arc::clone(&callee);
        builder
            .configure(CallState::Ringing)
            .on_entry_from_typed(
                &set_callee,
                move |number: &String, _t: &Transition<_, _>| {
                    *dialed.lock().unwrap() = Some(number.clone());
                    println!("[Phone Call] placed for : [{number}]");
                },
            )
            .described("Caller number to call")
            .permit(CallTrigger::CallConnected, CallState::Connected);

        builder
            .configure(CallState::Connected)
            .on_entry(|_t: &Transition<_, _>| {
                println!("[Timer:] Call started at {}", Utc::now())
            })
            .on_exit(|_t: &Transition<_, _>| {
                println!("[Timer:] Call ended at {}", Utc::now())
            })
            .internal_transition(CallTrigger::MuteMicrophone, |_t: &Transition<_, _>| {
                println!("Microphone muted!")
            })
            .internal_transition(CallTrigger::UnmuteMicrophone, |_t: &Transition<_, _>| {
                println!("Microphone unmuted!")
            })
            .internal_transition_typed(&set_volume, |volume: &i32, _t: &Transition<_, _>| {
                println!("Volume set to {volume}!")
            })
            .permit(CallTrigger::LeftMessage, CallState::OffHook)
            .permit(CallTrigger::PlacedOnHold, CallState::OnHold);

        builder
            .configure(CallState::OnHold)
            .substate_of(CallState::Connected)
            .permit(CallTrigger::TakenOffHold, CallState::Connected)
            .permit(
                CallTrigger::PhoneHurledAgainstWall,
                CallState::PhoneDestroyed,
            );

        builder.on_transitioned(|t| {
            let parameters = t
                .parameters
                .as_ref()
                .map(|p| format!("{p:?}"))
                .unwrap_or_default();
            println!(
                "OnTransitioned: {:?} -> {:?} via {:?}({parameters})",
                t.source, t.destination, t.trigger
            );
        });

        let machine = builder.build().expect("phone call configuration is valid");

        Self {
            caller: caller.to_string(),
            callee,
            machine,
            set_volume,
            set_callee,
        }
    }

    fn dialed(&mut self, callee: &str) -> Result<(), FireError> {
        self.machine.fire_with(&self.set_callee, callee.to_string())
    }

    fn set_volume(&mut self, volume: i32) -> Result<(), FireError> {
        self.machine.fire_with(&self.set_volume, volume)
    }

    fn print(&self) {
        println!(
            "[{}] placed call to [{}] and [Status:] {:?}",
            self.caller,
            self.callee.lock().unwrap().as_deref().unwrap_or("nobody"),
            self.machine.current_state()
        );
    }
}

fn main() -> Result<(), FireError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Telephone Call Example ===\n");

    let mut call = PhoneCall::new("Lokesh");
    call.print();

    call.dialed("Prameela")?;
    call.print();

    call.machine.fire(CallTrigger::CallConnected)?;
    call.print();

    call.set_volume(2)?;
    call.machine.fire(CallTrigger::MuteMicrophone)?;
    call.machine.fire(CallTrigger::UnmuteMicrophone)?;
    call.set_volume(11)?;

    call.machine.fire(CallTrigger::PlacedOnHold)?;
    call.print();

    call.machine.fire(CallTrigger::TakenOffHold)?;
    call.print();

    call.machine.fire(CallTrigger::PlacedOnHold)?;
    call.machine.fire(CallTrigger::PhoneHurledAgainstWall)?;
    call.print();

    match call.machine.fire(CallTrigger::TakenOffHold) {
        Err(err) => println!("Rejected: {err}"),
        Ok(()) => println!("A destroyed phone came off hold?"),
    }

    let graph = call.machine.info();
    println!("\nConfigured transitions:");
    for transition in &graph.transitions {
        println!(
            "  {:?} --{:?}--> {:?} ({:?})",
            transition.source, transition.trigger, transition.destination, transition.kind
        );
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
