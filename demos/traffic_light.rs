//! Traffic Light
//!
//! A controller cycles a light while cars wait for green on their own
//! threads.
//!
//! Run with: cargo run --example traffic_light

use state_gate::{state_enum, StateSet};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

state_enum! {
    enum TrafficLight {
        Red,
        Yellow,
        Green,
    }
}

fn main() {
    println!("=== Traffic Light ===\n");

    let light = Arc::new(
        StateSet::new(TrafficLight::Red, [TrafficLight::Green, TrafficLight::Yellow])
            .expect("states are distinct"),
    );

    let cars: Vec<_> = (1..=3)
        .map(|car| {
            let light = Arc::clone(&light);
            thread::spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .expect("runtime");
                runtime
                    .block_on(light.wait_for(&CancellationToken::new(), &TrafficLight::Green))
                    .expect("light was released");
                println!("car {car}: go");
            })
        })
        .collect();

    for next in [TrafficLight::Green, TrafficLight::Yellow, TrafficLight::Red] {
        thread::sleep(Duration::from_millis(50));
        light.transit(&next).expect("registered state");
        println!("light: {:?}", light.current());
    }

    for car in cars {
        car.join().expect("car thread panicked");
    }

    println!("\nCycle: {:?}", light.history().get_path());
    println!("\n=== Example Complete ===");
}
