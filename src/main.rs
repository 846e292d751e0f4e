use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use nimbus_gestures::{refresh_callback, PointerKind, RawPointerEvent};
use nimbus_haptics::LogSink;
use nimbus_weather::WeatherSnapshot;
use parking_lot::Mutex;

/// Replays a short scripted session: a pull-to-refresh, a swipe to the next
/// screen, and two weather readings.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    nimbus_core::init()?;

    let mut app = nimbus_core::App::new()?;
    tracing::info!("Nimbus interaction demo started");

    println!("Nimbus - Gesture & Haptics Engine");
    println!("\nConfiguration:");
    println!("  Config directory: {}", app.config().config_dir.display());
    println!("  Screens: {}", app.config().screens.order.join(" -> "));

    let mut interaction = app.interaction(Arc::new(|| true), Box::new(LogSink))?;
    interaction.set_on_refresh(refresh_callback(|| async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(())
    }));
    interaction.on_swipe_left(|| tracing::info!("Next screen requested"));
    interaction.on_swipe_right(|| tracing::info!("Previous screen requested"));
    let interaction = Mutex::new(interaction);

    let base = app.now();
    let at = |ms: u64| base + Duration::from_millis(ms);
    let script = [
        // Pull down from the top of the list
        RawPointerEvent::new(PointerKind::Start, 180., 120., at(0)),
        RawPointerEvent::new(PointerKind::Move, 182., 200., at(120)),
        RawPointerEvent::new(PointerKind::Move, 184., 300., at(240)),
        RawPointerEvent::new(PointerKind::End, 184., 300., at(300)),
        // Quick flick to the left
        RawPointerEvent::new(PointerKind::Start, 320., 400., at(1_000)),
        RawPointerEvent::new(PointerKind::Move, 240., 404., at(1_060)),
        RawPointerEvent::new(PointerKind::End, 160., 408., at(1_140)),
    ];

    for event in script {
        for semantic in interaction.lock().handle(event) {
            println!("  {:?}", semantic);
        }
    }

    if let Some(resolved) = nimbus_core::run_refresh(&interaction, || app.now()).await {
        println!("  {:?}", resolved);
    }

    let now = Local::now().time();
    let morning = WeatherSnapshot {
        code: 1,
        temperature: 14.,
        wind_speed: 8.,
        humidity: 70.,
        pressure: 1016.,
    };
    let squall = WeatherSnapshot {
        code: 81,
        temperature: 9.,
        wind_speed: 32.,
        ..morning
    };
    for (offset, snapshot) in [(0, morning), (2_000, squall)] {
        let outcome = interaction
            .lock()
            .weather_update(&snapshot, now, app.now() + Duration::from_millis(offset));
        println!("  weather code {} -> {:?}", snapshot.code, outcome);
    }

    println!("\nNow showing: {}", interaction.lock().current_screen());

    // Graceful shutdown
    app.shutdown()?;

    Ok(())
}
