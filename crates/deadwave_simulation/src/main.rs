//! Headless симуляция DEADWAVE
//!
//! Запускает матч без рендера: игрок с пистолетом против волны зомби.

use bevy::prelude::*;
use deadwave_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting DEADWAVE headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    // Игрок + spawner волны
    let loadout = spawn_player(&mut app.world_mut().commands(), Vec3::ZERO);
    app.world_mut().commands().spawn((
        EnemySpawner::new(Vec2::new(-20.0, -20.0), Vec2::new(20.0, 20.0), 10),
        Transform::default(),
    ));
    app.world_mut().flush();

    // Прогоняем 3600 тиков (60 sec при 60Hz)
    for block in 0..36 {
        run_fixed_ticks(&mut app, 100);

        if block % 6 == 0 {
            let hud = app.world().resource::<HudDisplay>();
            println!(
                "Tick {}: hp={} ammo={} mags={} score={} countdown={}",
                block * 100 + 100,
                hud.health,
                hud.ammo,
                hud.magazines,
                hud.score,
                hud.countdown
            );
        }

        // Симулируем стрельбу игрока: pull + release раз в блок
        app.world_mut().send_event(TriggerPulled {
            weapon: loadout.weapon,
        });
        app.world_mut().send_event(TriggerReleased {
            weapon: loadout.weapon,
        });
        app.world_mut().send_event(ReloadIntent {
            weapon: loadout.weapon,
        });
    }

    let state = app.world().resource::<GameState>();
    let score = app.world().resource::<PlayerScore>();
    println!("Simulation complete! state={:?} score={}", state, score.value);
}
