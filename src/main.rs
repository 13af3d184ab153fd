use dungeon_patrol::backend::MacroquadBackend;
use dungeon_patrol::platform::Flow;
use dungeon_patrol::timing::FixedTimestep;
use dungeon_patrol::{Game, GameConfig};
use macroquad::prelude::*;

// ==================== Window configuration ====================

fn window_conf() -> Conf {
    GameConfig::default().window_conf()
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();

    if let Err(e) = run(GameConfig::default()).await {
        tracing::error!(error = %e, "game aborted");
    }
}

async fn run(config: GameConfig) -> anyhow::Result<()> {
    config.validate()?;

    let mut backend = MacroquadBackend::load(&config.asset_dir).await;
    let mut timestep = FixedTimestep::from_fps(config.target_fps);
    let mut game = Game::new(config);

    let mut last_mouse = Vec2::from(mouse_position());

    loop {
        // Input
        let mouse = Vec2::from(mouse_position());
        if mouse != last_mouse {
            game.on_mouse_move(mouse);
            last_mouse = mouse;
        }
        if let Some(key) = get_last_key_pressed() {
            game.on_key_down(key);
        }
        if is_mouse_button_pressed(MouseButton::Left)
            && game.on_mouse_down(mouse, &mut backend) == Flow::Quit
        {
            break;
        }

        // Logic
        timestep.accumulate(get_frame_time());
        while timestep.should_step() {
            game.update(&mut backend);
        }

        // Render
        clear_background(BLACK);
        game.draw(&mut backend);

        next_frame().await
    }

    tracing::info!("shutting down");
    Ok(())
}
