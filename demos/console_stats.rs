use accretion_engine::{SimulationConfig, Stepper, World};
use std::io::{stdout, Write};
use std::thread::sleep;
use std::time::{Duration, Instant};
use crossterm::{
    ExecutableCommand, QueueableCommand,
    terminal::{Clear, ClearType, size},
    cursor::{Hide, Show, MoveTo},
    style::{Color, Print, SetForegroundColor, ResetColor},
};

const FRAME_DURATION: Duration = Duration::from_millis(33); // ~30 FPS
const SIMULATION_DURATION: f32 = 20.0; // seconds
const HEADER_ROWS: u16 = 3;
const GENERATION_COLORS: [Color; 5] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Magenta,
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = stdout();
    stdout.execute(Hide)?;

    let (width, height) = size()?;

    let config = SimulationConfig {
        gravitational_constant: -5.0,
        global_radius: 300.0,
        initial_distance_from_origin: 30.0,
        particle_count: 400,
        ..SimulationConfig::default()
    };
    let half_extent = config.global_radius;

    let mut world = World::new(config)?;
    let feed = world.statistics_feed();
    let mut stepper = Stepper::new();

    let start_time = Instant::now();
    let mut frame_time = Instant::now();

    while start_time.elapsed().as_secs_f32() < SIMULATION_DURATION {
        stepper.tick(&mut world)?;

        stdout.queue(Clear(ClearType::All))?;

        // Statistics are read through the feed the same way another thread would
        let stats = feed.snapshot();
        let average = stats
            .system_average_speed
            .map(|speed| format!("{:.3}", speed))
            .unwrap_or_else(|| "n/a".to_string());
        stdout
            .queue(MoveTo(0, 0))?
            .queue(Print(format!(
                "t = {:6.2}s  steps = {:6}  bodies = {:5}  avg speed = {}",
                world.elapsed_time(),
                world.step_count(),
                stats.remaining_particles,
                average
            )))?;

        // Top-down projection onto the x/y plane
        let rows = height.saturating_sub(HEADER_ROWS).max(1) as f64;
        let cols = width.max(1) as f64;
        for (_, hint) in world.render_hints() {
            let u = (hint.position.x + half_extent) / (2.0 * half_extent);
            let v = (hint.position.y + half_extent) / (2.0 * half_extent);
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                continue;
            }

            let screen_x = (u * cols) as u16;
            let screen_y = HEADER_ROWS + ((1.0 - v) * rows) as u16;
            if screen_x >= width || screen_y >= height {
                continue;
            }

            let color = GENERATION_COLORS[(hint.generation as usize).min(GENERATION_COLORS.len() - 1)];
            let glyph = if hint.generation == 0 { '·' } else { '●' };
            stdout
                .queue(MoveTo(screen_x, screen_y))?
                .queue(SetForegroundColor(color))?
                .queue(Print(glyph))?
                .queue(ResetColor)?;
        }

        stdout.flush()?;

        let elapsed = frame_time.elapsed();
        if elapsed < FRAME_DURATION {
            sleep(FRAME_DURATION - elapsed);
        }
        frame_time = Instant::now();
    }

    stdout.execute(Show)?;
    stdout.execute(MoveTo(0, height.saturating_sub(1)))?;

    Ok(())
}
