//! Console check for the capture/analysis pipeline: prints a bar per frame
//! whose length follows the microphone level.

#[derive(Debug, Clone)]
pub struct Readings {
    level: f32,
}

fn main() -> Result<(), fuwa_core::AudioError> {
    fuwa_core::default_log();
    fuwa_core::default_config();

    let mut frames = fuwa_core::Visualizer::new(
        Readings { level: 0.0 },
        |readings: &mut Readings, samples: &fuwa_core::analyzer::SampleBuffer| {
            readings.level = samples.volume(0.1);
            readings
        },
    )
    .frames()?;

    loop {
        let frame = frames.tick();
        frame.lock_info(|readings| {
            for _ in 0..(readings.level * 200.0) as usize {
                print!("#");
            }
            println!();
        });
        std::thread::sleep(std::time::Duration::from_millis(30));
    }
}
