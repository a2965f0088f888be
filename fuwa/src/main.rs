//! Fuwa-fuwa audio visualizer
//!
//! A glowing, wobbling hexagon with circular spectrum bars and a breathing
//! center disc, all driven by the microphone.  Click or press space to start
//! listening, escape to stop.

use macroquad::prelude::*;

mod conditioner;
mod geometry;
mod render;
mod session;
mod speech;
mod style;
mod video;

use render::RenderState;

fn window_conf() -> Conf {
    Conf {
        window_title: "fuwa".to_string(),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    fuwa_core::default_config();
    fuwa_core::default_log();

    let style = style::Style::from_config();
    log::debug!("Style: {:?}", style);

    let mut renderer = render::FrameRenderer::new(style.clone());
    let mut lifecycle = session::Lifecycle::new();
    let camera = video::SharedFrame::new();

    // Recognition is a host capability; none is wired up on this target
    let mut speech_backend: Option<Box<dyn speech::SpeechBackend>> = None;
    let (speech_tx, speech_rx) = std::sync::mpsc::channel();
    let mut panel = speech::TranscriptPanel::new();

    let mut start_error: Option<String> = None;
    let mut speech_notice: Option<String> = None;
    let mut speech_warned = false;

    loop {
        let start_requested = !lifecycle.is_started()
            && (is_key_pressed(KeyCode::Space) || is_mouse_button_pressed(MouseButton::Left));

        if start_requested {
            // A stopped renderer is terminal, the next session gets a new one
            if renderer.state() == RenderState::Stopped {
                renderer = render::FrameRenderer::new(style.clone());
            }
            renderer
                .advance(RenderState::Loading)
                .expect("renderer out of order");

            match lifecycle.start(|| session::Session::open(&style)) {
                Ok(true) => {
                    renderer
                        .advance(RenderState::Ready)
                        .expect("renderer out of order");
                    renderer
                        .advance(RenderState::Running)
                        .expect("renderer out of order");
                    start_error = None;

                    match speech_backend.as_mut() {
                        Some(backend) => {
                            match backend
                                .start(&speech::RecognizerConfig::default(), speech_tx.clone())
                            {
                                Ok(()) => panel.set_listening(),
                                Err(e) => log::error!("Speech recognizer failed: {}", e),
                            }
                        }
                        None if !speech_warned => {
                            log::warn!("No speech recognizer available, transcript stays empty");
                            speech_notice =
                                Some("Speech recognition unavailable on this system".to_string());
                            speech_warned = true;
                        }
                        None => {}
                    }

                    log::info!("Session started");
                }
                Ok(false) => {}
                Err(e) => {
                    log::error!("Could not start session: {}", e);
                    start_error = Some(format!("Microphone unavailable: {}", e));
                    renderer = render::FrameRenderer::new(style.clone());
                }
            }
        }

        if is_key_pressed(KeyCode::Escape) && lifecycle.is_started() {
            renderer
                .advance(RenderState::Stopped)
                .expect("renderer out of order");
            lifecycle.stop();
            if let Some(backend) = speech_backend.as_mut() {
                backend.stop();
            }
            panel.stop();
            log::info!("Session stopped");
        }

        for event in speech_rx.try_iter() {
            panel.apply(event);
        }

        clear_background(BLACK);

        if renderer.is_running() {
            if let Some(session) = lifecycle.session_mut() {
                let frame = session.frames.tick();

                let (sig, spectrum) = frame.lock_info(|features| {
                    (
                        conditioner::condition(features.level, &features.spectrum, &style),
                        features.spectrum.clone(),
                    )
                });

                let camera_frame = camera.snapshot();
                let scene = renderer.compose(
                    frame.frame,
                    &sig,
                    camera_frame.as_ref(),
                    &spectrum,
                    screen_width(),
                    screen_height(),
                );
                renderer.draw(&scene);

                draw_text(
                    &panel.text(),
                    24.0,
                    screen_height() - 24.0,
                    24.0,
                    Color::new(1.0, 1.0, 1.0, 0.7),
                );
                if let Some(notice) = &speech_notice {
                    draw_text(notice, 24.0, 32.0, 22.0, GRAY);
                }
            }
        } else if let Some(msg) = &start_error {
            draw_text(msg, 24.0, screen_height() / 2.0, 28.0, RED);
            draw_text(
                "Click or press space to try again",
                24.0,
                screen_height() / 2.0 + 32.0,
                22.0,
                GRAY,
            );
        } else if renderer.state() == RenderState::Idle || renderer.state() == RenderState::Stopped
        {
            draw_text(
                "Click or press space to start listening",
                24.0,
                screen_height() / 2.0,
                28.0,
                GRAY,
            );
        }

        next_frame().await;
    }
}
