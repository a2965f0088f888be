use std::time;

pub fn time(start: time::Instant) -> f32 {
    (time::Instant::now() - start).as_secs_f32()
}
