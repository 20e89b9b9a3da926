use crate::config::SAMPLE_CLIP;

/// Single-pole DC-blocking high-pass.
///
/// `y[n] = x[n] - x[n-1] + decay * y[n-1]`, starting from zero state. The
/// state keeps the unclipped output and survives across frames.
#[derive(Debug, Clone, Copy)]
pub struct DcBlocker {
    decay: f32,
    previous_input: f32,
    previous_output: f32,
}

impl DcBlocker {
    pub const fn new(decay: f32) -> Self {
        Self {
            decay,
            previous_input: 0.0,
            previous_output: 0.0,
        }
    }

    #[inline]
    pub fn tick(&mut self, raw: u16) -> f32 {
        let x = raw as f32;
        let y = x - self.previous_input + self.decay * self.previous_output;
        self.previous_input = x;
        self.previous_output = y;
        y
    }
}

/// Clip to the output range and narrow, truncating toward zero
#[inline]
pub fn clip_sample(y: f32) -> i8 {
    let clipped = if y > SAMPLE_CLIP {
        SAMPLE_CLIP
    } else if y < -SAMPLE_CLIP {
        -SAMPLE_CLIP
    } else {
        y
    };
    clipped as i8
}
