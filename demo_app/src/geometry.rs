//! Quad generation and colour animation for the demos

use rand::Rng;

use gl_engine::render::{VertexPositionColor, VertexPositionTexture};

/// Index pattern of one quad whose first vertex is `base`
pub const fn quad_indices(base: u32) -> [u32; 6] {
    [base, base + 1, base + 2, base, base + 2, base + 3]
}

/// Corners of an axis-aligned rectangle, top-left first, clockwise
pub const fn quad_corners(x: f32, y: f32, w: f32, h: f32) -> [[f32; 2]; 4] {
    [[x, y + h], [x + w, y + h], [x + w, y], [x, y]]
}

/// A solid-colour quad
pub fn color_quad(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> [VertexPositionColor; 4] {
    quad_corners(x, y, w, h).map(|position| VertexPositionColor::new(position, color))
}

/// A quad whose texture coordinates span `0..1`
pub fn textured_quad(x: f32, y: f32, w: f32, h: f32) -> [VertexPositionTexture; 4] {
    let uv = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    let corners = quad_corners(x, y, w, h);
    [0, 1, 2, 3].map(|i| VertexPositionTexture::new(corners[i], uv[i]))
}

/// `count` randomly placed and coloured rectangles that fit in `width`x`height`
#[allow(clippy::cast_precision_loss)]
pub fn random_boxes(rng: &mut impl Rng, count: u32, width: u32, height: u32) -> (Vec<VertexPositionColor>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(count as usize * 4);
    let mut indices = Vec::with_capacity(count as usize * 6);

    for i in 0..count {
        let w = rng.gen_range(32..128u32);
        let h = rng.gen_range(32..128u32);
        let x = rng.gen_range(0..width.saturating_sub(w).max(1));
        let y = rng.gen_range(32.min(height)..height.saturating_sub(h).max(33));
        let color = [rng.gen(), rng.gen(), rng.gen(), 1.0];

        vertices.extend(color_quad(x as f32, y as f32, w as f32, h as f32, color));
        indices.extend(quad_indices(i * 4));
    }

    (vertices, indices)
}

/// A factor that ramps between 0 and 1 and back, one fixed step per update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPulse {
    factor: f32,
    step: f32,
}

impl ColorPulse {
    /// Start at full brightness, crossing the range in `frames` updates
    pub fn new(frames: u32) -> Self {
        Self {
            factor: 1.0,
            step: 1.0 / frames.max(1) as f32,
        }
    }

    /// Current factor in `0.0..=1.0`
    pub const fn factor(&self) -> f32 {
        self.factor
    }

    /// Advance one update, reversing direction at either end
    pub fn advance(&mut self) -> f32 {
        self.factor += self.step;
        if self.factor >= 1.0 {
            self.factor = 1.0;
            self.step = -self.step.abs();
        } else if self.factor <= 0.0 {
            self.factor = 0.0;
            self.step = self.step.abs();
        }
        self.factor
    }
}
