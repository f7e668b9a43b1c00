//! Animated sprite component
//!
//! The sprite's texture is an atlas of `columns * rows` equally sized
//! frames, numbered row by row from the top left.

use crate::ecs::Component;
use crate::foundation::math::Rect;
use crate::render::Texture;

/// Frames shown per second unless configured otherwise
pub const DEFAULT_FRAMES_PER_SECOND: f64 = 10.0;

/// How the frame index moves through the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationType {
    /// First to last frame, then start over
    #[default]
    Normal,
    /// Last to first frame, then start over
    Reverse,
    /// Back and forth between the first and last frame
    PingPong,
    /// First to last frame, then stop on the last one
    Once,
}

/// Frame selection for a sprite drawn from an atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedSpriteComponent {
    /// Playback mode
    pub animation: AnimationType,
    /// Playback speed
    pub frames_per_second: f64,
    /// Whether frames advance
    pub playing: bool,
    columns: u32,
    rows: u32,
    frame: u32,
    elapsed: f64,
    forward: bool,
}

impl Component for AnimatedSpriteComponent {}

impl AnimatedSpriteComponent {
    /// Animate over a `columns` by `rows` atlas
    ///
    /// Zero counts are treated as one. Reverse playback starts on the last
    /// frame, every other mode on the first.
    pub fn new(columns: u32, rows: u32, animation: AnimationType) -> Self {
        let mut component = Self {
            animation,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            playing: true,
            columns: columns.max(1),
            rows: rows.max(1),
            frame: 0,
            elapsed: 0.0,
            forward: true,
        };
        if animation == AnimationType::Reverse {
            component.frame = component.last_frame();
        }
        component
    }

    /// Set the playback speed
    #[must_use]
    pub const fn with_frames_per_second(mut self, frames_per_second: f64) -> Self {
        self.frames_per_second = frames_per_second;
        self
    }

    /// Frames per atlas row
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Atlas rows
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of frames in the atlas
    pub const fn frame_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Frame currently shown
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Jump to a frame, wrapping around the frame count
    pub fn set_frame(&mut self, frame: u32) {
        self.frame = frame % self.frame_count();
        self.elapsed = 0.0;
    }

    /// Pixel rectangle of the current frame inside `atlas`
    #[allow(clippy::cast_possible_wrap)]
    pub const fn frame_rect(&self, atlas: &Texture) -> Rect {
        let width = atlas.width / self.columns;
        let height = atlas.height / self.rows;
        let x = (self.frame % self.columns) * width;
        let y = (self.frame / self.columns) * height;
        Rect::new(x as i32, y as i32, width, height)
    }

    /// Move playback forward by `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        if !self.playing || self.frames_per_second <= 0.0 || self.frame_count() < 2 {
            return;
        }
        self.elapsed += dt * self.frames_per_second;
        while self.elapsed >= 1.0 && self.playing {
            self.elapsed -= 1.0;
            self.step();
        }
        if !self.playing {
            self.elapsed = 0.0;
        }
    }

    const fn last_frame(&self) -> u32 {
        self.frame_count() - 1
    }

    fn step(&mut self) {
        let last = self.last_frame();
        match self.animation {
            AnimationType::Normal => {
                self.frame = if self.frame >= last { 0 } else { self.frame + 1 };
            }
            AnimationType::Reverse => {
                self.frame = if self.frame == 0 { last } else { self.frame - 1 };
            }
            AnimationType::Once => {
                self.frame = (self.frame + 1).min(last);
                if self.frame == last {
                    self.playing = false;
                }
            }
            AnimationType::PingPong => {
                if self.forward && self.frame >= last {
                    self.forward = false;
                } else if !self.forward && self.frame == 0 {
                    self.forward = true;
                }
                self.frame = if self.forward { self.frame + 1 } else { self.frame - 1 };
            }
        }
    }
}
