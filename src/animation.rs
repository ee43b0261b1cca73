use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;

use crate::core::{Controller, FpsCounter, FrameClock, FrameInfo};
use crate::director::SceneDirector;
use crate::renderer::SceneRenderer;

/// Shared stop flag for the animation loop
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Continue,
    Cancelled,
}

/// Runs one animation step per display refresh until its token is cancelled
#[derive(Debug)]
pub struct AnimationLoop {
    clock: FrameClock,
    fps: FpsCounter,
    token: CancelToken,
    last_frame: Option<FrameInfo>,
}

impl AnimationLoop {
    pub fn new(token: CancelToken) -> Self {
        Self {
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            token,
            last_frame: None,
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn frames(&self) -> u64 {
        self.clock.frame_number()
    }

    pub fn last_frame(&self) -> Option<FrameInfo> {
        self.last_frame
    }

    /// Advance the scene by one frame and draw it
    pub fn tick(
        &mut self,
        director: &mut SceneDirector,
        input: &dyn Controller,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<LoopStatus> {
        if self.token.is_cancelled() {
            return Ok(LoopStatus::Cancelled);
        }

        let Some(frame) = self.clock.next() else {
            return Ok(LoopStatus::Cancelled);
        };
        self.last_frame = Some(frame);
        if let Some(fps) = self.fps.tick(frame.delta) {
            log::debug!("frame {} - {:.1} fps", frame.number, fps);
        }

        director.poll_textures();
        director.animate(input);
        renderer.render(director.scene(), director.camera())?;

        Ok(LoopStatus::Continue)
    }
}
