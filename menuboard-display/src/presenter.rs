//! Writes scenes to the rendering surface as JSON lines.

use crate::scene::Scene;

use anyhow::{Context, Result};
use std::io::Write;

pub struct Presenter<W: Write> {
    out: W,
    last: Option<Scene>,
    written: usize,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            written: 0,
        }
    }

    /// Write `scene` unless it is identical to the last one written.
    /// Returns whether anything was written.
    pub fn present(&mut self, scene: Scene) -> Result<bool> {
        if self.last.as_ref() == Some(&scene) {
            return Ok(false);
        }

        serde_json::to_writer(&mut self.out, &scene).context("Failed to encode scene")?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;

        self.written += 1;
        self.last = Some(scene);
        Ok(true)
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn last(&self) -> Option<&Scene> {
        self.last.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
