//! Proveedores de landmarks. El detector de manos es externo: aquí sólo se
//! lee su salida, ya sea en vivo (JSON por línea) o desde una grabación.

use std::collections::VecDeque;
use std::io::BufRead;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{Frame, Landmark};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("La fuente ya fue cerrada")]
    Closed,
}

/// Recurso explícito que entrega un frame por llamada. Se crea fuera, se
/// inyecta en la sesión y la sesión lo cierra al terminar.
pub trait LandmarkSource: Send {
    /// `Ok(None)` cuando ya no hay más frames
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Libera el recurso; llamadas posteriores a `next_frame` fallan
    fn close(&mut self);
}

/// Un punto tal como lo escribe el detector: `[x, y, z]` o `{"x":..,"y":..,"z":..}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Triple([f32; 3]),
    Object(Landmark),
}

impl From<RawPoint> for Landmark {
    fn from(raw: RawPoint) -> Self {
        match raw {
            RawPoint::Triple([x, y, z]) => Landmark::new(x, y, z),
            RawPoint::Object(point) => point,
        }
    }
}

/// Interpreta una línea del detector: `null` = sin mano, array de puntos =
/// una mano. No valida la cantidad de puntos; eso lo decide el clasificador.
pub fn parse_frame_line(line: &str) -> Result<Frame, serde_json::Error> {
    let raw: Option<Vec<RawPoint>> = serde_json::from_str(line)?;
    Ok(raw.map(|points| points.into_iter().map(Landmark::from).collect()))
}

/// Lee frames JSON línea a línea (típicamente stdin de un proceso detector).
/// Las líneas vacías se ignoran; las que no son JSON válido se descartan con un warning.
pub struct JsonLinesSource<R: BufRead + Send> {
    reader: Option<R>,
    line_no: usize,
    skipped: usize,
}

impl<R: BufRead + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Líneas descartadas por JSON inválido
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead + Send> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let reader = self.reader.as_mut().ok_or(SourceError::Closed)?;
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match parse_frame_line(trimmed) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    self.skipped += 1;
                    log::warn!("Línea {} descartada: {}", self.line_no, e);
                }
            }
        }
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            log::debug!(
                "Fuente JSON cerrada tras {} líneas ({} descartadas)",
                self.line_no,
                self.skipped
            );
        }
    }
}

/// Reproduce frames ya cargados (p. ej. desde un CSV grabado)
pub struct ReplaySource {
    frames: VecDeque<Frame>,
    closed: bool,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            closed: false,
        }
    }

    /// Un frame vacío de la grabación se reproduce como "sin mano"
    pub fn from_recording(frames: Vec<Vec<Landmark>>) -> Self {
        Self::new(
            frames
                .into_iter()
                .map(|points| (!points.is_empty()).then_some(points)),
        )
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        Ok(self.frames.pop_front())
    }

    fn close(&mut self) {
        self.closed = true;
        self.frames.clear();
    }
}
