//! Reto de cámara: deletrear una lista de palabras letra por letra.
//!
//! A diferencia del tecleo por mantenimiento, aquí cada detección aceptada
//! se evalúa contra la letra esperada y luego hay un enfriamiento fijo antes
//! de aceptar la siguiente.

use std::time::{Duration, Instant};

use crate::types::Classification;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeParams {
    /// Detecciones por debajo de esta confianza se ignoran (default: 0.7)
    pub min_confidence: f32,
    /// Tiempo mínimo entre dos detecciones evaluadas (default: 2 s)
    pub cooldown: Duration,
}

impl Default for ChallengeParams {
    fn default() -> Self {
        Self {
            min_confidence: 0.7,
            cooldown: Duration::from_millis(2000),
        }
    }
}

/// Un error registrado. Como mucho uno por posición.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mistake {
    pub word: usize,
    pub position: usize,
    pub expected: char,
    pub detected: char,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChallengeEvent {
    /// Sin mano, confianza baja, en enfriamiento o reto ya terminado
    Ignored,
    /// Letra correcta; se avanza a la siguiente posición
    Correct(char),
    /// Última letra de una palabra que no es la última
    WordCompleted(usize),
    /// Letra incorrecta; la posición no avanza
    Wrong { expected: char, detected: char },
    /// Última letra de la última palabra
    Completed,
}

/// Resultado final del reto
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeSummary {
    pub completed: bool,
    pub average_confidence: f32,
    pub mistakes: Vec<Mistake>,
}

pub struct CameraChallenge {
    params: ChallengeParams,
    words: Vec<Vec<char>>,
    word: usize,
    position: usize,
    last_evaluated: Option<Instant>,
    confidences: Vec<f32>,
    mistakes: Vec<Mistake>,
    completed: bool,
}

impl CameraChallenge {
    /// Las palabras se pasan a mayúsculas; las vacías se descartan. Sin
    /// palabras el reto nace completado.
    pub fn new<I, S>(words: I, params: ChallengeParams) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<Vec<char>> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase().chars().collect::<Vec<_>>())
            .filter(|w| !w.is_empty())
            .collect();
        let completed = words.is_empty();

        Self {
            params,
            words,
            word: 0,
            position: 0,
            last_evaluated: None,
            confidences: Vec::new(),
            mistakes: Vec::new(),
            completed,
        }
    }

    /// Letra que se espera ahora; `None` si el reto terminó
    pub fn target(&self) -> Option<char> {
        if self.completed {
            return None;
        }
        self.words
            .get(self.word)
            .and_then(|w| w.get(self.position))
            .copied()
    }

    /// (palabra, posición) actuales
    pub fn cursor(&self) -> (usize, usize) {
        (self.word, self.position)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn observe(&mut self, result: Option<Classification>, now: Instant) -> ChallengeEvent {
        let Some(result) = result else {
            return ChallengeEvent::Ignored;
        };
        let Some(expected) = self.target() else {
            return ChallengeEvent::Ignored;
        };
        if result.confidence < self.params.min_confidence {
            return ChallengeEvent::Ignored;
        }
        if let Some(last) = self.last_evaluated {
            if now.saturating_duration_since(last) < self.params.cooldown {
                return ChallengeEvent::Ignored;
            }
        }
        self.last_evaluated = Some(now);

        if result.symbol != expected {
            let already = self
                .mistakes
                .iter()
                .any(|m| m.word == self.word && m.position == self.position);
            if !already {
                self.mistakes.push(Mistake {
                    word: self.word,
                    position: self.position,
                    expected,
                    detected: result.symbol,
                });
            }
            log::debug!("Reto: esperaba {}, llegó {}", expected, result.symbol);
            return ChallengeEvent::Wrong {
                expected,
                detected: result.symbol,
            };
        }

        self.confidences.push(result.confidence);
        self.position += 1;

        if self.position < self.words[self.word].len() {
            return ChallengeEvent::Correct(expected);
        }

        if self.word + 1 < self.words.len() {
            let finished = self.word;
            self.word += 1;
            self.position = 0;
            log::info!("Reto: palabra {} completada", finished + 1);
            return ChallengeEvent::WordCompleted(finished);
        }

        self.completed = true;
        log::info!(
            "Reto completado ({} errores, confianza media {:.2})",
            self.mistakes.len(),
            self.average_confidence()
        );
        ChallengeEvent::Completed
    }

    /// Confianzas de cada letra correcta, en orden
    pub fn confidences(&self) -> &[f32] {
        &self.confidences
    }

    pub fn mistakes(&self) -> &[Mistake] {
        &self.mistakes
    }

    /// Media de las confianzas correctas; 0 si no hubo ninguna
    pub fn average_confidence(&self) -> f32 {
        if self.confidences.is_empty() {
            return 0.0;
        }
        self.confidences.iter().sum::<f32>() / self.confidences.len() as f32
    }

    pub fn summary(&self) -> ChallengeSummary {
        ChallengeSummary {
            completed: self.completed,
            average_confidence: self.average_confidence(),
            mistakes: self.mistakes.clone(),
        }
    }
}
