//! Confirmación temporal: una letra sólo cuenta cuando se mantiene el tiempo
//! suficiente. El clasificador no guarda estado; todo el historial vive aquí.

use std::time::{Duration, Instant};

use crate::types::Classification;

/// Parámetros de la confirmación por mantenimiento
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldParams {
    /// Tiempo que hay que sostener la misma letra (default: 2 s)
    pub hold_duration: Duration,
    /// Resultados por debajo de esta confianza reinician el hold (default: 0.7)
    pub min_confidence: f32,
}

impl Default for HoldParams {
    fn default() -> Self {
        Self {
            hold_duration: Duration::from_millis(2000),
            min_confidence: 0.7,
        }
    }
}

/// Estados de la máquina
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// Sin candidato
    Idle,
    /// Sosteniendo `symbol` desde `since`
    Holding { symbol: char, since: Instant },
}

/// Lo que pasó tras una observación
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldEvent {
    /// Seguía en reposo
    Nothing,
    /// Se perdió el candidato (sin mano, '?', confianza baja)
    Reset,
    /// Empieza a sostenerse un símbolo nuevo
    Started(char),
    /// Mismo símbolo, todavía sin llegar al tiempo; `fraction` en [0, 1)
    Progress { symbol: char, fraction: f32 },
    /// Se sostuvo el tiempo completo. La máquina vuelve a reposo.
    Confirmed(char),
}

pub struct HoldTracker {
    params: HoldParams,
    state: State,
}

impl HoldTracker {
    pub fn new(params: HoldParams) -> Self {
        Self {
            params,
            state: State::Idle,
        }
    }

    /// Alimenta la máquina con el resultado de un ciclo (`None` = sin mano)
    pub fn observe(&mut self, result: Option<Classification>, now: Instant) -> HoldEvent {
        let accepted = result
            .filter(|r| !r.is_unknown() && r.confidence >= self.params.min_confidence);

        let Some(current) = accepted else {
            return match self.state {
                State::Idle => HoldEvent::Nothing,
                State::Holding { .. } => {
                    self.state = State::Idle;
                    HoldEvent::Reset
                }
            };
        };

        match self.state {
            State::Holding { symbol, since } if symbol == current.symbol => {
                let elapsed = now.saturating_duration_since(since);
                if elapsed >= self.params.hold_duration {
                    self.state = State::Idle;
                    log::info!("Símbolo confirmado: {}", symbol);
                    HoldEvent::Confirmed(symbol)
                } else {
                    HoldEvent::Progress {
                        symbol,
                        fraction: self.fraction(elapsed),
                    }
                }
            }
            _ => {
                self.state = State::Holding {
                    symbol: current.symbol,
                    since: now,
                };
                log::debug!("Sosteniendo {}", current.symbol);
                HoldEvent::Started(current.symbol)
            }
        }
    }

    fn fraction(&self, elapsed: Duration) -> f32 {
        if self.params.hold_duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.params.hold_duration.as_secs_f32()).min(1.0)
    }

    /// Progreso del hold actual en [0, 1]; 0 en reposo
    pub fn progress(&self, now: Instant) -> f32 {
        match self.state {
            State::Idle => 0.0,
            State::Holding { since, .. } => self.fraction(now.saturating_duration_since(since)),
        }
    }

    pub fn held_symbol(&self) -> Option<char> {
        match self.state {
            State::Idle => None,
            State::Holding { symbol, .. } => Some(symbol),
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
    }

    /// Estado actual como string (para debug)
    pub fn state(&self) -> &str {
        match self.state {
            State::Idle => "IDLE",
            State::Holding { .. } => "HOLDING",
        }
    }
}

/// Resultado de alimentar al tecleador
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingOutcome {
    pub event: HoldEvent,
    /// Símbolo añadido al texto en este ciclo
    pub typed: Option<char>,
}

/// Escritura por señas: cada letra confirmada se añade al texto, salvo que
/// repita la última escrita.
pub struct SignTyper {
    tracker: HoldTracker,
    text: String,
    last_typed: Option<char>,
}

impl SignTyper {
    pub fn new(params: HoldParams) -> Self {
        Self {
            tracker: HoldTracker::new(params),
            text: String::new(),
            last_typed: None,
        }
    }

    pub fn observe(&mut self, result: Option<Classification>, now: Instant) -> TypingOutcome {
        let event = self.tracker.observe(result, now);
        let typed = match event {
            HoldEvent::Confirmed(symbol) if self.last_typed != Some(symbol) => {
                self.text.push(symbol);
                self.last_typed = Some(symbol);
                Some(symbol)
            }
            _ => None,
        };
        TypingOutcome { event, typed }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Borra el texto y olvida la última letra escrita
    pub fn clear(&mut self) {
        self.text.clear();
        self.last_typed = None;
        self.tracker.reset();
    }
}
