//! Bucle de muestreo por frame.
//!
//! En vivo, un hilo lector saca frames de la fuente y los empuja a un canal
//! acotado. El bucle principal despierta a la cadencia configurada, se queda
//! sólo con el frame más reciente y, si no llegó ninguno desde el tick
//! anterior, ese ciclo cuenta como "sin mano". Una grabación, en cambio, se
//! reproduce a un ciclo por frame con reloj virtual.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, tick, Receiver, TryRecvError};

use crate::challenge::{CameraChallenge, ChallengeEvent, ChallengeSummary};
use crate::config::SessionConfig;
use crate::gesture_classifier::classify;
use crate::hold_confirm::{SignTyper, TypingOutcome};
use crate::landmark_source::{LandmarkSource, SourceError};
use crate::types::{Classification, Frame, Landmark};

/// Lo ocurrido en un ciclo de muestreo
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    /// `None` = sin mano o pose malformada
    pub detection: Option<Classification>,
    /// El símbolo detectado difiere del ciclo anterior
    pub changed: bool,
    pub outcome: TypingOutcome,
    /// Sólo si la sesión tiene reto de cámara
    pub challenge: Option<ChallengeEvent>,
}

/// Totales al terminar una sesión
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub cycles: u64,
    pub cycles_with_hand: u64,
    pub text: String,
    pub challenge: Option<ChallengeSummary>,
}

/// Estado de una sesión de cámara: clasificador + escritura por señas
/// (+ reto, si la configuración trae palabras)
pub struct Session {
    typer: SignTyper,
    challenge: Option<CameraChallenge>,
    cycle: u64,
    cycles_with_hand: u64,
    last_symbol: Option<char>,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        let challenge = (!config.challenge_words.is_empty())
            .then(|| CameraChallenge::new(&config.challenge_words, config.challenge_params()));

        Self {
            typer: SignTyper::new(config.hold_params()),
            challenge,
            cycle: 0,
            cycles_with_hand: 0,
            last_symbol: None,
        }
    }

    /// Paso síncrono de un ciclo: clasifica y alimenta el hold y el reto
    pub fn process_cycle(&mut self, frame: Option<&[Landmark]>, now: Instant) -> CycleReport {
        self.cycle += 1;

        let detection = classify(frame);
        if detection.is_some() {
            self.cycles_with_hand += 1;
        }

        let symbol = detection.map(|d| d.symbol);
        let changed = symbol != self.last_symbol;
        if changed {
            log::debug!("Ciclo {}: {:?} → {:?}", self.cycle, self.last_symbol, symbol);
        }
        self.last_symbol = symbol;

        let outcome = self.typer.observe(detection, now);
        let challenge = self
            .challenge
            .as_mut()
            .map(|challenge| challenge.observe(detection, now));

        CycleReport {
            cycle: self.cycle,
            detection,
            changed,
            outcome,
            challenge,
        }
    }

    pub fn text(&self) -> &str {
        self.typer.text()
    }

    pub fn clear_text(&mut self) {
        self.typer.clear();
    }

    pub fn challenge(&self) -> Option<&CameraChallenge> {
        self.challenge.as_ref()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            cycles: self.cycle,
            cycles_with_hand: self.cycles_with_hand,
            text: self.typer.text().to_string(),
            challenge: self.challenge.as_ref().map(CameraChallenge::summary),
        }
    }
}

/// Permite detener una sesión en marcha desde otro hilo o desde el callback
#[derive(Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Vacía el canal quedándose con el último frame.
/// Devuelve también si el lector ya terminó.
fn drain_latest(rx: &Receiver<Frame>) -> (Option<Frame>, bool) {
    let mut latest = None;
    loop {
        match rx.try_recv() {
            Ok(frame) => latest = Some(frame),
            Err(TryRecvError::Empty) => return (latest, false),
            Err(TryRecvError::Disconnected) => return (latest, true),
        }
    }
}

fn log_summary(summary: &SessionSummary) {
    log::info!(
        "Sesión terminada: {} ciclos, {} con mano, texto {:?}",
        summary.cycles,
        summary.cycles_with_hand,
        summary.text
    );
}

/// Ejecuta el bucle de muestreo en vivo hasta que la fuente se agota o se
/// pide `stop`. `on_cycle` recibe cada ciclo. La fuente se cierra al salir.
pub fn run_session<S, F>(
    config: &SessionConfig,
    source: S,
    stop: &StopHandle,
    mut on_cycle: F,
) -> Result<SessionSummary, SourceError>
where
    S: LandmarkSource + 'static,
    F: FnMut(&CycleReport),
{
    let (tx, rx) = bounded::<Frame>(config.channel_capacity);
    let reader_stop = stop.clone();

    let reader = thread::spawn(move || -> Result<u64, SourceError> {
        let mut source = source;
        let mut frames = 0u64;
        let result = loop {
            if reader_stop.is_stopped() {
                break Ok(frames);
            }
            match source.next_frame() {
                Ok(Some(frame)) => {
                    frames += 1;
                    if tx.send(frame).is_err() {
                        break Ok(frames);
                    }
                }
                Ok(None) => break Ok(frames),
                Err(e) => break Err(e),
            }
        };
        source.close();
        result
    });

    let mut session = Session::new(config);
    let ticker = tick(config.frame_interval());
    log::info!(
        "Sesión iniciada (cada {} ms, hold {} ms)",
        config.frame_interval_ms,
        config.hold_duration_ms
    );

    let mut source_done = false;
    for _ in ticker.iter() {
        let (latest, finished) = drain_latest(&rx);
        if finished && latest.is_none() {
            source_done = true;
            break;
        }

        let frame = latest.as_ref().and_then(|f| f.as_deref());
        let report = session.process_cycle(frame, Instant::now());
        on_cycle(&report);

        if stop.is_stopped() {
            log::info!("Sesión detenida tras {} ciclos", report.cycle);
            break;
        }
    }

    drop(rx);

    // Un lector bloqueado (p. ej. stdin) no se espera: termina solo en el
    // siguiente envío fallido y cierra la fuente entonces.
    if source_done || reader.is_finished() {
        match reader.join() {
            Ok(Ok(frames)) => log::debug!("Lector terminó tras {} frames", frames),
            Ok(Err(e)) => return Err(e),
            Err(_) => log::error!("El hilo lector entró en pánico"),
        }
    }

    let summary = session.summary();
    log_summary(&summary);
    Ok(summary)
}

/// Reproduce una grabación a un ciclo por frame. El reloj del hold avanza
/// `frame_interval` por frame, así que el resultado no depende del
/// planificador. Con `realtime` cada frame espera su tick.
pub fn replay_session<S, F>(
    config: &SessionConfig,
    mut source: S,
    stop: &StopHandle,
    realtime: bool,
    mut on_cycle: F,
) -> Result<SessionSummary, SourceError>
where
    S: LandmarkSource,
    F: FnMut(&CycleReport),
{
    let mut session = Session::new(config);
    let ticker = realtime.then(|| tick(config.frame_interval()));
    let mut now = Instant::now();

    let result = loop {
        if stop.is_stopped() {
            log::info!("Reproducción detenida");
            break Ok(());
        }
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };
        if let Some(ticker) = &ticker {
            // el ticker sólo se cierra al soltarlo
            let _ = ticker.recv();
        }

        let report = session.process_cycle(frame.as_deref(), now);
        on_cycle(&report);
        now += config.frame_interval();
    };
    source.close();
    result?;

    let summary = session.summary();
    log_summary(&summary);
    Ok(summary)
}
