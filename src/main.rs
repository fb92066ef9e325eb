/*
Deletreo por señas en tiempo real a partir de landmarks de mano

El detector de manos corre aparte y escribe un frame por línea en stdin:
  null                          → sin mano
  [[x, y, z], ... 21 puntos]    → una mano
  [{"x":..,"y":..,"z":..}, ...] → idem, en objetos

Cada ciclo se clasifica la pose (A–Z, '5' o '?'); una letra sostenida el
tiempo configurado se escribe en el texto. Con --challenge además se evalúa
un reto: deletrear las palabras dadas, una detección cada 2 s.

Para ejecutar:
  detector | ./target/release/senas
  ./target/release/senas --csv grabacion.csv
  ./target/release/senas --config senas.json
  detector | ./target/release/senas --challenge hola,mundo

Logs detallados:
  RUST_LOG=debug ./target/release/senas
*/

use std::env;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use senas::config::SessionConfig;
use senas::csv_loader::load_frames_from_csv;
use senas::challenge::ChallengeEvent;
use senas::hold_confirm::HoldEvent;
use senas::landmark_source::{JsonLinesSource, ReplaySource};
use senas::session::{replay_session, run_session, CycleReport, SessionSummary, StopHandle};

/// Hitos de progreso del hold que se muestran (en cuartos)
const PROGRESS_STEPS: u32 = 4;

struct CliOptions {
    config_path: Option<PathBuf>,
    csv_path: Option<PathBuf>,
    challenge_words: Vec<String>,
}

fn parse_args() -> Result<CliOptions> {
    let mut config_path = None;
    let mut csv_path = None;
    let mut challenge_words = Vec::new();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().ok_or_else(|| anyhow!("--config necesita un archivo"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--csv" => {
                let value = args.next().ok_or_else(|| anyhow!("--csv necesita un archivo"))?;
                csv_path = Some(PathBuf::from(value));
            }
            "--challenge" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("--challenge necesita palabras separadas por comas"))?;
                challenge_words = value.split(',').map(str::to_string).collect();
            }
            _ => bail!(
                "Uso: senas [--config <archivo.json>] [--csv <grabacion.csv>] [--challenge <p1,p2>]"
            ),
        }
    }

    Ok(CliOptions {
        config_path,
        csv_path,
        challenge_words,
    })
}

/// Imprime lo relevante de un ciclo. `last_step` recuerda el último hito
/// de progreso mostrado para no repetirlo cada frame.
fn report_cycle(report: &CycleReport, last_step: &mut u32) {
    if report.changed {
        match report.detection {
            Some(detection) => println!(
                "✋ {} (conf: {:.0}%)",
                detection.symbol,
                detection.confidence * 100.0
            ),
            None => println!("🚫 Sin mano"),
        }
    }

    match report.outcome.event {
        HoldEvent::Started(_) | HoldEvent::Reset => *last_step = 0,
        HoldEvent::Progress { symbol, fraction } => {
            let step = (fraction * PROGRESS_STEPS as f32) as u32;
            if step > *last_step {
                *last_step = step;
                println!("⏳ {} {}%", symbol, step * 100 / PROGRESS_STEPS);
            }
        }
        HoldEvent::Confirmed(symbol) => {
            *last_step = 0;
            if report.outcome.typed.is_none() {
                println!("↩️  {} repetida, no se escribe", symbol);
            }
        }
        HoldEvent::Nothing => {}
    }

    if let Some(symbol) = report.outcome.typed {
        println!("✍️  Escrito: {}", symbol);
    }

    match report.challenge {
        Some(ChallengeEvent::Correct(symbol)) => println!("✅ Reto: {} correcta", symbol),
        Some(ChallengeEvent::WordCompleted(word)) => {
            println!("🏁 Reto: palabra {} completada", word + 1)
        }
        Some(ChallengeEvent::Wrong { expected, detected }) => {
            println!("❌ Reto: esperaba {}, llegó {}", expected, detected)
        }
        Some(ChallengeEvent::Completed) => println!("🏆 Reto completado"),
        Some(ChallengeEvent::Ignored) | None => {}
    }
}

fn print_summary(summary: &SessionSummary) {
    println!("\n📊 {} ciclos ({} con mano)", summary.cycles, summary.cycles_with_hand);
    println!("📝 Texto: {}", summary.text);

    if let Some(challenge) = &summary.challenge {
        println!(
            "🎯 Reto {} | confianza media: {:.0}% | errores: {}",
            if challenge.completed { "completado" } else { "sin terminar" },
            challenge.average_confidence * 100.0,
            challenge.mistakes.len()
        );
        for mistake in &challenge.mistakes {
            println!(
                "   palabra {} posición {}: esperaba {}, llegó {}",
                mistake.word + 1,
                mistake.position + 1,
                mistake.expected,
                mistake.detected
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let opts = parse_args()?;

    let mut config = match &opts.config_path {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => SessionConfig::default(),
    };
    if !opts.challenge_words.is_empty() {
        config.challenge_words = opts.challenge_words;
    }

    println!("🤟 Deletreo por señas\n");
    println!(
        "🔧 Hold: {} ms | confianza mínima: {:.0}% | ciclo: {} ms\n",
        config.hold_duration_ms,
        config.min_confidence * 100.0,
        config.frame_interval_ms
    );

    let stop = StopHandle::new();
    let mut last_step = 0u32;
    let stopper = stop.clone();
    let on_cycle = |report: &CycleReport| {
        report_cycle(report, &mut last_step);
        if report.challenge == Some(ChallengeEvent::Completed) {
            stopper.stop();
        }
    };

    let summary = match &opts.csv_path {
        Some(path) => {
            let frames = load_frames_from_csv(path)?;
            println!("🎞️  Reproduciendo {} frames desde {:?}\n", frames.len(), path);
            let source = ReplaySource::from_recording(frames);
            replay_session(&config, source, &stop, true, on_cycle)?
        }
        None => {
            println!("🎧 Leyendo frames JSON desde stdin...\n");
            let source = JsonLinesSource::new(BufReader::new(io::stdin()));
            run_session(&config, source, &stop, on_cycle)?
        }
    };

    print_summary(&summary);
    Ok(())
}
