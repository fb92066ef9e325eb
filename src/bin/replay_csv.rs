use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use senas::csv_loader::load_frames_from_csv;
use senas::gesture_classifier::{classify_shape, matching_rules, HandShape};
use senas::types::{Finger, HandPose, NUM_LANDMARKS};

struct ReplayOptions {
    dump_features: bool,
    dump_rules: bool,
}

fn parse_args() -> Result<(PathBuf, ReplayOptions)> {
    let mut dump_features = false;
    let mut dump_rules = false;
    let mut csv_path: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dump-features" => dump_features = true,
            "--rules" => dump_rules = true,
            _ => {
                if csv_path.is_some() {
                    bail!("Uso: replay_csv [--dump-features] [--rules] <archivo.csv>");
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
    }

    let csv_path = csv_path.ok_or_else(|| anyhow!("Debes especificar un archivo CSV"))?;
    Ok((
        csv_path,
        ReplayOptions {
            dump_features,
            dump_rules,
        },
    ))
}

fn print_features(shape: &HandShape) {
    for finger in Finger::ALL {
        println!("      curl {:<8} {:>8.3}", finger.name(), shape.curl(finger));
    }
    println!("      curl {:<8} {:>8.3}", "pulgar", shape.thumb_curl);
    println!("      pulgar–índice (punta) {:>8.3}", shape.thumb_index_tip);
    println!("      pulgar–medio (punta)  {:>8.3}", shape.thumb_middle_tip);
    println!("      índice–medio (punta)  {:>8.3}", shape.index_middle_tip);
    println!("      pulgar–PIP índice     {:>8.3}", shape.thumb_index_pip);
    println!("      pulgar–PIP medio      {:>8.3}", shape.thumb_middle_pip);
    println!("      pulgar–PIP anular     {:>8.3}", shape.thumb_ring_pip);
    println!(
        "      de lado: {} | hacia abajo: {}",
        shape.sideways, shape.pointing_down
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let (csv_path, opts) = parse_args()?;
    println!("🎞️  Reproduciendo poses desde {:?}", csv_path);

    let frames = load_frames_from_csv(&csv_path)?;
    println!("ℹ️  {} samples\n", frames.len());

    let mut histogram: BTreeMap<char, usize> = BTreeMap::new();
    let mut without_hand = 0usize;

    for (sample, frame) in frames.iter().enumerate() {
        let Some(pose) = HandPose::from_slice(frame) else {
            without_hand += 1;
            println!(
                "  {:>4}: 🚫 sin mano ({} de {} puntos)",
                sample,
                frame.len(),
                NUM_LANDMARKS
            );
            continue;
        };

        let shape = HandShape::measure(&pose);
        let result = classify_shape(&shape);
        *histogram.entry(result.symbol).or_default() += 1;

        println!(
            "  {:>4}: {} ({:.0}%)",
            sample,
            result.symbol,
            result.confidence * 100.0
        );

        if opts.dump_features {
            print_features(&shape);
        }

        if opts.dump_rules {
            let rules = matching_rules(&shape);
            if rules.is_empty() {
                println!("      reglas: ninguna");
            } else {
                println!("      reglas: {}", rules.join(", "));
            }
        }
    }

    let classified: usize = histogram.values().sum();
    let mut ranking: Vec<(char, usize)> = histogram.into_iter().collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    println!("\n📊 Histograma ({} con mano, {} sin mano):", classified, without_hand);
    for (idx, (symbol, count)) in ranking.iter().enumerate() {
        let share = *count as f32 / classified as f32;
        println!("  {:>2}. {:<25} {:>6.2}%", idx + 1, symbol, share * 100.0);
    }

    if let Some((symbol, count)) = ranking.first() {
        println!("\n🥇 Más frecuente: {} ({} samples)", symbol, count);
    }

    Ok(())
}
