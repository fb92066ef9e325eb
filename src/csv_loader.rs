use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::types::{Landmark, NUM_LANDMARKS};

/// Carga una grabación de poses desde un CSV con formato
/// sample,landmark,x,y,z (una fila por landmark).
///
/// Cada sample produce un frame con sus landmarks ordenados por índice. Una
/// fila con `landmark` vacío (`3,,,,`) marca un sample sin mano. Los samples
/// marcados o ausentes del archivo se devuelven como frames vacíos, que el
/// clasificador trata como "sin detección".
pub fn load_frames_from_csv(path: impl AsRef<Path>) -> Result<Vec<Vec<Landmark>>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    let mut samples: BTreeMap<usize, BTreeMap<usize, Landmark>> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Fila {} inválida en {:?}", row, path))?;
        if record.len() < 5 {
            bail!("La fila {} no tiene 5 columnas", row);
        }

        let sample: usize = record[0]
            .parse()
            .with_context(|| format!("sample inválido en fila {}", row))?;

        if record[1].is_empty() {
            samples.entry(sample).or_default();
            continue;
        }
        let landmark: usize = record[1]
            .parse()
            .with_context(|| format!("landmark inválido en fila {}", row))?;

        if landmark >= NUM_LANDMARKS {
            bail!("Landmark {} fuera de rango (fila {})", landmark, row);
        }

        let x: f32 = record[2]
            .parse()
            .with_context(|| format!("x inválido en fila {}", row))?;
        let y: f32 = record[3]
            .parse()
            .with_context(|| format!("y inválido en fila {}", row))?;
        let z: f32 = record[4]
            .parse()
            .with_context(|| format!("z inválido en fila {}", row))?;

        samples
            .entry(sample)
            .or_default()
            .insert(landmark, Landmark::new(x, y, z));
    }

    let (&min_sample, _) = samples
        .iter()
        .next()
        .ok_or_else(|| anyhow!("El CSV {:?} no contiene datos", path))?;
    ensure!(
        min_sample == 0,
        "El CSV debe iniciar en sample=0 (encontrado sample={})",
        min_sample
    );
    let max_sample = samples.keys().next_back().copied().unwrap_or(0);

    let frames = (0..=max_sample)
        .map(|sample_idx| {
            samples
                .get(&sample_idx)
                .map(|points| points.values().copied().collect())
                .unwrap_or_default()
        })
        .collect();

    Ok(frames)
}

/// Exporta frames al mismo formato que lee [`load_frames_from_csv`].
/// Un frame vacío (sin mano) se escribe como fila marcadora `n,,,,`.
pub fn frames_to_csv(frames: &[Vec<Landmark>]) -> String {
    let mut csv = String::from("sample,landmark,x,y,z\n");

    for (sample_idx, frame) in frames.iter().enumerate() {
        if frame.is_empty() {
            csv.push_str(&format!("{},,,,\n", sample_idx));
            continue;
        }
        for (landmark_idx, point) in frame.iter().enumerate() {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                sample_idx, landmark_idx, point.x, point.y, point.z
            ));
        }
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_poses::letter_pose;
    use std::fs;
    use std::path::PathBuf;

    fn write_tmp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("senas_{}_{}.csv", name, std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_exported_recording() {
        let frames = vec![letter_pose('A').landmarks(), letter_pose('V').landmarks()];
        let path = write_tmp("export", &frames_to_csv(&frames));

        let loaded = load_frames_from_csv(&path).unwrap();
        assert_eq!(loaded, frames);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_frames_survive_export_and_load() {
        let frames = vec![
            Vec::new(),
            letter_pose('A').landmarks(),
            Vec::new(),
            letter_pose('B').landmarks(),
            Vec::new(),
        ];
        let csv = frames_to_csv(&frames);
        assert!(csv.starts_with("sample,landmark,x,y,z\n0,,,,\n"));

        let path = write_tmp("empty_frames", &csv);
        let loaded = load_frames_from_csv(&path).unwrap();
        assert_eq!(loaded, frames);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn recording_of_only_empty_frames_loads() {
        let path = write_tmp("only_empty", "sample,landmark,x,y,z\n0,,,,\n1,,,,\n");
        let loaded = load_frames_from_csv(&path).unwrap();
        assert_eq!(loaded, vec![Vec::new(), Vec::new()]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn landmarks_are_ordered_by_index() {
        let path = write_tmp(
            "order",
            "sample,landmark,x,y,z\n0,2,0.2,0,0\n0,0,0.0,0,0\n0,1,0.1,0,0\n",
        );
        let loaded = load_frames_from_csv(&path).unwrap();
        let xs: Vec<f32> = loaded[0].iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.1, 0.2]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_samples_become_empty_frames() {
        let path = write_tmp("gaps", "sample,landmark,x,y,z\n0,0,0.5,0.5,0\n2,0,0.5,0.5,0\n");
        let loaded = load_frames_from_csv(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].len(), 1);
        assert!(loaded[1].is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rejects_out_of_range_landmark() {
        let path = write_tmp("range", "sample,landmark,x,y,z\n0,21,0.5,0.5,0\n");
        let err = load_frames_from_csv(&path).unwrap_err();
        assert!(err.to_string().contains("fuera de rango"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let path = write_tmp("numeric", "sample,landmark,x,y,z\n0,0,abc,0.5,0\n");
        let err = load_frames_from_csv(&path).unwrap_err();
        assert!(err.to_string().contains("x inválido"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rejects_empty_and_offset_files() {
        let empty = write_tmp("empty", "sample,landmark,x,y,z\n");
        assert!(load_frames_from_csv(&empty).is_err());
        let _ = fs::remove_file(&empty);

        let offset = write_tmp("offset", "sample,landmark,x,y,z\n3,0,0.5,0.5,0\n");
        assert!(load_frames_from_csv(&offset).is_err());
        let _ = fs::remove_file(&offset);
    }
}
