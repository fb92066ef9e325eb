//! Poses sintéticas para tests. Mano derecha vista de frente, palma de 0.2
//! (muñeca → MCP medio), huesos de 0.05, dedos apuntando hacia arriba.

use crate::types::*;

const BONE: f32 = 0.05;
const THUMB_BASE: Landmark = Landmark::new(0.42, 0.76, 0.0);
const THUMB_KNUCKLE: Landmark = Landmark::new(0.40, 0.71, 0.0);
/// Cuánto se hunde la IP hacia la cámara cuando el pulgar se recoge
const THUMB_TUCK_DEPTH: f32 = 0.09;

fn finger_base(finger: Finger) -> Landmark {
    match finger {
        Finger::Index => Landmark::new(0.44, 0.62, 0.0),
        Finger::Middle => Landmark::new(0.50, 0.60, 0.0),
        Finger::Ring => Landmark::new(0.56, 0.62, 0.0),
        Finger::Pinky => Landmark::new(0.61, 0.65, 0.0),
    }
}

#[derive(Clone)]
pub struct PoseBuilder {
    points: Vec<Landmark>,
}

impl PoseBuilder {
    /// Cinco dedos extendidos
    pub fn open_hand() -> Self {
        let mut builder = Self {
            points: vec![Landmark::default(); NUM_LANDMARKS],
        };
        builder.points[WRIST] = Landmark::new(0.5, 0.8, 0.0);
        for finger in Finger::ALL {
            builder = builder.bend(finger, 0.0);
        }
        builder.thumb_out()
    }

    /// Los cuatro dedos con PIP y DIP doblados 90° (curl ≈ 0.33)
    pub fn fist() -> Self {
        Self::open_hand().fingers([90.0, 90.0, 90.0, 90.0])
    }

    /// Dobla PIP y DIP del dedo `degrees` grados hacia la cámara.
    /// 0 → recto (1.0), 45 → 0.80, 60 → 0.67, 75 → 0.51, 90 → 0.33, 100 → 0.22
    pub fn bend(mut self, finger: Finger, degrees: f32) -> Self {
        let theta = degrees.to_radians();
        let dirs = [
            (0.0, -1.0, 0.0),
            (0.0, -theta.cos(), -theta.sin()),
            (0.0, -(2.0 * theta).cos(), -(2.0 * theta).sin()),
        ];
        let joints = finger.joints();
        let mut p = finger_base(finger);
        self.points[joints[0]] = p;
        for (k, (dx, dy, dz)) in dirs.iter().enumerate() {
            p = Landmark::new(p.x + dx * BONE, p.y + dy * BONE, p.z + dz * BONE);
            self.points[joints[k + 1]] = p;
        }
        self
    }

    /// Ángulos de flexión para índice, medio, anular y meñique
    pub fn fingers(mut self, degrees: [f32; 4]) -> Self {
        for (finger, deg) in Finger::ALL.into_iter().zip(degrees) {
            self = self.bend(finger, deg);
        }
        self
    }

    /// Pulgar recto hacia arriba a la izquierda (curl 1.0)
    pub fn thumb_out(mut self) -> Self {
        self.points[THUMB_CMC] = THUMB_BASE;
        for k in 1..4 {
            let step = BONE * k as f32;
            self.points[THUMB_CMC + k] =
                Landmark::new(THUMB_BASE.x - 0.6 * step, THUMB_BASE.y - 0.8 * step, 0.0);
        }
        self
    }

    /// Pulgar recogido con la punta en `tip`; la IP se hunde hacia la cámara
    pub fn thumb_to(mut self, tip: Landmark) -> Self {
        let m = THUMB_KNUCKLE;
        self.points[THUMB_CMC] = THUMB_BASE;
        self.points[THUMB_MCP] = m;
        self.points[THUMB_IP] = Landmark::new(
            (m.x + tip.x) / 2.0,
            (m.y + tip.y) / 2.0,
            (m.z + tip.z) / 2.0 - THUMB_TUCK_DEPTH,
        );
        self.points[THUMB_TIP] = tip;
        self
    }

    pub fn set(mut self, idx: usize, point: Landmark) -> Self {
        self.points[idx] = point;
        self
    }

    pub fn point(&self, idx: usize) -> Landmark {
        self.points[idx]
    }

    /// Gira la mano en el plano de imagen alrededor de la muñeca
    pub fn rotate(mut self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let c = self.points[WRIST];
        for p in self.points.iter_mut() {
            let dx = p.x - c.x;
            let dy = p.y - c.y;
            *p = Landmark::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos, p.z);
        }
        self
    }

    /// Escala todas las coordenadas respecto al origen
    pub fn scale(mut self, k: f32) -> Self {
        for p in self.points.iter_mut() {
            *p = Landmark::new(p.x * k, p.y * k, p.z * k);
        }
        self
    }

    pub fn landmarks(&self) -> Vec<Landmark> {
        self.points.clone()
    }

    pub fn build(&self) -> HandPose {
        HandPose::from_slice(&self.points).expect("21 landmarks")
    }
}

/// Una pose representativa por símbolo, con márgenes holgados respecto a
/// todos los umbrales del clasificador.
pub fn letter_pose(symbol: char) -> PoseBuilder {
    let fist = PoseBuilder::fist();
    // índice y medio doblados de más, anular y meñique más sueltos: la
    // dispersión de curl supera 0.15 y no se confunde con E
    let loose_fist = PoseBuilder::open_hand().fingers([100.0, 100.0, 75.0, 75.0]);
    let two_up = PoseBuilder::open_hand()
        .fingers([0.0, 0.0, 90.0, 90.0])
        .thumb_to(Landmark::new(0.53, 0.66, -0.03));
    let index_up = PoseBuilder::open_hand().fingers([0.0, 90.0, 90.0, 90.0]);

    match symbol {
        '5' => PoseBuilder::open_hand(),
        'B' => PoseBuilder::open_hand().thumb_to(Landmark::new(0.47, 0.66, -0.02)),
        'A' => fist,
        'Y' => fist.bend(Finger::Pinky, 0.0),
        'I' => fist
            .bend(Finger::Pinky, 0.0)
            .thumb_to(Landmark::new(0.47, 0.66, -0.02)),
        'L' => fist.bend(Finger::Index, 0.0),
        'W' => PoseBuilder::open_hand()
            .bend(Finger::Pinky, 90.0)
            .thumb_to(Landmark::new(0.55, 0.66, -0.03)),
        'F' => {
            let hooked = PoseBuilder::open_hand().bend(Finger::Index, 60.0);
            let tip = hooked.point(INDEX_TIP);
            hooked.thumb_to(Landmark::new(tip.x - 0.01, tip.y + 0.01, tip.z))
        }
        'V' => two_up,
        'U' => {
            let middle = two_up.point(MIDDLE_TIP);
            two_up.set(INDEX_TIP, Landmark::new(middle.x - 0.014, middle.y, 0.0))
        }
        'R' => {
            let middle = two_up.point(MIDDLE_TIP);
            two_up.set(INDEX_TIP, Landmark::new(middle.x - 0.008, middle.y, 0.0))
        }
        'K' => PoseBuilder::open_hand()
            .fingers([0.0, 0.0, 90.0, 90.0])
            .thumb_to(Landmark::new(0.5, 0.56, -0.02)),
        'H' => two_up.rotate(-90.0),
        'P' => two_up.rotate(180.0),
        'D' => index_up.thumb_to(Landmark::new(0.5, 0.62, -0.06)),
        'G' => index_up.rotate(-90.0),
        'Q' => index_up.rotate(180.0),
        'O' => {
            let round = PoseBuilder::open_hand().fingers([60.0, 75.0, 75.0, 75.0]);
            let tip = round.point(INDEX_TIP);
            round.thumb_to(Landmark::new(tip.x + 0.005, tip.y + 0.01, tip.z))
        }
        'X' => PoseBuilder::open_hand()
            .fingers([60.0, 90.0, 90.0, 90.0])
            .thumb_to(Landmark::new(0.58, 0.70, -0.02)),
        'C' => PoseBuilder::open_hand().fingers([60.0, 60.0, 60.0, 60.0]),
        'E' => fist.thumb_to(Landmark::new(0.47, 0.63, -0.06)),
        'T' => loose_fist.thumb_to(Landmark::new(0.45, 0.57, -0.01)),
        'N' => loose_fist.thumb_to(Landmark::new(0.51, 0.555, -0.01)),
        'M' => loose_fist.thumb_to(Landmark::new(0.57, 0.58, -0.01)),
        'S' => loose_fist.thumb_to(Landmark::new(0.47, 0.68, -0.03)),
        // medio y anular a medio doblar: ninguna regla encaja
        '?' => PoseBuilder::open_hand().fingers([0.0, 60.0, 60.0, 90.0]),
        other => panic!("sin pose sintética para {other:?}"),
    }
}

/// Símbolos con pose sintética en [`letter_pose`]
pub const POSED_SYMBOLS: &str = "5BAYILWFVURKHPDGQOXCETNMS?";
