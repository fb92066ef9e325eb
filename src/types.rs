use serde::{Deserialize, Serialize};

/// Punto 3D de la mano: x, y normalizados al frame [0,1], z profundidad relativa
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Constantes del esqueleto de mano
pub const NUM_LANDMARKS: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Cadena del pulgar: CMC → MCP → IP → TIP
pub const THUMB_CHAIN: [usize; 4] = [THUMB_CMC, THUMB_MCP, THUMB_IP, THUMB_TIP];

/// Los cuatro dedos largos (el pulgar se trata aparte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Índices [MCP, PIP, DIP, TIP]
    pub const fn joints(self) -> [usize; 4] {
        match self {
            Finger::Index => [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
            Finger::Middle => [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
            Finger::Ring => [RING_MCP, RING_PIP, RING_DIP, RING_TIP],
            Finger::Pinky => [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
        }
    }

    pub const fn mcp(self) -> usize {
        self.joints()[0]
    }

    pub const fn tip(self) -> usize {
        self.joints()[3]
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Index => "índice",
            Finger::Middle => "medio",
            Finger::Ring => "anular",
            Finger::Pinky => "meñique",
        }
    }
}

/// Pose de una mano: exactamente 21 landmarks.
///
/// Sólo se construye con [`HandPose::from_slice`], así que cualquier valor
/// existente ya cumple el invariante de longitud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    landmarks: [Landmark; NUM_LANDMARKS],
}

impl HandPose {
    /// Devuelve `None` si el detector no entregó exactamente 21 puntos
    pub fn from_slice(landmarks: &[Landmark]) -> Option<Self> {
        let landmarks: [Landmark; NUM_LANDMARKS] = landmarks.try_into().ok()?;
        Some(Self { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.landmarks
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Landmark {
        self.landmarks[idx]
    }
}

/// Símbolo para "ninguna regla coincide"
pub const UNKNOWN_SYMBOL: char = '?';
/// Mano abierta con los cinco dedos extendidos (no es letra)
pub const OPEN_HAND_SYMBOL: char = '5';

/// Resultado de una clasificación: símbolo + confianza fija de la regla
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub symbol: char,
    pub confidence: f32,
}

impl Classification {
    pub const fn new(symbol: char, confidence: f32) -> Self {
        Self { symbol, confidence }
    }

    pub const fn unknown() -> Self {
        Self::new(UNKNOWN_SYMBOL, 0.0)
    }

    pub fn is_unknown(&self) -> bool {
        self.symbol == UNKNOWN_SYMBOL
    }

    /// A–Z, '5' o '?'
    pub fn has_valid_symbol(&self) -> bool {
        self.symbol.is_ascii_uppercase()
            || self.symbol == OPEN_HAND_SYMBOL
            || self.symbol == UNKNOWN_SYMBOL
    }
}

/// Lo que entrega el proveedor de landmarks en cada ciclo: `None` = sin mano
pub type Frame = Option<Vec<Landmark>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_requires_exactly_21_landmarks() {
        let points = vec![Landmark::default(); 21];
        assert!(HandPose::from_slice(&points).is_some());
        assert!(HandPose::from_slice(&points[..20]).is_none());

        let too_many = vec![Landmark::default(); 22];
        assert!(HandPose::from_slice(&too_many).is_none());
        assert!(HandPose::from_slice(&[]).is_none());
    }

    #[test]
    fn finger_joints_follow_skeleton_layout() {
        let mut seen = vec![WRIST];
        seen.extend(THUMB_CHAIN);
        for finger in Finger::ALL {
            let joints = finger.joints();
            assert_eq!(joints[0], finger.mcp());
            assert_eq!(joints[3], finger.tip());
            assert_eq!(joints[3] - joints[0], 3);
            seen.extend(joints);
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..NUM_LANDMARKS).collect::<Vec<_>>());
    }

    #[test]
    fn classification_alphabet() {
        assert!(Classification::new('A', 0.78).has_valid_symbol());
        assert!(Classification::new('5', 0.75).has_valid_symbol());
        assert!(Classification::unknown().has_valid_symbol());
        assert!(!Classification::new('a', 0.5).has_valid_symbol());
        assert!(!Classification::new('7', 0.5).has_valid_symbol());
        assert_eq!(Classification::unknown().confidence, 0.0);
    }

    #[test]
    fn classification_serializes_symbol_as_string() {
        let json = serde_json::to_string(&Classification::new('V', 0.78)).unwrap();
        assert_eq!(json, r#"{"symbol":"V","confidence":0.78}"#);
    }
}
