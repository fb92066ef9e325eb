//! Clasificador estático de letras a partir de 21 landmarks.
//!
//! Cascada ordenada de reglas: se evalúan de arriba abajo y gana la primera
//! que coincide. Las formas más distintivas van primero para que las
//! variantes ambiguas de puño no las tapen. J y Z requieren movimiento, así
//! que estáticamente salen como I y D.

use crate::geometry::{
    finger_curl, is_pointing_down, is_sideways, normalized_distance, thumb_curl,
};
use crate::types::{
    Classification, Finger, HandPose, Landmark, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP,
    OPEN_HAND_SYMBOL, RING_PIP, THUMB_TIP,
};

/// curl > 0.72 → dedo extendido
pub const EXTENDED_CURL: f32 = 0.72;
/// curl < 0.58 → dedo doblado. Entre ambos umbrales no es ni una cosa ni otra.
pub const CURLED_CURL: f32 = 0.58;
/// El pulgar usa un umbral más estricto
pub const THUMB_EXTENDED_CURL: f32 = 0.78;

/// Medidas de la mano calculadas una sola vez por llamada.
/// Todas las distancias van en unidades de palma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandShape {
    /// curl de índice, medio, anular y meñique (orden de `Finger::ALL`)
    pub curls: [f32; 4],
    pub thumb_curl: f32,
    pub sideways: bool,
    pub pointing_down: bool,
    pub thumb_index_tip: f32,
    pub thumb_middle_tip: f32,
    pub index_middle_tip: f32,
    pub thumb_index_pip: f32,
    pub thumb_middle_pip: f32,
    pub thumb_ring_pip: f32,
}

impl HandShape {
    pub fn measure(pose: &HandPose) -> Self {
        Self {
            curls: Finger::ALL.map(|finger| finger_curl(pose, finger)),
            thumb_curl: thumb_curl(pose),
            sideways: is_sideways(pose),
            pointing_down: is_pointing_down(pose),
            thumb_index_tip: normalized_distance(pose, THUMB_TIP, INDEX_TIP),
            thumb_middle_tip: normalized_distance(pose, THUMB_TIP, MIDDLE_TIP),
            index_middle_tip: normalized_distance(pose, INDEX_TIP, MIDDLE_TIP),
            thumb_index_pip: normalized_distance(pose, THUMB_TIP, INDEX_PIP),
            thumb_middle_pip: normalized_distance(pose, THUMB_TIP, MIDDLE_PIP),
            thumb_ring_pip: normalized_distance(pose, THUMB_TIP, RING_PIP),
        }
    }

    #[inline]
    pub fn curl(&self, finger: Finger) -> f32 {
        self.curls[finger as usize]
    }

    pub fn extended(&self, finger: Finger) -> bool {
        self.curl(finger) > EXTENDED_CURL
    }

    pub fn curled(&self, finger: Finger) -> bool {
        self.curl(finger) < CURLED_CURL
    }

    pub fn thumb_extended(&self) -> bool {
        self.thumb_curl > THUMB_EXTENDED_CURL
    }

    /// Los cuatro dedos largos doblados
    fn fist(&self) -> bool {
        Finger::ALL.iter().all(|&f| self.curled(f))
    }

    /// Diferencia entre el curl máximo y el mínimo de los cuatro dedos
    fn curl_spread(&self) -> f32 {
        let max = self.curls.iter().copied().fold(f32::MIN, f32::max);
        let min = self.curls.iter().copied().fold(f32::MAX, f32::min);
        max - min
    }
}

/// Una entrada de la cascada. `check` devuelve el resultado si la regla aplica.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&HandShape) -> Option<Classification>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// Orden de evaluación de la cascada
pub static RULES: [Rule; 14] = [
    Rule { name: "Y", check: rule_y },
    Rule { name: "I", check: rule_i },
    Rule { name: "L", check: rule_l },
    Rule { name: "F", check: rule_f },
    Rule { name: "W", check: rule_w },
    Rule { name: "B", check: rule_b },
    Rule { name: "5", check: rule_open_hand },
    Rule { name: "dos-dedos", check: rule_two_fingers },
    Rule { name: "indice", check: rule_index_only },
    Rule { name: "O", check: rule_o },
    Rule { name: "X", check: rule_x },
    Rule { name: "C", check: rule_c },
    Rule { name: "A", check: rule_a },
    Rule { name: "puño", check: rule_fist },
];

fn hit(symbol: char, confidence: f32) -> Option<Classification> {
    Some(Classification::new(symbol, confidence))
}

// Pulgar y meñique fuera, el resto doblado
fn rule_y(s: &HandShape) -> Option<Classification> {
    let matches = s.thumb_extended()
        && s.extended(Finger::Pinky)
        && s.curled(Finger::Index)
        && s.curled(Finger::Middle)
        && s.curled(Finger::Ring);
    matches.then(|| Classification::new('Y', 0.85))
}

// Sólo el meñique (J estática cae aquí)
fn rule_i(s: &HandShape) -> Option<Classification> {
    let matches = s.extended(Finger::Pinky)
        && s.curled(Finger::Index)
        && s.curled(Finger::Middle)
        && s.curled(Finger::Ring)
        && !s.thumb_extended();
    matches.then(|| Classification::new('I', 0.82))
}

fn rule_l(s: &HandShape) -> Option<Classification> {
    let matches = s.thumb_extended()
        && s.extended(Finger::Index)
        && s.curled(Finger::Middle)
        && s.curled(Finger::Ring)
        && s.curled(Finger::Pinky)
        && !s.sideways
        && !s.pointing_down;
    matches.then(|| Classification::new('L', 0.85))
}

// Pulgar e índice forman el círculo, los otros tres arriba
fn rule_f(s: &HandShape) -> Option<Classification> {
    let matches = s.thumb_index_tip < 0.14
        && s.extended(Finger::Middle)
        && s.extended(Finger::Ring)
        && s.extended(Finger::Pinky);
    matches.then(|| Classification::new('F', 0.82))
}

fn rule_w(s: &HandShape) -> Option<Classification> {
    let matches = s.extended(Finger::Index)
        && s.extended(Finger::Middle)
        && s.extended(Finger::Ring)
        && s.curled(Finger::Pinky);
    matches.then(|| Classification::new('W', 0.82))
}

fn rule_b(s: &HandShape) -> Option<Classification> {
    let matches = Finger::ALL.iter().all(|&f| s.extended(f)) && !s.thumb_extended();
    matches.then(|| Classification::new('B', 0.82))
}

fn rule_open_hand(s: &HandShape) -> Option<Classification> {
    let matches = Finger::ALL.iter().all(|&f| s.extended(f)) && s.thumb_extended();
    matches.then(|| Classification::new(OPEN_HAND_SYMBOL, 0.75))
}

/// Índice y medio arriba: se decide por orientación y separación de puntas
fn rule_two_fingers(s: &HandShape) -> Option<Classification> {
    let applies = s.extended(Finger::Index)
        && s.extended(Finger::Middle)
        && s.curled(Finger::Ring)
        && s.curled(Finger::Pinky);
    if !applies {
        return None;
    }

    if s.sideways {
        return hit('H', 0.75);
    }
    if s.pointing_down {
        return hit('P', 0.75);
    }
    if s.thumb_middle_pip < 0.18 && s.index_middle_tip > 0.10 {
        return hit('K', 0.75);
    }
    // puntas casi superpuestas: dedos cruzados
    if s.index_middle_tip < 0.06 {
        return hit('R', 0.75);
    }
    if s.index_middle_tip < 0.09 {
        return hit('U', 0.80);
    }
    hit('V', 0.78)
}

/// Sólo el índice arriba
fn rule_index_only(s: &HandShape) -> Option<Classification> {
    let applies = s.extended(Finger::Index)
        && s.curled(Finger::Middle)
        && s.curled(Finger::Ring)
        && s.curled(Finger::Pinky);
    if !applies {
        return None;
    }

    if s.sideways && s.thumb_extended() {
        return hit('G', 0.75);
    }
    if s.pointing_down && s.thumb_extended() {
        return hit('Q', 0.75);
    }
    if s.thumb_middle_tip < 0.18 {
        return hit('D', 0.78);
    }
    // Z tiene la misma forma estática que D; sin historial de frames no se distinguen
    hit('D', 0.75)
}

fn rule_o(s: &HandShape) -> Option<Classification> {
    let index = s.curl(Finger::Index);
    let matches = s.thumb_index_tip < 0.16
        && index > 0.40
        && index < 0.80
        && !s.extended(Finger::Middle)
        && !s.extended(Finger::Ring)
        && !s.extended(Finger::Pinky);
    matches.then(|| Classification::new('O', 0.75))
}

// Índice en gancho: claramente más abierto que medio y anular (si no, es E)
fn rule_x(s: &HandShape) -> Option<Classification> {
    let index = s.curl(Finger::Index);
    let matches = index > 0.38
        && index < 0.72
        && s.curled(Finger::Middle)
        && s.curled(Finger::Ring)
        && s.curled(Finger::Pinky)
        && index - s.curl(Finger::Middle) > 0.12
        && index - s.curl(Finger::Ring) > 0.12;
    matches.then(|| Classification::new('X', 0.75))
}

// Todos medio curvados y el pulgar separado de las puntas
fn rule_c(s: &HandShape) -> Option<Classification> {
    let matches = s.curls.iter().all(|&c| c > 0.45 && c < 0.78) && s.thumb_index_tip > 0.12;
    matches.then(|| Classification::new('C', 0.80))
}

fn rule_a(s: &HandShape) -> Option<Classification> {
    (s.thumb_extended() && s.fist()).then(|| Classification::new('A', 0.78))
}

/// Puño con el pulgar recogido: E / T / N / M / S según dónde cae el pulgar
fn rule_fist(s: &HandShape) -> Option<Classification> {
    if !s.fist() || s.thumb_extended() {
        return None;
    }

    // pulgar cruzado sobre las puntas, o todos los dedos igual de doblados
    let thumb_over_tips = s.thumb_index_tip < 0.22 && s.thumb_middle_tip < 0.26;
    if thumb_over_tips || s.curl_spread() < 0.15 {
        return hit('E', 0.78);
    }
    if s.thumb_index_pip < 0.15 {
        return hit('T', 0.75);
    }
    if s.thumb_middle_pip < 0.15 {
        return hit('N', 0.75);
    }
    if s.thumb_ring_pip < 0.18 {
        return hit('M', 0.75);
    }
    hit('S', 0.75)
}

/// Recorre la cascada sobre medidas ya calculadas
pub fn classify_shape(shape: &HandShape) -> Classification {
    RULES
        .iter()
        .find_map(|rule| (rule.check)(shape))
        .unwrap_or_else(Classification::unknown)
}

/// Nombres de todas las reglas que aceptarían la forma, en orden de cascada
pub fn matching_rules(shape: &HandShape) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| (rule.check)(shape).is_some())
        .map(|rule| rule.name)
        .collect()
}

pub fn classify_pose(pose: &HandPose) -> Classification {
    classify_shape(&HandShape::measure(pose))
}

/// Punto de entrada: `None` si no hay mano o el detector no entregó 21
/// puntos. Para cualquier pose válida siempre hay resultado (quizá '?').
pub fn classify(landmarks: Option<&[Landmark]>) -> Option<Classification> {
    let pose = HandPose::from_slice(landmarks?)?;
    Some(classify_pose(&pose))
}
