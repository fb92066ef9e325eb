use crate::types::{Finger, HandPose, Landmark, MIDDLE_MCP, THUMB_CHAIN, WRIST};

/// Tamaño de palma que se usa cuando la distancia es 0 o NaN
pub const MIN_PALM_SIZE: f32 = 0.001;

/// Por debajo de este |ángulo| (o por encima de 180 - este) el índice apunta de lado
pub const SIDEWAYS_ANGLE_DEG: f32 = 50.0;
/// Ángulo del índice a partir del cual se considera que apunta hacia abajo
pub const POINTING_DOWN_ANGLE_DEG: f32 = 50.0;

/// Distancia euclídea 3D
pub fn distance(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Unidad de normalización: muñeca → MCP del dedo medio.
/// Sólo una palma nula o NaN se sustituye; palmas diminutas se respetan.
pub fn palm_size(pose: &HandPose) -> f32 {
    let d = distance(pose.get(WRIST), pose.get(MIDDLE_MCP));
    if d == 0.0 || d.is_nan() {
        MIN_PALM_SIZE
    } else {
        d
    }
}

/// Distancia directa primera→última articulación dividida por la suma de huesos.
/// ~1.0 recto, tiende a 0 cuando la punta se pliega sobre la base.
fn chain_curl(pose: &HandPose, chain: [usize; 4]) -> f32 {
    let bones: f32 = chain
        .windows(2)
        .map(|pair| distance(pose.get(pair[0]), pose.get(pair[1])))
        .sum();

    if bones == 0.0 {
        return 0.0;
    }
    distance(pose.get(chain[0]), pose.get(chain[3])) / bones
}

pub fn finger_curl(pose: &HandPose, finger: Finger) -> f32 {
    chain_curl(pose, finger.joints())
}

pub fn thumb_curl(pose: &HandPose) -> f32 {
    chain_curl(pose, THUMB_CHAIN)
}

/// Distancia entre dos landmarks en unidades de palma
pub fn normalized_distance(pose: &HandPose, i: usize, j: usize) -> f32 {
    distance(pose.get(i), pose.get(j)) / palm_size(pose)
}

/// Ángulo (grados) del vector MCP → TIP en el plano de imagen.
/// -90 = arriba, 90 = abajo, 0 = derecha (y crece hacia abajo).
pub fn tip_angle(pose: &HandPose, finger: Finger) -> f32 {
    let mcp = pose.get(finger.mcp());
    let tip = pose.get(finger.tip());
    (tip.y - mcp.y).atan2(tip.x - mcp.x).to_degrees()
}

/// El índice apunta más en horizontal que en vertical
pub fn is_sideways(pose: &HandPose) -> bool {
    let angle = tip_angle(pose, Finger::Index).abs();
    angle < SIDEWAYS_ANGLE_DEG || angle > 180.0 - SIDEWAYS_ANGLE_DEG
}

pub fn is_pointing_down(pose: &HandPose) -> bool {
    tip_angle(pose, Finger::Index) > POINTING_DOWN_ANGLE_DEG
}
