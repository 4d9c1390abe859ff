use crate::errors::{Error, Result};
use crate::util;

/// One contour in output-surface space.
pub type Ring = Vec<(f64, f64)>;

/// Endpoint separation beyond which a ring is treated as open and not
/// filled. Canonical value; earlier revisions of the renderer used 0.01.
pub const MAX_OPEN_DISTANCE: f64 = 0.05;

/// SVG path command string for one ring: a single move followed by lines.
/// Relative coordinates are not supported.
pub fn path_command(ring: &[(f64, f64)]) -> Result<String> {
    if ring.len() < 2 {
        return Err(Error::validation("at least 2 points are required"));
    }

    let mut commands = vec![format!("M {},{}", ring[0].0, ring[0].1)];
    for (x, y) in &ring[1..] {
        commands.push(format!("L {},{}", x, y));
    }
    Ok(commands.join(" "))
}

/// Command string for a shape with cutouts: every outer ring, then every
/// inner ring with its point order reversed. The reversal is the winding
/// contract for hole rendering under the even-odd fill rule; without it
/// fills come out inverted.
pub fn compound_path_command(outer: &[Ring], inner: &[Ring]) -> Result<String> {
    let mut commands = Vec::with_capacity(outer.len() + inner.len());
    for ring in outer {
        commands.push(path_command(ring)?);
    }
    for ring in inner {
        let reversed: Ring = ring.iter().rev().copied().collect();
        commands.push(path_command(&reversed)?);
    }
    Ok(commands.join(" "))
}

/// Is the ring open (endpoints further apart than `max_open`)? Open rings
/// are stroked but never filled.
pub fn is_open(ring: &[(f64, f64)], max_open: f64) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => util::dist(first.0, first.1, last.0, last.1) > max_open,
        _ => true,
    }
}
