//! Reading correction against a whole-line reference transcript.
//!
//! Kana readings are romanized one unit at a time, which gets the topic particle は ("wa") and
//! the direction particle へ ("e") wrong. A morphological transcriber reads the whole line in
//! context; we partition its output over the per-segment readings with a minimum-cost dynamic
//! program and take the particle readings from the matching pieces.

use tracing::debug;

use crate::Result;
use crate::annotator::TAIL_SYMBOL;
use crate::backend::Transcriber;
use crate::segment::{Segment, SegmentKind, line_ranges};

/// The cheapest way to cut a reference string into one piece per target.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// One piece per target, in order. Concatenated, they spell the reference.
    pub pieces: Vec<String>,
    pub cost: f64,
}

/// Partition `reference` into `targets.len()` contiguous pieces with minimum total cost.
///
/// Empty targets take an empty piece at no cost; every other target takes at least one
/// character. Returns `None` when no such partition exists.
pub fn min_error_split<S: AsRef<str>>(targets: &[S], reference: &str) -> Option<Partition> {
    let chars: Vec<char> = reference.chars().collect();
    let n = chars.len();
    let m = targets.len();

    // cost[i][k]: cheapest way to cover the first `i` chars with the first `k` targets.
    // back[i][k]: where the piece for target `k - 1` started.
    let mut cost = vec![vec![f64::INFINITY; m + 1]; n + 1];
    let mut back: Vec<Vec<Option<usize>>> = vec![vec![None; m + 1]; n + 1];
    cost[0][0] = 0.0;

    for i in 0..=n {
        for k in 0..m {
            let here = cost[i][k];
            if here.is_infinite() {
                continue;
            }

            let target = targets[k].as_ref();
            if target.is_empty() {
                if here < cost[i][k + 1] {
                    cost[i][k + 1] = here;
                    back[i][k + 1] = Some(i);
                }
                continue;
            }

            let mut piece = String::new();
            for j in i + 1..=n {
                piece.push(chars[j - 1]);
                let next = here + transition_cost(&piece, target);
                if next < cost[j][k + 1] {
                    cost[j][k + 1] = next;
                    back[j][k + 1] = Some(i);
                }
            }
        }
    }

    if cost[n][m].is_infinite() {
        return None;
    }

    let mut pieces = Vec::with_capacity(m);
    let mut i = n;
    for k in (1..=m).rev() {
        let start = back[i][k]?;
        pieces.push(chars[start..i].iter().collect());
        i = start;
    }
    pieces.reverse();

    Some(Partition {
        pieces,
        cost: cost[n][m],
    })
}

/// Cost of reading `piece` where `target` was annotated.
///
/// Two misreadings are cheap: "wa" and "e", both against a literal "ha" (not "he").
fn transition_cost(piece: &str, target: &str) -> f64 {
    if piece == target {
        0.0
    } else if target == TAIL_SYMBOL {
        (piece.chars().count() as f64 * 0.1).min(1.0)
    } else if target == "ha" && (piece == "wa" || piece == "e") {
        0.1
    } else {
        1.0
    }
}

/// Correct particle readings line by line.
///
/// Lines without a literal は or へ are left alone without consulting the transcriber. A line
/// the transcriber has no reference for, or one that cannot be partitioned, keeps its readings.
pub fn reconcile(mut segments: Vec<Segment>, transcriber: &dyn Transcriber) -> Result<Vec<Segment>> {
    for range in line_ranges(&segments) {
        reconcile_line(&mut segments[range], transcriber)?;
    }
    Ok(segments)
}

fn reconcile_line(line: &mut [Segment], transcriber: &dyn Transcriber) -> Result<()> {
    if !line.iter().any(|seg| particle(seg).is_some()) {
        return Ok(());
    }

    let surface: String = line
        .iter()
        .filter(|seg| !seg.is_other())
        .map(|seg| seg.surface.as_str())
        .collect();

    let Some(reference) = transcriber.transcript(&surface)? else {
        debug!(line = %surface, "no reference transcript; keeping readings");
        return Ok(());
    };

    let targets: Vec<&str> = line.iter().map(|seg| seg.pronunciation.as_str()).collect();
    let Some(partition) = min_error_split(&targets, &reference) else {
        debug!(line = %surface, reference = %reference, "reference does not partition; keeping readings");
        return Ok(());
    };

    for (seg, piece) in line.iter_mut().zip(&partition.pieces) {
        if particle(seg) == Some(piece.as_str()) {
            seg.pronunciation = piece.clone();
        }
    }
    Ok(())
}

/// The context reading a literal particle may take.
fn particle(seg: &Segment) -> Option<&'static str> {
    if seg.kind != SegmentKind::Literal {
        return None;
    }
    match seg.surface.as_str() {
        "は" => Some("wa"),
        "へ" => Some("e"),
        _ => None,
    }
}
