//! Thermodynamic sequence extension and trimming.
//!
//! Melting temperature is not an invertible function of length, so both
//! operations work greedily one base at a time: [`extend_primer`] grows a
//! candidate until it crosses the target temperature, then keeps whichever
//! of the last two candidates lies closer; [`trim_homology`] shrinks an
//! over-extended region until removing another base would move the
//! temperature away from the target. Both loops carry a hard iteration
//! cap so that a pathological temperature function cannot hang a design
//! request.
//!
//! Example, backward extension on the top strand from `|`:
//!
//! ```text
//!                              start
//!                                |
//! top     GGGGAAAAAAAATTTATATATGGGGAAAAAAAATTTATATAT
//!              <-------------
//!              TTTATATATGGG        grows leftward until target Tm
//! ```

use crate::dna_sequence::{repeating_slice, Plasmid};
use crate::error::DesignError;
use crate::melting_temperature::{melting_temperature, TmAlgorithm, TmSettings};
use serde::{Deserialize, Serialize};

/// Cap for the growth loop; exceeding it is a design failure.
pub const MAX_EXTENSION_ITERATIONS: usize = 100;
/// Cap for the shrink loop.
pub const MAX_TRIM_ITERATIONS: usize = 100;

/// Which strand the candidate is read from. `Bottom` works on the
/// reverse complement with the start position mirrored accordingly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strand {
    Top,
    Bottom,
}

/// Growth direction along the working strand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthDirection {
    Forward,
    Backward,
}

/// Which end(s) the trimmer may consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrimMode {
    /// Remove alternately from the 5' and 3' ends (symmetric primers).
    Alternating,
    /// Remove from the 5' end only (asymmetric long insertions).
    FivePrimeOnly,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrimOutcome {
    pub sequence: Vec<u8>,
    pub removed_5: usize,
    pub removed_3: usize,
}

/// Grows a primer candidate from `start_pos` (1-based) until its melting
/// temperature reaches `target_tm` at a length of at least `min_length`.
///
/// Forward growth takes plasmid bases starting at `start_pos` itself;
/// backward growth takes the bases strictly before it. `initial` is a
/// fixed sequence (e.g. a mutation) glued to the plasmid-facing end of
/// the candidate: prepended for forward growth, appended for backward
/// growth. Growth only ever consumes plasmid bases.
///
/// Of the first two candidates satisfying the stop condition, the one
/// with the temperature closer to `target_tm` wins; a tie keeps the
/// longer (current) candidate.
pub fn extend_primer(
    plasmid: &Plasmid,
    start_pos: usize,
    strand: Strand,
    direction: GrowthDirection,
    target_tm: f64,
    algorithm: TmAlgorithm,
    min_length: usize,
    initial: &[u8],
    settings: &TmSettings,
) -> Result<Vec<u8>, DesignError> {
    let len = plasmid.len() as isize;
    let working = match strand {
        Strand::Top => plasmid.forward().to_vec(),
        Strand::Bottom => plasmid.reverse_complement(),
    };
    let start_index = match strand {
        Strand::Top => start_pos as isize - 1,
        Strand::Bottom => len - start_pos as isize + 1,
    };

    let build = |bases: usize| -> Result<Vec<u8>, DesignError> {
        let bases = bases as isize;
        let (from, to) = match direction {
            GrowthDirection::Forward => (start_index, start_index + bases),
            GrowthDirection::Backward => (start_index - bases, start_index),
        };
        if !plasmid.is_circular() && (from < 0 || to > len) {
            return Err(DesignError::OutOfBases);
        }
        let plasmid_part = repeating_slice(&working, from, to);
        let mut candidate = Vec::with_capacity(initial.len() + plasmid_part.len());
        match direction {
            GrowthDirection::Forward => {
                candidate.extend_from_slice(initial);
                candidate.extend_from_slice(&plasmid_part);
            }
            GrowthDirection::Backward => {
                candidate.extend_from_slice(&plasmid_part);
                candidate.extend_from_slice(initial);
            }
        }
        Ok(candidate)
    };

    let mut bases = min_length.saturating_sub(initial.len());
    let mut prev = build(bases)?;
    let mut prev_tm = melting_temperature(&prev, algorithm, settings);
    let mut curr = prev.clone();
    let mut curr_tm = prev_tm;

    for _ in 0..MAX_EXTENSION_ITERATIONS {
        if curr_tm >= target_tm && curr.len() >= min_length {
            // Tie-break: prefer the current candidate. The previous one
            // may be a base short of min_length; it is still returned
            // when strictly closer, matching long-standing behavior.
            if (curr_tm - target_tm).abs() <= (prev_tm - target_tm).abs() {
                return Ok(curr);
            }
            return Ok(prev);
        }
        prev = curr;
        prev_tm = curr_tm;
        bases += 1;
        curr = build(bases)?;
        curr_tm = melting_temperature(&curr, algorithm, settings);
    }

    Err(DesignError::ConvergenceFailure {
        target_tm,
        iterations: MAX_EXTENSION_ITERATIONS,
    })
}

/// Shrinks an over-extended homology candidate towards `target_tm`.
///
/// Each step proposes removing one base from the current end. The
/// removal is accepted while the sequence stays longer than `min_length`
/// and either the shortened temperature is still above the target or the
/// removal brings it at least as close. The turn alternates between the
/// two ends after every accepted removal in [`TrimMode::Alternating`].
pub fn trim_homology(
    sequence: &[u8],
    target_tm: f64,
    algorithm: TmAlgorithm,
    min_length: usize,
    mode: TrimMode,
    settings: &TmSettings,
) -> Result<TrimOutcome, DesignError> {
    let mut current = sequence.to_vec();
    let mut removed_5 = 0;
    let mut removed_3 = 0;
    let mut five_prime_turn = true;

    for _ in 0..MAX_TRIM_ITERATIONS {
        if current.is_empty() {
            break;
        }
        let candidate = if five_prime_turn {
            &current[1..]
        } else {
            &current[..current.len() - 1]
        };
        let current_tm = melting_temperature(&current, algorithm, settings);
        let candidate_tm = melting_temperature(candidate, algorithm, settings);

        let still_above_target = candidate_tm > target_tm;
        let removal_gets_closer =
            (target_tm - candidate_tm).abs() <= (target_tm - current_tm).abs();
        let above_min_length = current.len() > min_length;

        if (still_above_target || removal_gets_closer) && above_min_length {
            current = candidate.to_vec();
            if five_prime_turn {
                removed_5 += 1;
            } else {
                removed_3 += 1;
            }
            if mode == TrimMode::Alternating {
                five_prime_turn = !five_prime_turn;
            }
        } else {
            return Ok(TrimOutcome {
                sequence: current,
                removed_5,
                removed_3,
            });
        }
    }

    if current.len() <= min_length.max(1) {
        // The loop ran out of removable bases rather than iterations.
        return Ok(TrimOutcome {
            sequence: current,
            removed_5,
            removed_3,
        });
    }
    Err(DesignError::ConvergenceFailure {
        target_tm,
        iterations: MAX_TRIM_ITERATIONS,
    })
}
