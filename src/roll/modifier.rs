//! Transformations applied to the working set of die values while evaluating a formula.
//!
//! Each of these is a pure function of its inputs and the [`Roller`] it's given: they hold no state of their own,
//! and the die values they return are always newly-drawn values or values they were passed.

use alloc::{vec, vec::Vec};

use super::{roller::Roller, Error, Limits, Runaway};
use crate::formula::{KeepDrop, KeepDropMode, Reroll, RerollMode, TieBreak};

/// Die values after rerolling, along with the provenance of the rerolls
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct Rerolled {
	/// Working set of die values, with rerolled dice replaced in place and any explosions appended
	pub values: Vec<u32>,

	/// Original values of every die that qualified for a reroll
	pub rerolled: Vec<u32>,

	/// Values that triggered an explosion while rerolling recursively
	pub exploded: Vec<u32>,

	/// Positions in the working set of every die that was rerolled
	pub rerolled_at: Vec<usize>,

	/// Positions in the working set of every die whose reroll draws exploded
	pub exploded_at: Vec<usize>,
}

/// Die values after exploding, along with the provenance of the explosions
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct Exploded {
	/// Working set of die values, with every explosion appended
	pub values: Vec<u32>,

	/// Values that triggered an explosion
	pub exploded: Vec<u32>,

	/// Positions in the working set of every die that triggered an explosion
	pub exploded_at: Vec<usize>,
}

/// Rerolls every die that meets the rule's comparison, replacing it in place.
///
/// [`RerollMode::Once`] and [`RerollMode::OnceKeepNew`] draw a single replacement. [`RerollMode::Recursive`] keeps
/// drawing until the replacement no longer qualifies, and if `exploding` is set, every replacement draw that lands on
/// the max value appends one additional die to the working set. Appended dice are checked for rerolls as well once
/// the scan reaches them.
///
/// # Errors
/// If a recursive reroll could never settle (every face qualifies), or a single die is redrawn more than
/// [`Limits::max_rerolls`] times, [`Error::NonTerminatingReroll`] is returned. If explosions would grow the working
/// set past [`Limits::max_dice`], [`Error::TooManyDice`] is returned.
///
/// # Examples
/// ```
/// use talus::{
/// 	formula::{Comparator, Reroll, RerollMode},
/// 	roll::{modifier::reroll, roller::Iter as IterRoller, Limits},
/// };
///
/// let rule = Reroll {
/// 	mode: RerollMode::Recursive,
/// 	comparator: Comparator::LessThan,
/// 	threshold: 3,
/// };
/// let mut rng = IterRoller::new([1, 2, 5]);
/// let outcome = reroll(vec![4, 1, 6], 6, rule, false, &mut rng, &Limits::default())?;
/// assert_eq!(outcome.values, vec![4, 5, 6]);
/// assert_eq!(outcome.rerolled, vec![1]);
/// # Ok::<(), talus::roll::Error>(())
/// ```
pub fn reroll(
	mut values: Vec<u32>,
	sides: u32,
	rule: Reroll,
	exploding: bool,
	rng: &mut impl Roller,
	limits: &Limits,
) -> Result<Rerolled, Error> {
	let recurse = rule.mode == RerollMode::Recursive;
	if recurse && rule.always_triggers(sides) {
		tracing::warn!(%rule, sides, "recursive reroll condition holds for every face");
		return Err(Error::NonTerminatingReroll(Runaway::Degenerate));
	}

	let mut rerolled = Vec::new();
	let mut exploded = Vec::new();
	let mut rerolled_at = Vec::new();
	let mut exploded_at = Vec::new();

	// The working set can grow while scanning it, so index rather than iterate
	let mut idx = 0;
	while let Some(&val) = values.get(idx) {
		if rule.check(val) {
			rerolled.push(val);
			rerolled_at.push(idx);

			let replacement = if recurse {
				let mut draws: u32 = 0;
				loop {
					if draws >= limits.max_rerolls {
						tracing::warn!(%rule, sides, limit = limits.max_rerolls, "reroll limit reached");
						return Err(Error::NonTerminatingReroll(Runaway::Rerolls(limits.max_rerolls)));
					}
					draws = draws.saturating_add(1);

					let draw = rng.roll_die(sides);
					tracing::trace!(original = val, draw, "rerolled die");

					if exploding && draw == sides {
						if values.len() >= limits.max_dice {
							return Err(Error::TooManyDice { limit: limits.max_dice });
						}
						let extra = rng.roll_die(sides);
						tracing::trace!(trigger = draw, extra, "exploded while rerolling");
						exploded.push(draw);
						values.push(extra);
						if exploded_at.last() != Some(&idx) {
							exploded_at.push(idx);
						}
					}

					if !rule.check(draw) {
						break draw;
					}
				}
			} else {
				let draw = rng.roll_die(sides);
				tracing::trace!(original = val, draw, "rerolled die");
				draw
			};

			if let Some(slot) = values.get_mut(idx) {
				*slot = replacement;
			}
		}

		idx = idx.saturating_add(1);
	}

	Ok(Rerolled {
		values,
		rerolled,
		exploded,
		rerolled_at,
		exploded_at,
	})
}

/// Explodes every die that rolled its max value, appending one new die for each. Newly-appended dice are scanned
/// too, so a run of max values keeps chaining, up to [`Limits::max_explosions`] additional dice per original die.
/// Chains that reach that depth are cut off rather than treated as an error, which also bounds single-sided dice
/// (where every roll is a max roll).
///
/// # Errors
/// If explosions would grow the working set past [`Limits::max_dice`], [`Error::TooManyDice`] is returned.
///
/// # Examples
/// ```
/// use talus::roll::{modifier::explode, roller::Iter as IterRoller, Limits};
///
/// let mut rng = IterRoller::new([6, 3]);
/// let outcome = explode(vec![6, 2, 4], 6, &mut rng, &Limits::default())?;
/// assert_eq!(outcome.values, vec![6, 2, 4, 6, 3]);
/// assert_eq!(outcome.exploded, vec![6, 6]);
/// assert_eq!(outcome.exploded_at, vec![0, 3]);
/// # Ok::<(), talus::roll::Error>(())
/// ```
pub fn explode(mut values: Vec<u32>, sides: u32, rng: &mut impl Roller, limits: &Limits) -> Result<Exploded, Error> {
	// Position of each die in its explosion chain (0 for the dice passed in)
	let mut depths = vec![0_u32; values.len()];
	let mut exploded = Vec::new();
	let mut exploded_at = Vec::new();

	let mut idx = 0;
	while let (Some(&val), Some(&depth)) = (values.get(idx), depths.get(idx)) {
		if val == sides {
			if depth < limits.max_explosions {
				if values.len() >= limits.max_dice {
					return Err(Error::TooManyDice { limit: limits.max_dice });
				}
				let extra = rng.roll_die(sides);
				tracing::trace!(trigger = val, extra, depth, "exploded die");
				exploded.push(val);
				exploded_at.push(idx);
				values.push(extra);
				depths.push(depth.saturating_add(1));
			} else {
				tracing::warn!(sides, limit = limits.max_explosions, "explosion chain cut off");
			}
		}

		idx = idx.saturating_add(1);
	}

	Ok(Exploded {
		values,
		exploded,
		exploded_at,
	})
}

/// Partitions die values into kept and dropped sets according to a keep/drop rule.
///
/// Values are ranked by a stable descending sort, so equal values keep their roll order and the earlier-rolled one
/// ranks higher. The rule's count is compared against the number of values given; when it's greater than or equal to
/// it, everything is selected (kept for keep rules, dropped for drop rules). Both returned sets are sorted
/// descending.
///
/// # Examples
/// ```
/// use talus::{
/// 	formula::{KeepDrop, KeepDropMode, TieBreak},
/// 	roll::modifier::keep_drop,
/// };
///
/// let rule = KeepDrop {
/// 	mode: KeepDropMode::Keep,
/// 	tie_break: TieBreak::Highest,
/// 	count: 3,
/// };
/// let (kept, dropped) = keep_drop(&[2, 6, 1, 4], rule);
/// assert_eq!(kept, vec![6, 4, 2]);
/// assert_eq!(dropped, vec![1]);
/// ```
#[must_use]
pub fn keep_drop(values: &[u32], rule: KeepDrop) -> (Vec<u32>, Vec<u32>) {
	let (kept, dropped) = rank(values, rule);
	let pick = |positions: Vec<usize>| -> Vec<u32> {
		positions.into_iter().filter_map(|pos| values.get(pos).copied()).collect()
	};
	(pick(kept), pick(dropped))
}

/// Partitions the positions of die values into kept and dropped sets according to a keep/drop rule, using the same
/// ranking as [`keep_drop()`]. Both returned sets list positions from highest-ranked to lowest.
///
/// # Examples
/// ```
/// use talus::{
/// 	formula::{KeepDrop, KeepDropMode, TieBreak},
/// 	roll::modifier::rank,
/// };
///
/// let rule = KeepDrop {
/// 	mode: KeepDropMode::Drop,
/// 	tie_break: TieBreak::Lowest,
/// 	count: 1,
/// };
/// let (kept, dropped) = rank(&[3, 1, 3], rule);
/// assert_eq!(kept, vec![0, 2]);
/// assert_eq!(dropped, vec![1]);
/// ```
#[must_use]
pub fn rank(values: &[u32], rule: KeepDrop) -> (Vec<usize>, Vec<usize>) {
	let mut higher = (0..values.len()).collect::<Vec<_>>();
	higher.sort_by(|&a, &b| values.get(b).cmp(&values.get(a)));

	let len = higher.len();
	let count = usize::try_from(rule.count).map_or(len, |count| count.min(len));
	let split = match rule.tie_break {
		TieBreak::Highest => count,
		TieBreak::Lowest => len.saturating_sub(count),
	};
	let lower = higher.split_off(split);

	match (rule.mode, rule.tie_break) {
		(KeepDropMode::Keep, TieBreak::Highest) | (KeepDropMode::Drop, TieBreak::Lowest) => (higher, lower),
		(KeepDropMode::Keep, TieBreak::Lowest) | (KeepDropMode::Drop, TieBreak::Highest) => (lower, higher),
	}
}
