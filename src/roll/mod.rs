//! All functionality for rolling formulas and working with their results.
//!
//! The [`Evaluator`] runs a formula's dice through a fixed pipeline: the initial roll, then rerolls, then explosions,
//! then keep/drop, and finally summation with the modifier. Explosions only happen as their own pass when the formula
//! has no reroll rule; with one, they're only triggered by recursive reroll draws (see [`modifier::reroll()`]).

pub mod modifier;
pub mod roller;

use alloc::{
	format,
	string::{String, ToString},
	vec::Vec,
};
use core::fmt;

pub use self::roller::Roller;
use crate::formula::{self, ParsedFormula};

/// Bounds on how much work evaluating a single formula may do
///
/// # Examples
/// ```
/// use talus::roll::{roller::Max as MaxRoller, Evaluator, Limits};
///
/// let mut evaluator = Evaluator::new(MaxRoller).with_limits(Limits::default().max_explosions(2));
/// let result = evaluator.roll("1d6!")?;
/// assert_eq!(result.initial_rolls, vec![6, 6, 6]);
/// assert_eq!(result.exploded_dice, vec![6, 6]);
/// # Ok::<(), talus::roll::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct Limits {
	/// Maximum number of dice the working set may ever hold
	pub max_dice: usize,

	/// Maximum number of times a single die may be redrawn by a recursive reroll
	pub max_rerolls: u32,

	/// Maximum number of additional dice a single original die may chain into by exploding
	pub max_explosions: u32,
}

impl Limits {
	/// Default for [`Self::max_dice`]
	pub const DEFAULT_MAX_DICE: usize = 10_000;

	/// Default for [`Self::max_rerolls`]
	pub const DEFAULT_MAX_REROLLS: u32 = 1_000;

	/// Default for [`Self::max_explosions`]
	pub const DEFAULT_MAX_EXPLOSIONS: u32 = 10;

	/// Creates the default limits.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			max_dice: Self::DEFAULT_MAX_DICE,
			max_rerolls: Self::DEFAULT_MAX_REROLLS,
			max_explosions: Self::DEFAULT_MAX_EXPLOSIONS,
		}
	}

	/// Sets the maximum number of dice the working set may ever hold.
	#[must_use]
	pub const fn max_dice(mut self, max_dice: usize) -> Self {
		self.max_dice = max_dice;
		self
	}

	/// Sets the maximum number of times a single die may be redrawn by a recursive reroll.
	#[must_use]
	pub const fn max_rerolls(mut self, max_rerolls: u32) -> Self {
		self.max_rerolls = max_rerolls;
		self
	}

	/// Sets the maximum number of additional dice a single original die may chain into by exploding.
	#[must_use]
	pub const fn max_explosions(mut self, max_explosions: u32) -> Self {
		self.max_explosions = max_explosions;
		self
	}
}

impl Default for Limits {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

/// Evaluates formulas using a [`Roller`] as its source of die values
///
/// The evaluator holds no state between rolls other than the roller itself.
///
/// # Examples
/// ```
/// use talus::roll::{roller::Iter as IterRoller, Evaluator};
///
/// let mut evaluator = Evaluator::new(IterRoller::new([2, 6, 1, 4]));
/// let result = evaluator.roll("4d6k3")?;
/// assert_eq!(result.kept_dice, vec![6, 4, 2]);
/// assert_eq!(result.dropped_dice, vec![1]);
/// assert_eq!(result.total, 12);
/// # Ok::<(), talus::roll::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Evaluator<R> {
	/// Source of die values
	roller: R,

	/// Bounds applied to every evaluation
	limits: Limits,
}

impl<R: Roller> Evaluator<R> {
	/// Creates a new evaluator that draws die values from the given roller, with default [`Limits`].
	#[must_use]
	pub const fn new(roller: R) -> Self {
		Self {
			roller,
			limits: Limits::new(),
		}
	}

	/// Replaces the evaluator's limits.
	#[must_use]
	pub const fn with_limits(mut self, limits: Limits) -> Self {
		self.limits = limits;
		self
	}

	/// Gets the evaluator's limits.
	#[must_use]
	#[inline]
	pub const fn limits(&self) -> &Limits {
		&self.limits
	}

	/// Consumes the evaluator, returning its roller.
	#[must_use]
	#[inline]
	pub fn into_roller(self) -> R {
		self.roller
	}

	/// Parses and rolls a formula string. The result's [`formula`](RollResult::formula) echoes the
	/// [normalized](formula::normalize()) input.
	///
	/// # Errors
	/// If the formula can't be parsed, [`Error::InvalidFormula`] is returned. Otherwise, any error from
	/// [`Self::roll_parsed()`] is returned.
	pub fn roll(&mut self, formula: &str) -> Result<RollResult, Error> {
		let normalized = formula::normalize(formula);
		let parsed = formula::parse(&normalized)?;
		self.evaluate(&parsed, normalized.into_owned())
	}

	/// Rolls an already-parsed formula. The result's [`formula`](RollResult::formula) is the formula's canonical
	/// notation.
	///
	/// # Errors
	/// If a recursive reroll could never finish, or exceeds [`Limits::max_rerolls`],
	/// [`Error::NonTerminatingReroll`] is returned. If the formula needs more dice than [`Limits::max_dice`],
	/// [`Error::TooManyDice`] is returned.
	pub fn roll_parsed(&mut self, parsed: &ParsedFormula) -> Result<RollResult, Error> {
		self.evaluate(parsed, parsed.to_string())
	}

	/// Runs the full evaluation pipeline for a formula.
	fn evaluate(&mut self, parsed: &ParsedFormula, formula: String) -> Result<RollResult, Error> {
		let limits = self.limits;
		let sides = parsed.sides;

		if usize::try_from(parsed.count).map_or(true, |count| count > limits.max_dice) {
			tracing::warn!(%formula, limit = limits.max_dice, "too many dice requested");
			return Err(Error::TooManyDice { limit: limits.max_dice });
		}

		let mut values = self.roller.roll_dice(parsed.count, sides);
		let mut rerolled_dice = Vec::new();
		let mut exploded_dice = Vec::new();
		let mut rerolled_at = Vec::new();
		let mut exploded_at = Vec::new();

		if let Some(rule) = parsed.reroll {
			let outcome = modifier::reroll(values, sides, rule, parsed.explode, &mut self.roller, &limits)?;
			values = outcome.values;
			rerolled_dice = outcome.rerolled;
			exploded_dice = outcome.exploded;
			rerolled_at = outcome.rerolled_at;
			exploded_at = outcome.exploded_at;
		} else if parsed.explode {
			let outcome = modifier::explode(values, sides, &mut self.roller, &limits)?;
			values = outcome.values;
			exploded_dice = outcome.exploded;
			exploded_at = outcome.exploded_at;
		}

		let mut dice = values.iter().map(|&val| DieRoll::new(val)).collect::<Vec<_>>();
		let mark = |dice: &mut [DieRoll], positions: &[usize], apply: fn(&mut DieRoll)| {
			for &pos in positions {
				if let Some(die) = dice.get_mut(pos) {
					apply(die);
				}
			}
		};
		mark(&mut dice, &rerolled_at, |die| die.rerolled = true);
		mark(&mut dice, &exploded_at, |die| die.exploded = true);

		let (kept_dice, dropped_dice) = match parsed.keep_drop {
			Some(rule) => {
				let (kept, dropped) = modifier::rank(&values, rule);
				mark(&mut dice, &dropped, |die| die.dropped = true);
				let pick = |positions: &[usize]| -> Vec<u32> {
					positions.iter().filter_map(|&pos| values.get(pos).copied()).collect()
				};
				(pick(&kept), pick(&dropped))
			}
			None => (values.clone(), Vec::new()),
		};

		let sum = kept_dice.iter().map(|&val| i64::from(val)).sum::<i64>();
		let total = parsed.modifier.map_or(sum, |modifier| modifier.apply(sum));

		tracing::debug!(
			%formula,
			total,
			rolled = values.len(),
			kept = kept_dice.len(),
			dropped = dropped_dice.len(),
			rerolled = rerolled_dice.len(),
			exploded = exploded_dice.len(),
			"rolled dice formula"
		);

		Ok(RollResult {
			rolls: kept_dice.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
			formula,
			initial_rolls: values,
			dice,
			kept_dice,
			dropped_dice,
			rerolled_dice,
			exploded_dice,
			total,
		})
	}
}

/// Representation of the result from rolling a formula, with full provenance of every modifier applied
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct RollResult {
	/// Formula that was rolled
	pub formula: String,

	/// Every die value in roll order, as it stood right before keep/drop. Rerolled dice hold their final value in
	/// place, and exploded dice are appended.
	pub initial_rolls: Vec<u32>,

	/// Every die in the same order as [`Self::initial_rolls`], marked with the modifiers that affected it
	pub dice: Vec<DieRoll>,

	/// Dice that count toward the total. In roll order when the formula has no keep/drop rule, otherwise sorted
	/// descending.
	pub kept_dice: Vec<u32>,

	/// Dice removed by the keep/drop rule, sorted descending
	pub dropped_dice: Vec<u32>,

	/// Original values of dice that were rerolled
	pub rerolled_dice: Vec<u32>,

	/// Values that triggered an explosion
	pub exploded_dice: Vec<u32>,

	/// Kept dice joined with `", "`, ready for display
	pub rolls: String,

	/// Sum of the kept dice with the modifier applied
	pub total: i64,
}

impl RollResult {
	/// Indicates whether the keep/drop rule removed any dice.
	#[must_use]
	#[inline]
	pub fn has_dropped(&self) -> bool {
		!self.dropped_dice.is_empty()
	}

	/// Indicates whether any dice were rerolled.
	#[must_use]
	#[inline]
	pub fn has_rerolled(&self) -> bool {
		!self.rerolled_dice.is_empty()
	}

	/// Indicates whether any dice exploded.
	#[must_use]
	#[inline]
	pub fn has_exploded(&self) -> bool {
		!self.exploded_dice.is_empty()
	}
}

impl Describe for RollResult {
	/// Builds a string of the formula the result is from and a list of all of the dice it ended up with, in roll
	/// order. Each die is marked with the modifiers that affected it (see [`DieRoll`]'s `Display` implementation).
	///
	/// If `list_limit` is specified and there are more dice than it, the list will be truncated and appended with
	/// "X more..." (where X is the remaining dice count past the max).
	///
	/// # Examples
	/// ```
	/// use talus::roll::{roller::Iter as IterRoller, Describe, Evaluator};
	///
	/// let result = Evaluator::new(IterRoller::new([2, 6, 1, 4])).roll("4d6k3")?;
	/// assert_eq!(result.describe(None), "4d6k3[2, 6, 1 (d), 4]");
	/// assert_eq!(result.describe(Some(2)), "4d6k3[2, 6, 2 more...]");
	///
	/// let result = Evaluator::new(IterRoller::new([1, 6, 3])).roll("2d6rr<2!")?;
	/// assert_eq!(result.describe(None), "2d6rr<2![6 (r) (x), 6, 3]");
	/// # Ok::<(), talus::roll::Error>(())
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let truncated_dice = self.dice.len().saturating_sub(list_limit);

		format!(
			"{}[{}{}]",
			self.formula,
			self.dice
				.iter()
				.take(list_limit)
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(", "),
			if truncated_dice > 0 {
				format!(", {truncated_dice} more...")
			} else {
				String::new()
			}
		)
	}
}

impl fmt::Display for RollResult {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to calling [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// A single die in a [`RollResult`], with the provenance of every modifier that affected it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct DieRoll {
	/// Value the die ended up with
	pub val: u32,

	/// Whether the die was rerolled (its value is the replacement)
	pub rerolled: bool,

	/// Whether the die triggered an explosion, either directly or through one of its reroll draws
	pub exploded: bool,

	/// Whether the die was dropped by the keep/drop rule
	pub dropped: bool,
}

impl DieRoll {
	/// Creates a new die roll with the given value that hasn't been affected by any modifiers.
	#[must_use]
	#[inline]
	pub const fn new(val: u32) -> Self {
		Self {
			val,
			rerolled: false,
			exploded: false,
			dropped: false,
		}
	}
}

impl fmt::Display for DieRoll {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The format of a die roll is its plain numeric value, followed by ` (r)` if it was rerolled, ` (x)` if it
	/// exploded, and ` (d)` if it was dropped.
	///
	/// # Examples
	/// ```
	/// use talus::roll::DieRoll;
	///
	/// assert_eq!(DieRoll::new(4).to_string(), "4");
	///
	/// let roll = DieRoll {
	/// 	exploded: true,
	/// 	dropped: true,
	/// 	..DieRoll::new(6)
	/// };
	/// assert_eq!(roll.to_string(), "6 (x) (d)");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}{}{}",
			self.val,
			if self.rerolled { " (r)" } else { "" },
			if self.exploded { " (x)" } else { "" },
			if self.dropped { " (d)" } else { "" }
		)
	}
}

/// Trait to allow creation of expanded descriptions with an optional max number of individual listed results where
/// applicable
pub trait Describe {
	/// Builds a detailed description for the value with an optional limit to the number of individual results listed
	/// in the description.
	fn describe(&self, list_limit: Option<usize>) -> String;
}

/// What kept a reroll or explosion from finishing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Runaway {
	/// The condition holds for every face of the die, so no draw could ever end it.
	Degenerate,

	/// A single die was redrawn the contained maximum number of times without settling.
	Rerolls(u32),
}

impl fmt::Display for Runaway {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Degenerate => f.write_str("condition holds for every face of the die"),
			Self::Rerolls(limit) => write!(f, "die was redrawn {limit} times without settling"),
		}
	}
}

/// An error resulting from rolling a formula
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The formula couldn't be parsed.
	///
	/// # Examples
	/// ```
	/// use talus::roll::{roller::Max as MaxRoller, Error, Evaluator};
	///
	/// assert!(matches!(Evaluator::new(MaxRoller).roll("0d6"), Err(Error::InvalidFormula(..))));
	/// ```
	#[error("invalid formula: {0}")]
	InvalidFormula(#[from] formula::Error),

	/// Recursive rerolling would never finish.
	///
	/// # Examples
	/// ```
	/// use talus::roll::{roller::Max as MaxRoller, Error, Evaluator, Runaway};
	///
	/// let result = Evaluator::new(MaxRoller).roll("1d1rr<2");
	/// assert_eq!(result, Err(Error::NonTerminatingReroll(Runaway::Degenerate)));
	/// ```
	#[error("rerolling would never finish: {0}")]
	NonTerminatingReroll(Runaway),

	/// Rolling would need more dice than allowed.
	#[error("rolling would need more than {limit} dice")]
	TooManyDice {
		/// Maximum number of dice that was exceeded
		limit: usize,
	},
}
