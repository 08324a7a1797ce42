//! Dice formulas: their structured representation, validation, and parsing from notation strings.
//!
//! A formula is a single dice term in the form `[count]d<sides>[keep/drop][reroll][!][+/-modifier]`, such as
//! `4d6k3`, `1d20r<2`, `3d6!`, or `2d20kl1+5`. Parsing is case-insensitive and performs no rolling.

pub mod parser;
pub mod segment;

use alloc::{
	borrow::Cow,
	format,
	string::{String, ToString},
	vec::Vec,
};
use core::{fmt, str::FromStr};

use chumsky::Parser as _;

use self::parser::Notation;
pub use self::segment::{Comparator, KeepDrop, KeepDropMode, Modifier, Reroll, RerollMode, Sign, TieBreak};

/// A fully-parsed dice formula, ready to be rolled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct ParsedFormula {
	/// Number of dice to roll initially
	pub count: u32,

	/// Number of sides for each die
	pub sides: u32,

	/// Keep/drop rule to partition the rolled dice with, if any
	pub keep_drop: Option<KeepDrop>,

	/// Reroll rule to apply to the rolled dice, if any
	pub reroll: Option<Reroll>,

	/// Whether dice that roll their max value add another die
	pub explode: bool,

	/// Flat value to add to or subtract from the total, if any
	pub modifier: Option<Modifier>,
}

impl ParsedFormula {
	/// Creates a new plain formula with a given count and number of sides.
	#[must_use]
	pub const fn new(count: u32, sides: u32) -> Self {
		Self {
			count,
			sides,
			keep_drop: None,
			reroll: None,
			explode: false,
			modifier: None,
		}
	}

	/// Creates a new formula builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}

	/// Checks whether the formula applies any modifiers beyond simply summing its dice.
	#[must_use]
	pub const fn is_plain(&self) -> bool {
		self.keep_drop.is_none() && self.reroll.is_none() && !self.explode && self.modifier.is_none()
	}

	/// Converts raw notation captures into a formula, checking every number against its allowed range.
	fn from_notation(notation: &Notation<'_>, formula: &str) -> Result<Self, Error> {
		let out_of_range = |field: Field, value: &str| Error::OutOfRange {
			formula: formula.to_string(),
			field,
			value: value.to_string(),
		};

		// Parses a numeric capture, rejecting anything that doesn't fit or is below the field's minimum
		let number = |field: Field, digits: &str| -> Result<u32, Error> {
			let val = digits.parse::<u32>().map_err(|_err| out_of_range(field, digits))?;
			if val < field.min() {
				return Err(out_of_range(field, digits));
			}
			Ok(val)
		};

		let count = match notation.count {
			Some(digits) => number(Field::Count, digits)?,
			None => 1,
		};
		let sides = number(Field::Sides, notation.sides)?;

		let keep_drop = notation
			.keep_drop
			.map(|(mode, tie_break, digits)| {
				Ok::<_, Error>(KeepDrop {
					mode,
					tie_break,
					count: number(Field::KeepDropCount, digits)?,
				})
			})
			.transpose()?;

		let reroll = notation
			.reroll
			.map(|(mode, comparator, digits)| {
				Ok::<_, Error>(Reroll {
					mode,
					comparator,
					threshold: number(Field::Threshold, digits)?,
				})
			})
			.transpose()?;

		let modifier = notation
			.modifier
			.map(|(sign, digits)| {
				Ok::<_, Error>(Modifier {
					sign,
					value: number(Field::ModifierValue, digits)?,
				})
			})
			.transpose()?;

		Ok(Self {
			count,
			sides,
			keep_drop,
			reroll,
			explode: notation.explode,
			modifier,
		})
	}
}

impl Default for ParsedFormula {
	/// Creates the default formula (1d20).
	#[inline]
	fn default() -> Self {
		Self::new(1, 20)
	}
}

impl fmt::Display for ParsedFormula {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is canonical notation that parses back into an identical formula.
	///
	/// # Examples
	/// ```
	/// use talus::formula::ParsedFormula;
	///
	/// let formula: ParsedFormula = "4D6K3RR<2!+5".parse()?;
	/// assert_eq!(formula.to_string(), "4d6kh3rr<2!+5");
	/// # Ok::<(), talus::formula::Error>(())
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)?;
		if let Some(keep_drop) = self.keep_drop {
			write!(f, "{keep_drop}")?;
		}
		if let Some(reroll) = self.reroll {
			write!(f, "{reroll}")?;
		}
		if self.explode {
			f.write_str("!")?;
		}
		if let Some(modifier) = self.modifier {
			write!(f, "{modifier}")?;
		}
		Ok(())
	}
}

impl FromStr for ParsedFormula {
	type Err = Error;

	/// Parses a formula string. Equivalent to [`parse()`].
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s)
	}
}

/// Applies shorthand rewrites to a formula string so it can be matched against the full grammar.
///
/// Surrounding whitespace is trimmed, a string of only digits (`"20"`) becomes `"1d20"`, and a string starting with
/// `d` (`"d20"`) gets a count of `1` prefixed. Anything else is returned as-is (minus the trimmed whitespace).
///
/// # Examples
/// ```
/// use talus::formula::normalize;
///
/// assert_eq!(normalize("20"), "1d20");
/// assert_eq!(normalize(" d8 "), "1d8");
/// assert_eq!(normalize("D8"), "1D8");
/// assert_eq!(normalize("4d6k3"), "4d6k3");
/// ```
#[must_use]
pub fn normalize(formula: &str) -> Cow<'_, str> {
	let trimmed = formula.trim();
	if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
		Cow::Owned(format!("1d{trimmed}"))
	} else if trimmed.starts_with(['d', 'D']) {
		Cow::Owned(format!("1{trimmed}"))
	} else {
		Cow::Borrowed(trimmed)
	}
}

/// Checks whether a formula string matches the dice grammar in its entirety (after [normalization](normalize())).
///
/// This is cheaper than [`parse()`] and never fails. Note that it only checks the shape of the formula, so a
/// grammatically-correct formula with out-of-range numbers such as `0d6` is still considered valid here.
///
/// # Examples
/// ```
/// use talus::formula::validate;
///
/// assert!(validate("2d20kl1+5"));
/// assert!(validate("d20"));
/// assert!(validate("20"));
/// assert!(!validate("2d20 and then some"));
/// assert!(!validate("roll a d20"));
/// ```
#[must_use]
pub fn validate(formula: &str) -> bool {
	let lc = normalize(formula).to_ascii_lowercase();
	let valid = parser::notation().parse(lc.as_str()).into_result().is_ok();
	valid
}

/// Parses a formula string (after [normalization](normalize())) into a [`ParsedFormula`].
///
/// # Errors
/// If the formula doesn't match the grammar, [`Error::Malformed`] is returned. If it does, but one of its numbers is
/// out of the allowed range for its position (such as a count or number of sides of `0`), [`Error::OutOfRange`] is
/// returned.
///
/// # Examples
/// ```
/// use talus::formula::{parse, Error, KeepDrop, KeepDropMode, ParsedFormula, TieBreak};
///
/// let formula = parse("4d6k3")?;
/// assert_eq!(
/// 	formula,
/// 	ParsedFormula {
/// 		keep_drop: Some(KeepDrop {
/// 			mode: KeepDropMode::Keep,
/// 			tie_break: TieBreak::Highest,
/// 			count: 3,
/// 		}),
/// 		..ParsedFormula::new(4, 6)
/// 	}
/// );
///
/// assert!(matches!(parse("4d"), Err(Error::Malformed { .. })));
/// assert!(matches!(parse("0d6"), Err(Error::OutOfRange { .. })));
/// # Ok::<(), talus::formula::Error>(())
/// ```
pub fn parse(formula: &str) -> Result<ParsedFormula, Error> {
	let normalized = normalize(formula);
	let lc = normalized.to_ascii_lowercase();
	tracing::trace!(formula = %normalized, "parsing dice formula");

	let notation = parser::notation()
		.parse(lc.as_str())
		.into_result()
		.map_err(|errs| Error::Malformed {
			formula: normalized.to_string(),
			details: errs.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "),
		})?;

	ParsedFormula::from_notation(&notation, &normalized)
}

/// Numeric fields of a formula that are range-checked during parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Field {
	/// Number of dice
	Count,

	/// Number of sides per die
	Sides,

	/// Number of dice to keep or drop
	KeepDropCount,

	/// Value rerolled dice are compared against
	Threshold,

	/// Flat value added to or subtracted from the total
	ModifierValue,
}

impl Field {
	/// Smallest value the field accepts
	const fn min(self) -> u32 {
		match self {
			Self::Count | Self::Sides | Self::KeepDropCount => 1,
			Self::Threshold | Self::ModifierValue => 0,
		}
	}
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Count => "dice count",
			Self::Sides => "dice sides",
			Self::KeepDropCount => "keep/drop count",
			Self::Threshold => "reroll threshold",
			Self::ModifierValue => "modifier value",
		})
	}
}

/// An error resulting from parsing a formula
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The formula doesn't match the dice grammar.
	///
	/// # Examples
	/// ```
	/// use talus::formula::{parse, Error};
	///
	/// assert!(matches!(parse("4d6k"), Err(Error::Malformed { .. })));
	/// ```
	#[error("malformed dice formula \"{formula}\": {details}")]
	Malformed {
		/// Normalized formula that failed to match
		formula: String,

		/// Description of everything that went wrong while matching
		details: String,
	},

	/// The formula matches the grammar, but one of its numbers isn't allowed in its position.
	///
	/// # Examples
	/// ```
	/// use talus::formula::{parse, Error, Field};
	///
	/// assert!(matches!(parse("3d0"), Err(Error::OutOfRange { field: Field::Sides, .. })));
	/// assert!(matches!(parse("99999999999d6"), Err(Error::OutOfRange { field: Field::Count, .. })));
	/// ```
	#[error("{field} out of range in dice formula \"{formula}\": {value}")]
	OutOfRange {
		/// Normalized formula containing the number
		formula: String,

		/// Which part of the formula the number belongs to
		field: Field,

		/// The number as written
		value: String,
	},
}

/// Builds [`ParsedFormula`]s with a fluent interface.
///
/// # Examples
/// ```
/// use talus::formula::{Comparator, ParsedFormula, RerollMode};
///
/// let formula = ParsedFormula::builder()
/// 	.count(4)
/// 	.sides(6)
/// 	.reroll(RerollMode::Recursive, Comparator::LessThan, 2)
/// 	.keep_high(3)
/// 	.plus(2)
/// 	.build();
/// assert_eq!(formula.to_string(), "4d6kh3rr<2+2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(ParsedFormula);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn count(mut self, count: u32) -> Self {
		self.0.count = count;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: u32) -> Self {
		self.0.sides = sides;
		self
	}

	/// Sets a keep highest rule.
	#[must_use]
	pub const fn keep_high(self, count: u32) -> Self {
		self.keep_drop(KeepDropMode::Keep, TieBreak::Highest, count)
	}

	/// Sets a keep lowest rule.
	#[must_use]
	pub const fn keep_low(self, count: u32) -> Self {
		self.keep_drop(KeepDropMode::Keep, TieBreak::Lowest, count)
	}

	/// Sets a drop highest rule.
	#[must_use]
	pub const fn drop_high(self, count: u32) -> Self {
		self.keep_drop(KeepDropMode::Drop, TieBreak::Highest, count)
	}

	/// Sets a drop lowest rule.
	#[must_use]
	pub const fn drop_low(self, count: u32) -> Self {
		self.keep_drop(KeepDropMode::Drop, TieBreak::Lowest, count)
	}

	/// Sets the keep/drop rule.
	#[must_use]
	pub const fn keep_drop(mut self, mode: KeepDropMode, tie_break: TieBreak, count: u32) -> Self {
		self.0.keep_drop = Some(KeepDrop {
			mode,
			tie_break,
			count,
		});
		self
	}

	/// Sets the reroll rule.
	#[must_use]
	pub const fn reroll(mut self, mode: RerollMode, comparator: Comparator, threshold: u32) -> Self {
		self.0.reroll = Some(Reroll {
			mode,
			comparator,
			threshold,
		});
		self
	}

	/// Makes the dice explode.
	#[must_use]
	pub const fn explode(mut self) -> Self {
		self.0.explode = true;
		self
	}

	/// Sets a modifier that adds to the total.
	#[must_use]
	pub const fn plus(mut self, value: u32) -> Self {
		self.0.modifier = Some(Modifier {
			sign: Sign::Plus,
			value,
		});
		self
	}

	/// Sets a modifier that subtracts from the total.
	#[must_use]
	pub const fn minus(mut self, value: u32) -> Self {
		self.0.modifier = Some(Modifier {
			sign: Sign::Minus,
			value,
		});
		self
	}

	/// Finalizes the formula.
	#[must_use]
	pub const fn build(self) -> ParsedFormula {
		self.0
	}
}
