//! Optional segments of a formula that follow its dice, and their related types.

use core::fmt;

/// Rule for partitioning rolled dice into kept and dropped sets by rank.
///
/// Dice are ranked by sorting them in descending order, with ties broken by roll order (the earlier-rolled die of two
/// equal values ranks higher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct KeepDrop {
	/// Whether the selected dice are kept or dropped
	pub mode: KeepDropMode,

	/// Whether the selection is taken from the highest or lowest dice
	pub tie_break: TieBreak,

	/// Number of dice to select
	pub count: u32,
}

impl fmt::Display for KeepDrop {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The explicit two-letter form is always used, so `k3` is output as `kh3` and `d1` as `dh1`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}{}",
			match self.mode {
				KeepDropMode::Keep => 'k',
				KeepDropMode::Drop => 'd',
			},
			match self.tie_break {
				TieBreak::Highest => 'h',
				TieBreak::Lowest => 'l',
			},
			self.count
		)
	}
}

/// Whether a [`KeepDrop`] rule keeps or drops its selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum KeepDropMode {
	/// Keep the selected dice and drop the rest (`k`, `kh`, `kl`)
	Keep,

	/// Drop the selected dice and keep the rest (`d`, `dh`, `dl`)
	Drop,
}

/// Which end of the ranked dice a [`KeepDrop`] rule selects from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum TieBreak {
	/// Select the highest-ranked dice
	Highest,

	/// Select the lowest-ranked dice
	Lowest,
}

/// Rule for rerolling dice that meet a comparison against a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct Reroll {
	/// How many times a qualifying die may be redrawn
	pub mode: RerollMode,

	/// Comparison dice are checked with
	pub comparator: Comparator,

	/// Value dice are compared against
	pub threshold: u32,
}

impl Reroll {
	/// Checks whether a die value qualifies for a reroll.
	#[must_use]
	#[inline]
	pub const fn check(&self, val: u32) -> bool {
		self.comparator.check(val, self.threshold)
	}

	/// Checks whether every face of a die with the given number of sides qualifies for a reroll, meaning a recursive
	/// reroll could never settle.
	#[must_use]
	pub const fn always_triggers(&self, sides: u32) -> bool {
		match self.comparator {
			Comparator::LessThan => self.threshold > sides,
			Comparator::GreaterThan => self.threshold == 0,
		}
	}
}

impl fmt::Display for Reroll {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}{}",
			match self.mode {
				RerollMode::Once => "r",
				RerollMode::OnceKeepNew => "ro",
				RerollMode::Recursive => "rr",
			},
			self.comparator,
			self.threshold
		)
	}
}

/// How a [`Reroll`] rule redraws qualifying dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum RerollMode {
	/// Redraw once, keeping the new value (`r`)
	Once,

	/// Redraw once, keeping the new value (`ro`). Behaves identically to [`Self::Once`].
	OnceKeepNew,

	/// Redraw until the new value no longer qualifies (`rr`)
	Recursive,
}

/// Comparison a [`Reroll`] rule checks dice with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum Comparator {
	/// Checks whether values are less than the threshold. Symbol: `<`
	LessThan,

	/// Checks whether values are greater than the threshold. Symbol: `>`
	GreaterThan,
}

impl Comparator {
	/// Checks a value against a threshold.
	#[must_use]
	pub const fn check(self, val: u32, threshold: u32) -> bool {
		match self {
			Self::LessThan => val < threshold,
			Self::GreaterThan => val > threshold,
		}
	}

	/// Gets the symbol that represents the comparator.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::LessThan => '<',
			Self::GreaterThan => '>',
		}
	}
}

impl fmt::Display for Comparator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}

/// Flat value applied to the total of the kept dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct Modifier {
	/// Whether the value is added or subtracted
	pub sign: Sign,

	/// Value to apply
	pub value: u32,
}

impl Modifier {
	/// Applies the modifier to a total.
	///
	/// # Examples
	/// ```
	/// use talus::formula::{Modifier, Sign};
	///
	/// assert_eq!(Modifier { sign: Sign::Plus, value: 5 }.apply(12), 17);
	/// assert_eq!(Modifier { sign: Sign::Minus, value: 5 }.apply(3), -2);
	/// ```
	#[must_use]
	pub const fn apply(self, total: i64) -> i64 {
		match self.sign {
			Sign::Plus => total.saturating_add(self.value as i64),
			Sign::Minus => total.saturating_sub(self.value as i64),
		}
	}
}

impl fmt::Display for Modifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}",
			match self.sign {
				Sign::Plus => '+',
				Sign::Minus => '-',
			},
			self.value
		)
	}
}

/// Direction a [`Modifier`] applies its value in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum Sign {
	/// Add the value (`+`)
	Plus,

	/// Subtract the value (`-`)
	Minus,
}
