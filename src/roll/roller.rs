//! Abstractions for generating die values using various means.

use alloc::vec::Vec;
use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

/// Rolls dice - what else is there to say?
///
/// This is the only source of randomness the [`Evaluator`](super::Evaluator) uses, so injecting an implementation
/// with predetermined values (such as [`Iter`]) makes evaluation fully deterministic.
pub trait Roller {
	/// Rolls a single die, producing a value in `1..=sides`.
	#[must_use]
	fn roll_die(&mut self, sides: u32) -> u32;

	/// Rolls a number of dice with the same number of sides, in order.
	#[must_use]
	fn roll_dice(&mut self, count: u32, sides: u32) -> Vec<u32>
	where
		Self: Sized,
	{
		(0..count).map(|_| self.roll_die(sides)).collect()
	}
}

impl<R: Roller + ?Sized> Roller for &mut R {
	#[inline]
	fn roll_die(&mut self, sides: u32) -> u32 {
		(**self).roll_die(sides)
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use talus::roll::{roller::FastRand as FastRandRoller, Evaluator};
///
/// let mut evaluator = Evaluator::new(FastRandRoller::default());
/// let _ = evaluator.roll("4d6")?;
/// let _ = evaluator.roll("4d6")?;
/// # Ok::<(), talus::roll::Error>(())
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use talus::roll::{roller::FastRand as FastRandRoller, Evaluator};
///
/// let first = Evaluator::new(FastRandRoller::with_seed(0x750c38d574400)).roll("8d6!")?;
/// let second = Evaluator::new(FastRandRoller::with_seed(0x750c38d574400)).roll("8d6!")?;
/// assert_eq!(first, second);
/// # Ok::<(), talus::roll::Error>(())
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Default))]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls a single die using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_die(&mut self, sides: u32) -> u32 {
		if sides > 0 {
			self.0.u32(1..=sides)
		} else {
			0
		}
	}
}

/// Generates rolls that always have a specific value.
///
/// # Examples
/// ```
/// use talus::roll::{roller::{Roller, Val as ValRoller}};
///
/// let mut roller = ValRoller(3);
/// assert_eq!(roller.roll_dice(4, 6), vec![3, 3, 3, 3]);
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u32);

impl Roller for Val {
	/// Rolls a single die, always with one specific value.
	#[inline]
	fn roll_die(&mut self, _sides: u32) -> u32 {
		self.0
	}
}

/// Generates rolls that always have their max value.
///
/// # Examples
/// ```
/// use talus::roll::{roller::{Max as MaxRoller, Roller}};
///
/// let mut roller = MaxRoller;
/// assert_eq!(roller.roll_dice(2, 20), vec![20, 20]);
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	/// Rolls a single die, always with the max value (same as the number of sides).
	#[inline]
	fn roll_die(&mut self, sides: u32) -> u32 {
		sides
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use talus::roll::{roller::Iter as IterRoller, Evaluator};
///
/// let mut evaluator = Evaluator::new(IterRoller::new([3, 5]));
/// let result = evaluator.roll("2d6")?;
/// assert_eq!(result.total, 8);
/// assert_eq!(result.rolls, "3, 5");
/// # Ok::<(), talus::roll::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u32>>(Peekable<I>);

impl<I: Iterator<Item = u32>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u32>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_die(&mut self, _sides: u32) -> u32 {
		self.0.next().expect("iterator is finished")
	}
}
