//! Chumsky grammar for dice notation.
//!
//! The grammar is an ordered sequence of optional segments after a mandatory dice core:
//! `[count]d<sides>[k|kh|kl|d|dh|dl<count>][r|ro|rr<|><value>][!][+|-<value>]`.
//! It expects lowercase input, so callers are responsible for folding case first (as [`parse()`] does).
//!
//! [`parse()`]: super::parse()

use chumsky::prelude::*;

use super::segment::{Comparator, KeepDropMode, RerollMode, Sign, TieBreak};

/// Raw captures from a formula that matched the grammar, with numbers left as their source digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Plain data meant to be built and matched directly")]
pub struct Notation<'src> {
	/// Digits of the dice count, if one was written
	pub count: Option<&'src str>,

	/// Digits of the number of sides
	pub sides: &'src str,

	/// Keep/drop segment
	pub keep_drop: Option<(KeepDropMode, TieBreak, &'src str)>,

	/// Reroll segment
	pub reroll: Option<(RerollMode, Comparator, &'src str)>,

	/// Whether the explode marker was present
	pub explode: bool,

	/// Modifier segment
	pub modifier: Option<(Sign, &'src str)>,
}

/// Generates a parser for a run of decimal digits.
fn digits<'src>() -> impl Parser<'src, &'src str, &'src str, extra::Err<Rich<'src, char>>> + Clone {
	text::digits(10).to_slice()
}

/// Generates a parser that handles a single dice formula like "d20", "4d6k3", "1d20r<2", "3d6!", "2d20kl1+5", etc.
/// without expecting end of input.
pub fn notation_part<'src>() -> impl Parser<'src, &'src str, Notation<'src>, extra::Err<Rich<'src, char>>> + Clone {
	// Parser for keep/drop segments (e.g. k3, kh3, kl1, d1, dh1, dl2)
	let keep_drop = choice((
		just("kh").to((KeepDropMode::Keep, TieBreak::Highest)),
		just("kl").to((KeepDropMode::Keep, TieBreak::Lowest)),
		just("k").to((KeepDropMode::Keep, TieBreak::Highest)),
		just("dh").to((KeepDropMode::Drop, TieBreak::Highest)),
		just("dl").to((KeepDropMode::Drop, TieBreak::Lowest)),
		just("d").to((KeepDropMode::Drop, TieBreak::Highest)),
	))
	.then(digits())
	.map(|((mode, tie_break), count)| (mode, tie_break, count));

	// Parser for reroll segments (e.g. r<2, ro<3, rr>5)
	let reroll = choice((
		just("rr").to(RerollMode::Recursive),
		just("ro").to(RerollMode::OnceKeepNew),
		just("r").to(RerollMode::Once),
	))
	.then(choice((
		just('<').to(Comparator::LessThan),
		just('>').to(Comparator::GreaterThan),
	)))
	.then(digits())
	.map(|((mode, comparator), threshold)| (mode, comparator, threshold));

	// Parser for the explode marker
	let explode = just('!').or_not().map(|bang| bang.is_some());

	// Parser for the flat modifier (e.g. +5, -2)
	let modifier = choice((just('+').to(Sign::Plus), just('-').to(Sign::Minus)))
		.then(digits());

	digits()
		.or_not()
		.then_ignore(just('d'))
		.then(digits())
		.then(keep_drop.or_not())
		.then(reroll.or_not())
		.then(explode)
		.then(modifier.or_not())
		.map(
			|(((((count, sides), keep_drop), reroll), explode), modifier)| Notation {
				count,
				sides,
				keep_drop,
				reroll,
				explode,
				modifier,
			},
		)
}

/// Generates a parser that handles a single dice formula like "d20", "4d6k3", "1d20r<2", "3d6!", "2d20kl1+5", etc.
/// and expects end of input
///
/// # Examples
/// ```
/// use chumsky::Parser;
/// use talus::formula::{parser::notation, RerollMode, Comparator};
///
/// let parsed = notation().parse("1d20r<2").into_result().unwrap();
/// assert_eq!(parsed.count, Some("1"));
/// assert_eq!(parsed.sides, "20");
/// assert_eq!(parsed.reroll, Some((RerollMode::Once, Comparator::LessThan, "2")));
///
/// assert!(notation().parse("1d20 + 2").has_errors());
/// ```
pub fn notation<'src>() -> impl Parser<'src, &'src str, Notation<'src>, extra::Err<Rich<'src, char>>> + Clone {
	notation_part().then_ignore(end())
}
