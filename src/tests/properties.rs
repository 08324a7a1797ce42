use proptest::prelude::*;

use crate::{
	formula::{self, Comparator, Error as FormulaError, KeepDrop, KeepDropMode, ParsedFormula, RerollMode, TieBreak},
	roll::{modifier::keep_drop, roller::FastRand as FastRandRoller, Evaluator},
};

/// Generates formulas whose rerolls can always settle, so rolling them never fails
fn formula_strategy() -> impl Strategy<Value = ParsedFormula> {
	(1..=20_u32, 2..=20_u32).prop_flat_map(|(count, sides)| {
		let keep_drop = proptest::option::of((
			prop_oneof![Just(KeepDropMode::Keep), Just(KeepDropMode::Drop)],
			prop_oneof![Just(TieBreak::Highest), Just(TieBreak::Lowest)],
			1..=25_u32,
		));
		let reroll = proptest::option::of((
			prop_oneof![Just(RerollMode::Once), Just(RerollMode::OnceKeepNew), Just(RerollMode::Recursive)],
			prop_oneof![
				(0..=sides).prop_map(|threshold| (Comparator::LessThan, threshold)),
				(1..=sides).prop_map(|threshold| (Comparator::GreaterThan, threshold)),
			],
		));
		let modifier = proptest::option::of((any::<bool>(), 0..=100_u32));

		(keep_drop, reroll, any::<bool>(), modifier).prop_map(move |(keep_drop, reroll, explode, modifier)| {
			let mut builder = ParsedFormula::builder().count(count).sides(sides);
			if let Some((mode, tie_break, n)) = keep_drop {
				builder = builder.keep_drop(mode, tie_break, n);
			}
			if let Some((mode, (comparator, threshold))) = reroll {
				builder = builder.reroll(mode, comparator, threshold);
			}
			if explode {
				builder = builder.explode();
			}
			match modifier {
				Some((true, value)) => builder = builder.plus(value),
				Some((false, value)) => builder = builder.minus(value),
				None => {}
			}
			builder.build()
		})
	})
}

proptest! {
	#[test]
	fn canonical_notation_parses_back(parsed in formula_strategy()) {
		let notation = parsed.to_string();
		prop_assert!(formula::validate(&notation));
		prop_assert_eq!(formula::parse(&notation), Ok(parsed));
	}

	#[test]
	fn validate_agrees_with_parse(input in "[0-9dDkKhHlLrRoO<>!+ -]{0,12}") {
		let malformed = matches!(formula::parse(&input), Err(FormulaError::Malformed { .. }));
		let valid = formula::validate(&input);
		prop_assert_eq!(valid, !malformed);
		prop_assert_eq!(formula::validate(&input), valid);
	}

	#[test]
	fn total_is_kept_sum_plus_modifier(parsed in formula_strategy(), seed: u64) {
		let result = Evaluator::new(FastRandRoller::with_seed(seed)).roll_parsed(&parsed).unwrap();

		let sum = result.kept_dice.iter().map(|&val| i64::from(val)).sum::<i64>();
		let expected = parsed.modifier.map_or(sum, |modifier| modifier.apply(sum));
		prop_assert_eq!(result.total, expected);
		prop_assert_eq!(
			&result.rolls,
			&result.kept_dice.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
		);
	}

	#[test]
	fn kept_and_dropped_partition_rolls(parsed in formula_strategy(), seed: u64) {
		let result = Evaluator::new(FastRandRoller::with_seed(seed)).roll_parsed(&parsed).unwrap();

		let mut partitioned = result.kept_dice.clone();
		partitioned.extend_from_slice(&result.dropped_dice);
		partitioned.sort_unstable();
		let mut initial = result.initial_rolls.clone();
		initial.sort_unstable();
		prop_assert_eq!(partitioned, initial);

		prop_assert_eq!(result.dice.iter().map(|die| die.val).collect::<Vec<_>>(), result.initial_rolls.clone());
		prop_assert_eq!(result.dice.iter().filter(|die| die.dropped).count(), result.dropped_dice.len());
		prop_assert_eq!(result.dice.iter().filter(|die| die.rerolled).count(), result.rerolled_dice.len());

		let len = result.initial_rolls.len();
		if let Some(KeepDrop { mode, count, .. }) = parsed.keep_drop {
			let selected = usize::try_from(count).unwrap().min(len);
			let expected_kept = match mode {
				KeepDropMode::Keep => selected,
				KeepDropMode::Drop => len - selected,
			};
			prop_assert_eq!(result.kept_dice.len(), expected_kept);
		} else {
			prop_assert!(result.dropped_dice.is_empty());
		}
	}

	#[test]
	fn dice_stay_within_sides(parsed in formula_strategy(), seed: u64) {
		let result = Evaluator::new(FastRandRoller::with_seed(seed)).roll_parsed(&parsed).unwrap();
		let sides = parsed.sides;

		prop_assert!(result.initial_rolls.len() >= usize::try_from(parsed.count).unwrap());
		prop_assert!(result.initial_rolls.iter().all(|&val| (1..=sides).contains(&val)));
		prop_assert!(result.rerolled_dice.iter().all(|&val| (1..=sides).contains(&val)));
		prop_assert!(result.exploded_dice.iter().all(|&val| val == sides));
		if !parsed.explode {
			prop_assert!(result.exploded_dice.is_empty());
		}
		if parsed.reroll.is_none() {
			prop_assert!(result.rerolled_dice.is_empty());
		}
	}

	#[test]
	fn seeded_rolls_are_reproducible(parsed in formula_strategy(), seed: u64) {
		let first = Evaluator::new(FastRandRoller::with_seed(seed)).roll_parsed(&parsed).unwrap();
		let second = Evaluator::new(FastRandRoller::with_seed(seed)).roll_parsed(&parsed).unwrap();
		prop_assert_eq!(first, second);
	}

	#[test]
	fn keep_highest_is_drop_lowest_of_the_rest(values in proptest::collection::vec(1..=20_u32, 0..30), n in 0..30_usize) {
		let n = n.min(values.len());
		let rest = values.len() - n;
		let rule = |mode, tie_break, count: usize| KeepDrop {
			mode,
			tie_break,
			count: u32::try_from(count).unwrap(),
		};

		prop_assert_eq!(
			keep_drop(&values, rule(KeepDropMode::Keep, TieBreak::Highest, n)),
			keep_drop(&values, rule(KeepDropMode::Drop, TieBreak::Lowest, rest))
		);
		prop_assert_eq!(
			keep_drop(&values, rule(KeepDropMode::Keep, TieBreak::Lowest, n)),
			keep_drop(&values, rule(KeepDropMode::Drop, TieBreak::Highest, rest))
		);
	}
}
