use crate::{
	formula::{Comparator, KeepDrop, KeepDropMode, Reroll, RerollMode, TieBreak},
	roll::{
		modifier::{explode, keep_drop, rank, reroll},
		roller::{Iter as IterRoller, Max as MaxRoller},
		Error, Limits, Runaway,
	},
};

const fn rule(mode: KeepDropMode, tie_break: TieBreak, count: u32) -> KeepDrop {
	KeepDrop {
		mode,
		tie_break,
		count,
	}
}

#[test]
fn keep_drop_modes() {
	let values = [3, 1, 5, 2, 4];

	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Keep, TieBreak::Highest, 2)),
		(vec![5, 4], vec![3, 2, 1])
	);
	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Keep, TieBreak::Lowest, 2)),
		(vec![2, 1], vec![5, 4, 3])
	);
	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Drop, TieBreak::Highest, 2)),
		(vec![3, 2, 1], vec![5, 4])
	);
	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Drop, TieBreak::Lowest, 2)),
		(vec![5, 4, 3], vec![2, 1])
	);
}

#[test]
fn keep_drop_ties() {
	let values = [4, 2, 4, 4];
	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Keep, TieBreak::Highest, 2)),
		(vec![4, 4], vec![4, 2])
	);
	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Drop, TieBreak::Lowest, 1)),
		(vec![4, 4, 4], vec![2])
	);
}

#[test]
fn keep_drop_degenerate_counts() {
	let values = [2, 6];
	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Keep, TieBreak::Lowest, 2)),
		(vec![6, 2], vec![])
	);
	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Drop, TieBreak::Lowest, 9)),
		(vec![], vec![6, 2])
	);
	assert_eq!(
		keep_drop(&values, rule(KeepDropMode::Keep, TieBreak::Highest, u32::MAX)),
		(vec![6, 2], vec![])
	);
	assert_eq!(keep_drop(&[], rule(KeepDropMode::Keep, TieBreak::Highest, 1)), (vec![], vec![]));
}

#[test]
fn reroll_once_replaces_in_place() {
	let rule = Reroll {
		mode: RerollMode::Once,
		comparator: Comparator::GreaterThan,
		threshold: 4,
	};
	let mut rng = IterRoller::new([6, 1]);
	let outcome = reroll(vec![5, 2, 6], 6, rule, true, &mut rng, &Limits::default()).unwrap();
	assert_eq!(outcome.values, vec![6, 2, 1]);
	assert_eq!(outcome.rerolled, vec![5, 6]);
	assert!(outcome.exploded.is_empty());
	assert_eq!(outcome.rerolled_at, vec![0, 2]);
	assert!(!rng.can_roll());
}

#[test]
fn recursive_reroll_checks_appended_dice() {
	let rule = Reroll {
		mode: RerollMode::Recursive,
		comparator: Comparator::GreaterThan,
		threshold: 5,
	};

	// The 6 is redrawn as a 6 (exploding into a 6), then settles on 2; the exploded 6 is then redrawn into a 3
	let mut rng = IterRoller::new([6, 6, 2, 3]);
	let outcome = reroll(vec![6], 6, rule, true, &mut rng, &Limits::default()).unwrap();
	assert_eq!(outcome.values, vec![2, 3]);
	assert_eq!(outcome.rerolled, vec![6, 6]);
	assert_eq!(outcome.exploded, vec![6]);
	assert_eq!(outcome.rerolled_at, vec![0, 1]);
	assert_eq!(outcome.exploded_at, vec![0]);
	assert!(!rng.can_roll());
}

#[test]
fn recursive_reroll_without_exploding_ignores_max_draws() {
	let rule = Reroll {
		mode: RerollMode::Recursive,
		comparator: Comparator::LessThan,
		threshold: 2,
	};
	let mut rng = IterRoller::new([6]);
	let outcome = reroll(vec![1], 6, rule, false, &mut rng, &Limits::default()).unwrap();
	assert_eq!(outcome.values, vec![6]);
	assert!(outcome.exploded.is_empty());
}

#[test]
fn recursive_reroll_bounds() {
	let rule = Reroll {
		mode: RerollMode::Recursive,
		comparator: Comparator::LessThan,
		threshold: 7,
	};
	assert_eq!(
		reroll(vec![3], 6, rule, false, &mut MaxRoller, &Limits::default()),
		Err(Error::NonTerminatingReroll(Runaway::Degenerate))
	);

	let rule = Reroll {
		threshold: 6,
		..rule
	};
	let mut rng = IterRoller::new([1, 1]);
	assert_eq!(
		reroll(vec![3], 6, rule, false, &mut rng, &Limits::default().max_rerolls(2)),
		Err(Error::NonTerminatingReroll(Runaway::Rerolls(2)))
	);
}

#[test]
fn explode_nothing() {
	let outcome = explode(vec![1, 2, 3], 6, &mut MaxRoller, &Limits::default()).unwrap();
	assert_eq!(outcome.values, vec![1, 2, 3]);
	assert!(outcome.exploded.is_empty());
	assert!(outcome.exploded_at.is_empty());
}

#[test]
fn explode_chain_limit_is_per_original_die() {
	let limits = Limits::default().max_explosions(1);
	let mut rng = IterRoller::new([6, 6]);
	let outcome = explode(vec![6, 6], 6, &mut rng, &limits).unwrap();
	assert_eq!(outcome.values, vec![6, 6, 6, 6]);
	assert_eq!(outcome.exploded, vec![6, 6]);
	assert_eq!(outcome.exploded_at, vec![0, 1]);
	assert!(!rng.can_roll());
}

#[test]
fn explode_without_chaining() {
	let limits = Limits::default().max_explosions(0);
	let outcome = explode(vec![6, 6], 6, &mut MaxRoller, &limits).unwrap();
	assert_eq!(outcome.values, vec![6, 6]);
	assert!(outcome.exploded.is_empty());
}

#[test]
fn explode_single_sided_stops_at_chain_limit() {
	let outcome = explode(vec![1, 1], 1, &mut MaxRoller, &Limits::default().max_explosions(4)).unwrap();
	assert_eq!(outcome.values, vec![1; 10]);
	assert_eq!(outcome.exploded, vec![1; 8]);
	assert_eq!(outcome.exploded_at, vec![0, 1, 2, 3, 4, 5, 6, 7]);

	let outcome = explode(vec![], 1, &mut MaxRoller, &Limits::default()).unwrap();
	assert!(outcome.values.is_empty());
}

#[test]
fn rank_follows_keep_drop() {
	let values = [3, 1, 5, 3];
	let rule = rule(KeepDropMode::Keep, TieBreak::Highest, 2);
	assert_eq!(rank(&values, rule), (vec![2, 0], vec![3, 1]));
	assert_eq!(keep_drop(&values, rule), (vec![5, 3], vec![3, 1]));

	let rule = self::rule(KeepDropMode::Drop, TieBreak::Highest, 1);
	assert_eq!(rank(&values, rule), (vec![0, 3, 1], vec![2]));
}
