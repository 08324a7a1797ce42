#![doc = pretty_readme::docify!("README.md", "https://docs.rs/talus/latest/talus/", "./")]
#![cfg_attr(not(any(doc, test)), no_std)]
#![expect(
	clippy::tabs_in_doc_comments,
	reason = "Consistency with source, user-configurability & accessibility"
)]
#![deny(macro_use_extern_crate, meta_variable_misuse, unit_bindings)]
#![warn(
	explicit_outlives_requirements,
	missing_docs,
	missing_debug_implementations,
	unreachable_pub,
	unused_crate_dependencies,
	unused_qualifications,
	clippy::pedantic,
	clippy::absolute_paths,
	clippy::alloc_instead_of_core,
	clippy::allow_attributes_without_reason,
	clippy::clone_on_ref_ptr,
	clippy::cognitive_complexity,
	clippy::dbg_macro,
	clippy::empty_enum_variants_with_brackets,
	clippy::empty_structs_with_brackets,
	clippy::exhaustive_enums,
	clippy::exhaustive_structs,
	clippy::exit,
	clippy::expect_used,
	clippy::get_unwrap,
	clippy::if_then_some_else_none,
	clippy::infinite_loop,
	clippy::map_err_ignore,
	clippy::missing_const_for_fn,
	clippy::missing_docs_in_private_items,
	clippy::multiple_inherent_impl,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::print_stderr,
	clippy::print_stdout,
	clippy::redundant_type_annotations,
	clippy::ref_patterns,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::same_name_method,
	clippy::self_named_module_files,
	clippy::semicolon_inside_block,
	clippy::std_instead_of_alloc,
	clippy::std_instead_of_core,
	clippy::str_to_string,
	clippy::tests_outside_test_module,
	clippy::try_err,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unused_result_ok,
	clippy::unwrap_in_result,
	clippy::unwrap_used
)]

extern crate alloc;
extern crate core;

pub mod formula;
pub mod roll;

pub use formula::{parse, validate, ParsedFormula};
pub use roll::{Evaluator, RollResult};

/// Rolls a formula string with a freshly-seeded random roller and default [`Limits`](roll::Limits).
/// Requires the `std` and `fastrand` features (both enabled by default).
///
/// For reproducible rolls or custom limits, create an [`Evaluator`] instead.
///
/// # Errors
/// See [`Evaluator::roll()`].
///
/// # Examples
/// ```
/// let result = talus::roll("4d6k3+2")?;
/// assert_eq!(result.kept_dice.len(), 3);
/// assert_eq!(result.dropped_dice.len(), 1);
/// assert_eq!(result.total, result.kept_dice.iter().map(|&die| i64::from(die)).sum::<i64>() + 2);
///
/// assert!(talus::roll("banana").is_err());
/// # Ok::<(), talus::roll::Error>(())
/// ```
#[cfg(all(feature = "std", feature = "fastrand"))]
pub fn roll(formula: &str) -> Result<RollResult, roll::Error> {
	Evaluator::new(roll::roller::FastRand::default()).roll(formula)
}

#[cfg(test)]
mod tests;

#[cfg(feature = "build-binary")]
use ariadne as _;
#[cfg(feature = "build-binary")]
use tracing_subscriber as _;
