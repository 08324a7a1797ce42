//! Command-line dice roller. Rolls a formula passed as arguments (or read from stdin) and prints the full result.

use std::{
	env,
	io::{self, Write as _},
	process::ExitCode,
};

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::Parser as _;
use talus::{
	formula::{self, parser},
	roll::{roller::FastRand as FastRandRoller, Describe as _, Evaluator},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
	init_tracing();

	let input = match read_input() {
		Ok(input) => input,
		Err(err) => {
			eprintln!("Unable to read input: {err}");
			return ExitCode::FAILURE;
		}
	};

	println!("Input: {input}");

	let normalized = formula::normalize(&input);
	let parsed = match formula::parse(&normalized) {
		Ok(parsed) => parsed,
		Err(formula::Error::Malformed { .. }) => {
			report_syntax_errors(&normalized);
			return ExitCode::FAILURE;
		}
		Err(err) => {
			eprintln!("Parse error: {err}");
			return ExitCode::FAILURE;
		}
	};
	println!("Parsed: {parsed}");

	let mut evaluator = Evaluator::new(FastRandRoller::default());
	match evaluator.roll_parsed(&parsed) {
		Ok(result) => {
			println!("Rolled: {}", result.describe(Some(100)));
			if result.has_rerolled() {
				println!("Rerolled: [{}]", join(&result.rerolled_dice));
			}
			if result.has_exploded() {
				println!("Exploded: [{}]", join(&result.exploded_dice));
			}
			if result.has_dropped() {
				println!("Kept: [{}]", join(&result.kept_dice));
				println!("Dropped: [{}]", join(&result.dropped_dice));
			}
			println!("Total: {}", result.total);
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("Roll error: {err}");
			ExitCode::FAILURE
		}
	}
}

/// Obtains the formula by combining all args passed to the executable, so that it can be left unquoted even with
/// spaces, or from the first line of stdin if there are no args.
fn read_input() -> io::Result<String> {
	let args = env::args();
	if args.len() > 1 {
		// The first argument is ignored since it is typically the name of the executable itself
		return Ok(args.skip(1).collect::<Vec<String>>().join(" "));
	}

	let mut lines = io::stdin().lines();

	// If there isn't already input available in stdin, display a prompt for it
	if lines.size_hint().1.is_none() {
		print!("Enter dice formula: ");
		io::stdout().flush()?;
	}

	lines.next().unwrap_or_else(|| Ok(String::new()))
}

/// Prints a report pointing at every grammar error in a formula.
fn report_syntax_errors(normalized: &str) {
	let lc = normalized.to_ascii_lowercase();
	let Err(errs) = parser::notation().parse(lc.as_str()).into_result() else {
		return;
	};

	for err in errs {
		let span = err.span().start..err.span().end;
		let printed = Report::build(ReportKind::Error, span.clone())
			.with_message("Invalid dice formula")
			.with_label(Label::new(span).with_message(err.to_string()).with_color(Color::Red))
			.finish()
			.eprint(Source::from(normalized));

		if let Err(print_err) = printed {
			eprintln!("Parse error: {err} ({print_err})");
		}
	}
}

/// Joins die values for display.
fn join(values: &[u32]) -> String {
	values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Sets up log output, filtered by `RUST_LOG` (nothing is logged when it isn't set).
fn init_tracing() {
	if env::var("RUST_LOG").is_ok() {
		tracing_subscriber::registry()
			.with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
			.with(EnvFilter::from_default_env())
			.init();
	}
}
