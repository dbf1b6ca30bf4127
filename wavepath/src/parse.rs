use nom::{
    Finish, IResult,
    branch::alt,
    character::complete::{anychar, char, digit0, digit1, one_of},
    combinator::{map, map_res, opt, recognize, value},
    multi::many0,
    sequence::{pair, tuple},
};

use crate::types::{Command, Letter, PathData, Position};

///A number literal: optional sign, digits with an optional fraction (or a
///bare fraction such as `.5`), optional exponent. Literals beyond the range
///of `f64` saturate to its largest finite value.
pub(crate) fn number(input: &str) -> IResult<&str, f64> {
    let mantissa = alt((
	recognize(pair(digit1, opt(pair(char('.'), digit0)))),
	recognize(pair(char('.'), digit1)),
    ));
    let exponent = tuple((one_of("eE"), opt(one_of("+-")), digit1));

    map_res(
	recognize(tuple((opt(one_of("+-")), mantissa, opt(exponent)))),
	|literal: &str| literal.parse::<f64>().map(|v| v.clamp(f64::MIN, f64::MAX)),
    )(input)
}

///Pulls every number literal out of a command's argument text. Anything that
///does not start a number is a separator.
pub fn parse_numbers(text: &str) -> Vec<f64> {
    let mut tokens = many0(alt((
	map(number, Some),
	value(None, anychar),
    )));

    let result: Result<(&str, Vec<Option<f64>>), nom::error::Error<&str>> = tokens(text).finish();
    match result {
	Ok((_, numbers)) => numbers.into_iter().flatten().collect(),
	Err(_) => Vec::new(),
    }
}

///Splits path data at command letters. The text between two letters is the
///argument text of the first; text before the first letter is dropped.
pub fn parse_path(input: &str) -> PathData {
    let mut path = PathData::new();
    let mut current: Option<(Letter, Position, usize)> = None;

    for (i, c) in input.char_indices() {
	let letter = match Letter::from_char(c) {
	    Some(letter) => letter,
	    None => continue,
	};

	if let Some((letter, position, start)) = current.take() {
	    path.push(Command::new(letter, position, parse_numbers(&input[start..i])));
	}

	current = Some((letter, Position::of(c), i + c.len_utf8()));
    }

    if let Some((letter, position, start)) = current {
	path.push(Command::new(letter, position, parse_numbers(&input[start..])));
    }

    log::trace!("parsed {} path commands", path.len());

    path
}
