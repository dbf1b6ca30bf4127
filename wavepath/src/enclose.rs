use nom::{
    IResult,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, multispace0, one_of, satisfy},
    combinator::{eof, not, opt},
    sequence::tuple,
};

use crate::types::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    ///Nothing but whitespace came in; it is returned as is.
    EmptyPath,
    ///The path did not start with `M0,{height}`; the top-left prefix was put in front of it.
    PrefixedStart,
    ///The path did not close along the bottom or top edge; a closing line along the top was appended.
    AppendedClose,
}

///Result of [`enclose_above`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enclosure {
    ///Both ends followed the bottom-baseline convention and were rewritten in place.
    Matched(String),
    FallbackApplied {
	path: String,
	repairs: Vec<Repair>,
    },
}

impl Enclosure {
    pub fn path(&self) -> &str {
	match self {
	    Enclosure::Matched(path) => path,
	    Enclosure::FallbackApplied { path, .. } => path,
	}
    }

    pub fn into_path(self) -> String {
	match self {
	    Enclosure::Matched(path) => path,
	    Enclosure::FallbackApplied { path, .. } => path,
	}
    }

    pub fn is_matched(&self) -> bool {
	matches!(self, Enclosure::Matched(_))
    }

    pub fn repairs(&self) -> &[Repair] {
	match self {
	    Enclosure::Matched(_) => &[],
	    Enclosure::FallbackApplied { repairs, .. } => repairs,
	}
    }
}

///`M0,{height}` plus at most one whitespace character. Returns that
///whitespace and the rest of the path.
fn baseline_start<'a>(path: &'a str, height: &str) -> Option<(Option<char>, &'a str)> {
    let result: IResult<&str, _> = tuple((
	tag("M0,"),
	tag(height),
	not(one_of("0123456789.eE")),
	opt(satisfy(char::is_whitespace)),
    ))(path);

    result.ok().map(|(rest, (_, _, _, ws))| (ws, rest))
}

///`L{width},{height} L0,{height} Z` up to the end of the path.
fn is_baseline_close(tail: &str, width: &str, height: &str) -> bool {
    let result: IResult<&str, _> = tuple((
	char('L'),
	tag(width),
	char(','),
	tag(height),
	multispace0,
	tag("L0,"),
	tag(height),
	multispace0,
	char('Z'),
	eof,
    ))(tail);

    result.is_ok()
}

///`L {width},0 Z` up to the end of the path, in either case.
fn is_top_close(tail: &str, width: &str) -> bool {
    let result: IResult<&str, _> = tuple((
	tag_no_case("L"),
	multispace0,
	tag(width),
	tag(",0"),
	multispace0,
	tag_no_case("Z"),
	eof,
    ))(tail);

    result.is_ok()
}

///Byte offset of the first line command from which `matches` holds for the
///rest of the path.
fn find_tail<F>(path: &str, matches: F) -> Option<usize>
where F: Fn(&str) -> bool
{
    path.match_indices(|c: char| c == 'L' || c == 'l')
	.map(|(i, _)| i)
	.find(|&i| matches(&path[i..]))
}

///Rewrites a wave that fills the area below its curve (starting at the
///bottom-left corner and closing along the bottom edge) so it fills the area
///above the curve instead.
///
///Paths that do not follow that convention are still rewritten, by putting
///the top-left prefix in front and a top-edge close behind; the returned
///[`Enclosure`] says which repairs were needed.
pub fn enclose_above(path_data: &str, width: f64, height: f64) -> Enclosure {
    let trimmed = path_data.trim();
    if trimmed.is_empty() {
	return Enclosure::FallbackApplied {
	    path: String::from(path_data),
	    repairs: vec![Repair::EmptyPath],
	};
    }

    let w = format_number(width);
    let h = format_number(height);
    let mut repairs = Vec::new();

    let mut result = match baseline_start(trimmed, &h) {
	Some((ws, rest)) => {
	    let ws = ws.map(String::from).unwrap_or_default();
	    format!("M0,0 L0,{}{}{}", h, ws, rest)
	},
	None => {
	    log::warn!("Path start does not match expected bottom baseline; prefixing manually.");
	    repairs.push(Repair::PrefixedStart);
	    format!("M0,0 L0,{} {}", h, trimmed)
	},
    };

    if let Some(i) = find_tail(&result, |tail| is_baseline_close(tail, &w, &h)) {
	result.truncate(i);
	result.push_str(&format!("L{},0 Z", w));
    } else if find_tail(&result, |tail| is_top_close(tail, &w)).is_none() {
	log::debug!("path does not close along either edge; appending top-edge close");
	repairs.push(Repair::AppendedClose);
	result.push_str(&format!(" L{},0 Z", w));
    }

    if repairs.is_empty() {
	Enclosure::Matched(result)
    } else {
	Enclosure::FallbackApplied { path: result, repairs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_wave_is_rewritten_in_place() {
	let wave = "M0,100 C300,0,700,100,1000,50 L1000,100 L0,100 Z";
	let enclosed = enclose_above(wave, 1000.0, 100.0);

	assert_eq!(enclosed, Enclosure::Matched(String::from(
	    "M0,0 L0,100 C300,0,700,100,1000,50 L1000,0 Z")));
    }

    #[test]
    fn authored_wave_gets_a_top_close_appended() {
	let wave = "M0,100S32.06,0,326.72,0C582.44,0,685.07,119.2,1000,77.47V100H0Z";
	let enclosed = enclose_above(wave, 1000.0, 100.0);

	assert!(enclosed.path().starts_with("M0,0 L0,100"));
	assert!(enclosed.path().ends_with("L1000,0 Z"));
	assert_eq!(enclosed.path(),
		   "M0,0 L0,100S32.06,0,326.72,0C582.44,0,685.07,119.2,1000,77.47V100H0Z L1000,0 Z");
	assert_eq!(enclosed.repairs(), &[Repair::AppendedClose]);
    }

    #[test]
    fn foreign_start_is_prefixed() {
	let enclosed = enclose_above("M10,50 L1000,100 L0,100 Z", 1000.0, 100.0);

	assert_eq!(enclosed.path(), "M0,0 L0,100 M10,50 L1000,0 Z");
	assert_eq!(enclosed.repairs(), &[Repair::PrefixedStart]);
	assert!(!enclosed.is_matched());
    }

    #[test]
    fn start_anchor_needs_a_number_boundary() {
	let enclosed = enclose_above("M0,1000 L1000,100 L0,100 Z", 1000.0, 100.0);
	assert_eq!(enclosed.repairs(), &[Repair::PrefixedStart]);
	assert!(enclosed.path().starts_with("M0,0 L0,100 M0,1000"));
    }

    #[test]
    fn already_closed_at_top_is_left_alone() {
	let enclosed = enclose_above("M0,100 Q500,0,1000,100 l 1000,0 z", 1000.0, 100.0);
	assert_eq!(enclosed, Enclosure::Matched(String::from(
	    "M0,0 L0,100 Q500,0,1000,100 l 1000,0 z")));
    }

    #[test]
    fn whitespace_between_closing_commands() {
	let enclosed = enclose_above("  M0,100 L500,20 L1000,100  L0,100Z\n", 1000.0, 100.0);
	assert_eq!(enclosed.into_path(), "M0,0 L0,100 L500,20 L1000,0 Z");
    }

    #[test]
    fn fractional_view_box() {
	let enclosed = enclose_above("M0,12.5 L40,0 L80.25,12.5 L0,12.5 Z", 80.25, 12.5);
	assert_eq!(enclosed, Enclosure::Matched(String::from("M0,0 L0,12.5 L40,0 L80.25,0 Z")));
    }

    #[test]
    fn both_repairs_at_once() {
	let enclosed = enclose_above("C1,2,3,4,5,6", 1000.0, 100.0);
	assert_eq!(enclosed.path(), "M0,0 L0,100 C1,2,3,4,5,6 L1000,0 Z");
	assert_eq!(enclosed.repairs(), &[Repair::PrefixedStart, Repair::AppendedClose]);
    }

    #[test]
    fn empty_input_is_returned_as_is() {
	let enclosed = enclose_above("   ", 1000.0, 100.0);
	assert_eq!(enclosed.path(), "   ");
	assert_eq!(enclosed.repairs(), &[Repair::EmptyPath]);
    }
}
