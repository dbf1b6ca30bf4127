use std::{convert::Infallible, fmt, str::FromStr};

use path_macro::path_grammar;

use crate::error::ViewBoxError;

///Role of a single numeric argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    X,
    Y,
    Radius,
    Rotation,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Absolute,
    Relative,
}

impl Position {
    ///Uppercase letters are absolute, lowercase ones relative.
    pub fn of(c: char) -> Position {
	if c.is_ascii_uppercase() {
	    Position::Absolute
	} else {
	    Position::Relative
	}
    }
}

#[path_grammar]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    #[letter('M')]
    Move(X, Y),
    #[letter('L')]
    Line(X, Y),
    #[letter('H')]
    HorizontalLine(X),
    #[letter('V')]
    VerticalLine(Y),
    #[letter('C')]
    CubicCurve(X, Y, X, Y, X, Y),
    #[letter('S')]
    SmoothCubicCurve(X, Y, X, Y),
    #[letter('Q')]
    QuadraticCurve(X, Y, X, Y),
    #[letter('T')]
    SmoothQuadraticCurve(X, Y),
    #[letter('A')]
    EllipticalArc(Radius, Radius, Rotation, Flag, Flag, X, Y),
    #[letter('Z')]
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub letter: Letter,
    pub position: Position,
    pub args: Vec<f64>,
}

impl Command {
    pub fn new(letter: Letter, position: Position, args: Vec<f64>) -> Self {
	Command { letter, position, args }
    }

    pub fn absolute(letter: Letter, args: Vec<f64>) -> Self {
	Command::new(letter, Position::Absolute, args)
    }

    pub fn relative(letter: Letter, args: Vec<f64>) -> Self {
	Command::new(letter, Position::Relative, args)
    }

    ///The letter as it is written: lowercase for relative commands.
    pub fn to_char(&self) -> char {
	match self.position {
	    Position::Absolute => self.letter.to_char(),
	    Position::Relative => self.letter.to_char().to_ascii_lowercase(),
	}
    }

    ///Role of the argument at `index`. Argument lists longer than the arity
    ///repeat the letter's slot pattern.
    pub fn slot(&self, index: usize) -> Option<Slot> {
	let slots = self.letter.slots();
	if slots.is_empty() {
	    return None;
	}

	Some(slots[index % slots.len()])
    }

    pub fn map_args<F>(&self, mut f: F) -> Command
    where F: FnMut(Option<Slot>, f64) -> f64
    {
	let args = self.args.iter()
	    .enumerate()
	    .map(|(i, &v)| f(self.slot(i), v))
	    .collect();

	Command::new(self.letter, self.position, args)
    }

    ///Whether the argument count fits the grammar: a positive multiple of the
    ///arity, or nothing at all for closepath.
    pub fn has_valid_arity(&self) -> bool {
	match self.letter.arity() {
	    0 => self.args.is_empty(),
	    n => !self.args.is_empty() && self.args.len() % n == 0,
	}
    }
}

///Formats a number the shortest way that reads back to the same value.
///Negative zero is written as `0`; infinities saturate to the largest finite
///value and NaN becomes `0`, so the result is always a number literal.
pub fn format_number(value: f64) -> String {
    if value == 0.0 || value.is_nan() {
	return String::from("0");
    }

    value.clamp(f64::MIN, f64::MAX).to_string()
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	write!(f, "{}", self.to_char())?;

	for (i, v) in self.args.iter().enumerate() {
	    if i > 0 {
		write!(f, ",")?;
	    }
	    write!(f, "{}", format_number(*v))?;
	}

	Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityMismatch {
    pub index: usize,
    pub letter: char,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for ArityMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match self.expected {
	    0 => write!(f, "command {} ('{}') takes no arguments, found {}",
			self.index, self.letter, self.found),
	    n => write!(f, "command {} ('{}') takes a multiple of {} arguments, found {}",
			self.index, self.letter, n, self.found),
	}
    }
}

///The value of one `d` attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData(Vec<Command>);

impl PathData {
    pub fn new() -> Self {
	PathData(Vec::new())
    }

    pub fn parse(s: &str) -> Self {
	crate::parse::parse_path(s)
    }

    pub fn commands(&self) -> &[Command] {
	&self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
	self.0.iter()
    }

    pub fn len(&self) -> usize {
	self.0.len()
    }

    pub fn is_empty(&self) -> bool {
	self.0.is_empty()
    }

    pub fn push(&mut self, command: Command) {
	self.0.push(command);
    }

    ///Lists every command whose argument count does not fit its letter.
    pub fn validate(&self) -> Vec<ArityMismatch> {
	self.iter()
	    .enumerate()
	    .filter(|(_, command)| !command.has_valid_arity())
	    .map(|(index, command)| ArityMismatch {
		index,
		letter: command.to_char(),
		expected: command.letter.arity(),
		found: command.args.len(),
	    })
	    .collect()
    }
}

impl From<Vec<Command>> for PathData {
    fn from(commands: Vec<Command>) -> Self {
	PathData(commands)
    }
}

impl std::iter::FromIterator<Command> for PathData {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
	PathData(iter.into_iter().collect())
    }
}

impl IntoIterator for PathData {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
	self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathData {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
	self.0.iter()
    }
}

impl FromStr for PathData {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
	Ok(PathData::parse(s))
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	for (i, command) in self.0.iter().enumerate() {
	    if i > 0 {
		write!(f, " ")?;
	    }
	    write!(f, "{}", command)?;
	}

	Ok(())
    }
}

///Coordinate space a path is drawn in. Only `width` and `height` take part
///in the transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(width: f64, height: f64) -> Result<Self, ViewBoxError> {
	ViewBox::with_origin(0.0, 0.0, width, height)
    }

    pub fn with_origin(x: f64, y: f64, width: f64, height: f64) -> Result<Self, ViewBoxError> {
	if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
	    return Err(ViewBoxError::NonPositive { width, height });
	}

	Ok(ViewBox { x, y, width, height })
    }

    ///Reads the `viewBox` attribute of the root `<svg>` element, if any.
    pub fn from_document(document: &str) -> Option<Result<Self, ViewBoxError>> {
	use svg::node::element::tag::{self, SVG};
	use svg::parser::Event;

	let events = svg::read(document).ok()?;
	for event in events {
	    if let Event::Tag(SVG, tag::Type::Start, attributes) = event {
		return attributes.get("viewBox").map(|vb| vb.parse());
	    }
	}

	None
    }
}

impl Default for ViewBox {
    fn default() -> Self {
	ViewBox { x: 0.0, y: 0.0, width: 1000.0, height: 100.0 }
    }
}

impl FromStr for ViewBox {
    type Err = ViewBoxError;

    ///Parses `min-x min-y width height`, separated by whitespace and/or commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
	let values = s.split(|c: char| c.is_whitespace() || c == ',')
	    .filter(|part| !part.is_empty())
	    .map(|part| part.parse::<f64>()
		 .map_err(|_| ViewBoxError::InvalidNumber(String::from(part))))
	    .collect::<Result<Vec<f64>, _>>()?;

	match values[..] {
	    [x, y, width, height] => ViewBox::with_origin(x, y, width, height),
	    _ => Err(ViewBoxError::WrongValueCount(values.len())),
	}
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	write!(f, "{} {} {} {}",
	       format_number(self.x),
	       format_number(self.y),
	       format_number(self.width),
	       format_number(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_table_matches_path_syntax() {
	assert_eq!(Letter::Move.arity(), 2);
	assert_eq!(Letter::HorizontalLine.slots(), &[Slot::X]);
	assert_eq!(Letter::VerticalLine.slots(), &[Slot::Y]);
	assert_eq!(Letter::CubicCurve.arity(), 6);
	assert_eq!(Letter::SmoothCubicCurve.arity(), 4);
	assert_eq!(Letter::QuadraticCurve.arity(), 4);
	assert_eq!(Letter::SmoothQuadraticCurve.arity(), 2);
	assert_eq!(Letter::EllipticalArc.slots(),
		   &[Slot::Radius, Slot::Radius, Slot::Rotation, Slot::Flag, Slot::Flag, Slot::X, Slot::Y]);
	assert_eq!(Letter::Close.arity(), 0);
    }

    #[test]
    fn every_letter_reads_back_in_both_cases() {
	assert_eq!(Letter::ALL.len(), 10);

	for letter in Letter::ALL.iter().copied() {
	    let upper = letter.to_char();
	    assert_eq!(Letter::from_char(upper), Some(letter));
	    assert_eq!(Letter::from_char(upper.to_ascii_lowercase()), Some(letter));
	}

	assert_eq!(Letter::from_char('e'), None);
	assert_eq!(Letter::from_char('B'), None);
    }

    #[test]
    fn slots_repeat_past_the_arity() {
	let line = Command::absolute(Letter::Line, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
	assert_eq!(line.slot(2), Some(Slot::X));
	assert_eq!(line.slot(3), Some(Slot::Y));
	assert_eq!(line.slot(4), Some(Slot::X));

	let close = Command::absolute(Letter::Close, Vec::new());
	assert_eq!(close.slot(0), None);
    }

    #[test]
    fn relative_commands_print_lowercase() {
	let command = Command::relative(Letter::CubicCurve, vec![255.72, 0.0, 358.35, 119.2, 673.28, 77.47]);
	assert_eq!(command.to_string(), "c255.72,0,358.35,119.2,673.28,77.47");
	assert_eq!(Command::relative(Letter::Close, Vec::new()).to_string(), "z");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
	assert_eq!(format_number(-0.0), "0");
	assert_eq!(format_number(-12.5), "-12.5");
	assert_eq!(format_number(1000.0), "1000");
    }

    #[test]
    fn non_finite_values_print_as_literals() {
	assert_eq!(format_number(f64::INFINITY), f64::MAX.to_string());
	assert_eq!(format_number(f64::NEG_INFINITY), f64::MIN.to_string());
	assert_eq!(format_number(f64::NAN), "0");
	assert_eq!(format_number(f64::INFINITY).parse::<f64>(), Ok(f64::MAX));
    }

    #[test]
    fn validate_reports_arity_mismatches() {
	let path = PathData::from(vec![
	    Command::absolute(Letter::Move, vec![0.0, 100.0]),
	    Command::absolute(Letter::CubicCurve, vec![1.0, 2.0, 3.0]),
	    Command::absolute(Letter::Line, Vec::new()),
	    Command::absolute(Letter::Close, vec![4.0]),
	]);

	let mismatches = path.validate();
	assert_eq!(mismatches.len(), 3);
	assert_eq!(mismatches[0], ArityMismatch { index: 1, letter: 'C', expected: 6, found: 3 });
	assert_eq!(mismatches[1].index, 2);
	assert_eq!(mismatches[2], ArityMismatch { index: 3, letter: 'Z', expected: 0, found: 1 });
    }

    #[test]
    fn view_box_parses_attribute_syntax() {
	let vb: ViewBox = "0 0 1000 100".parse().unwrap();
	assert_eq!(vb, ViewBox::new(1000.0, 100.0).unwrap());

	let vb: ViewBox = "10,20, 300 40".parse().unwrap();
	assert_eq!((vb.x, vb.y, vb.width, vb.height), (10.0, 20.0, 300.0, 40.0));
	assert_eq!(vb.to_string(), "10 20 300 40");
    }

    #[test]
    fn view_box_rejects_bad_input() {
	assert_eq!("0 0 100".parse::<ViewBox>(), Err(ViewBoxError::WrongValueCount(3)));
	assert_eq!("0 0 wide 100".parse::<ViewBox>(), Err(ViewBoxError::InvalidNumber(String::from("wide"))));
	assert!(matches!(ViewBox::new(0.0, 100.0), Err(ViewBoxError::NonPositive { .. })));
	assert!(ViewBox::new(1000.0, f64::NAN).is_err());
    }

    #[test]
    fn view_box_from_document() {
	let doc = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1000 100"><path d="M0,0Z"/></svg>"#;
	assert_eq!(ViewBox::from_document(doc), Some(Ok(ViewBox::new(1000.0, 100.0).unwrap())));

	let doc = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0,0Z"/></svg>"#;
	assert_eq!(ViewBox::from_document(doc), None);
    }
}
