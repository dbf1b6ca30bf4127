use nom::{
    IResult,
    bytes::complete::tag,
    character::complete::{char, multispace0, one_of},
    sequence::{terminated, tuple},
};
use svg::Document;
use svg::node::element::Path;
use svg::node::element::tag;
use svg::parser::Event;

use crate::enclose::enclose_above;
use crate::transform::invert_path;
use crate::types::ViewBox;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

///Characters `encodeURI` leaves alone besides ASCII alphanumerics.
const URI_UNRESERVED: &str = ";,/?:@&=+$-_.!~*'()#";

///Percent-encodes everything outside the URI character set, byte by byte.
pub fn encode_uri(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len());

    for c in s.chars() {
	if c.is_ascii_alphanumeric() || URI_UNRESERVED.contains(c) {
	    encoded.push(c);
	    continue;
	}

	let mut buf = [0; 4];
	for byte in c.encode_utf8(&mut buf).bytes() {
	    encoded.push_str(&format!("%{:02X}", byte));
	}
    }

    encoded
}

///A standalone `<svg>` document holding a single path.
pub fn mask_document(path_data: &str, view_box: &ViewBox) -> Document {
    Document::new()
	.set("xmlns", SVG_NAMESPACE)
	.set("viewBox", (0, 0, view_box.width, view_box.height))
	.add(Path::new().set("d", path_data))
}

///CSS `url(...)` value with the path inlined as an SVG data URI.
pub fn mask_url(path_data: &str, view_box: &ViewBox) -> String {
    format!(
	"url('data:image/svg+xml,<svg xmlns=\"{}\" viewBox=\"0 0 {} {}\"><path d=\"{}\"/></svg>')",
	SVG_NAMESPACE,
	crate::types::format_number(view_box.width),
	crate::types::format_number(view_box.height),
	encode_uri(path_data),
    )
}

///Mask values for the top and the bottom of a section, both derived from one
///authored wave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPair {
    pub top: String,
    pub bottom: String,
}

impl MaskPair {
    pub fn new(path_data: &str, view_box: &ViewBox) -> Self {
	let enclosed = enclose_above(path_data, view_box.width, view_box.height);

	MaskPair {
	    top: mask_url(path_data, view_box),
	    bottom: mask_url(enclosed.path(), view_box),
	}
    }
}

///`d` attribute of the first `<path>` in a document.
fn first_path_data(document: &str) -> Option<String> {
    let events = svg::read(document).ok()?;

    for event in events {
	if let Event::Tag(tag::Path, _, attributes) = event {
	    if let Some(d) = attributes.get("d") {
		return Some(d.to_string());
	    }
	}
    }

    None
}

///Byte range of the value of a `d` attribute holding exactly `d`, quoted
///either way and with optional whitespace around `=`.
fn path_data_span(document: &str, d: &str) -> Option<(usize, usize)> {
    document.match_indices('d')
	.filter(|&(i, _)| document[..i].ends_with(char::is_whitespace))
	.find_map(|(i, _)| {
	    let attribute: IResult<&str, _> = tuple((
		char('d'),
		multispace0,
		char('='),
		multispace0,
		one_of("\"'"),
	    ))(&document[i..]);
	    let (value, (_, _, _, _, quote)) = attribute.ok()?;

	    let closed: IResult<&str, &str> = terminated(tag(d), char(quote))(value);
	    closed.ok()?;

	    let start = document.len() - value.len();
	    Some((start, start + d.len()))
	})
}

///Inverts the first path of an `<svg>` document and puts it back in place.
///Documents without a path come back unchanged.
pub fn invert_document(document: &str, view_box: &ViewBox) -> String {
    let authored = match first_path_data(document) {
	Some(d) => d,
	None => {
	    log::warn!("No path found in SVG");
	    return String::from(document);
	},
    };

    let (start, end) = match path_data_span(document, &authored) {
	Some(span) => span,
	None => {
	    log::warn!("Path data could not be located in the SVG source; leaving it unchanged");
	    return String::from(document);
	},
    };

    let inverted = invert_path(&authored, view_box);
    format!("{}{}{}", &document[..start], inverted, &document[end..])
}
