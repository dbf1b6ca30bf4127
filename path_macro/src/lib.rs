extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{self, Attribute, Data, DeriveInput, Fields, Ident, Lit, Type, Variant, punctuated::Punctuated, token::Comma};

///Turns an enum whose tuple variants list argument slots into a plain letter
///enum plus a lookup table.
///
///```ignore
///#[path_grammar]
///pub enum Letter {
///    #[letter('M')]
///    Move(X, Y),
///    #[letter('Z')]
///    Close,
///}
///```
///
///Every field type must name a variant of a `Slot` enum in scope at the call site.
#[proc_macro_attribute]
pub fn path_grammar(_attributes: TokenStream, items: TokenStream) -> TokenStream {
    let mut ast = syn::parse(items).unwrap();

    match impl_path_grammar(&mut ast) {
	Err(e) => panic!("{}", e),
	Ok(r) => r
    }
}

struct GrammarRow {
    variant: Ident,
    letter: char,
    slots: Vec<Ident>,
}

fn consume_letter(attrs: &mut Vec<Attribute>) -> Result<char, String> {
    let letter_attr_pos = attrs.iter().position(|attr| {
	match attr.path.segments.first() {
	    Some(seg) => seg.ident == "letter",
	    None => false,
	}
    }).ok_or("Every variant needs a #[letter('X')] attribute.")?;

    let letter_attr = attrs.remove(letter_attr_pos);

    let arg: Lit = letter_attr.parse_args().map_err(|e| format!("{}", e))?;
    let letter = match arg {
	Lit::Char(c) => c.value(),
	err => return Err(format!("Invalid type for letter: {:?}", err)),
    };

    if !letter.is_ascii_uppercase() {
	return Err(format!("Command letters are written uppercase, got '{}'.", letter));
    }

    Ok(letter)
}

fn slot_name(ty: &Type) -> Result<Ident, String> {
    match ty {
	Type::Path(tp) => tp.path.segments.last()
	    .map(|seg| seg.ident.clone())
	    .ok_or_else(|| format!("Invalid type path: {:?}", tp)),
	err => Err(format!("Slots must be plain type paths, got: {:?}", err)),
    }
}

///Strips the slot fields off every variant and collects one table row per variant.
fn parse_variants(variants: &Punctuated<Variant, Comma>)
		  -> Result<(Vec<GrammarRow>, Punctuated<Variant, Comma>), String>
{
    let mut rows = Vec::new();
    let mut new_variants = Punctuated::new();

    for v in variants.iter() {
	let mut new_variant = v.clone();
	let letter = consume_letter(&mut new_variant.attrs)?;

	let slots = match &v.fields {
	    Fields::Unnamed(fs) => fs.unnamed.iter()
		.map(|field| slot_name(&field.ty))
		.collect::<Result<Vec<_>, _>>()?,
	    Fields::Unit => Vec::new(),
	    _ => return Err(String::from("Must use unnamed fields.")),
	};

	if rows.iter().any(|row: &GrammarRow| row.letter == letter) {
	    return Err(format!("Letter '{}' is used twice.", letter));
	}

	new_variant.fields = Fields::Unit;
	new_variants.push(new_variant);

	rows.push(GrammarRow {
	    variant: v.ident.clone(),
	    letter,
	    slots,
	});
    }

    Ok((rows, new_variants))
}

fn generate_table(enum_name: &Ident, rows: &[GrammarRow]) -> proc_macro2::TokenStream {
    let slot_type = Ident::new("Slot", Span::call_site());
    let count = rows.len();

    let variants: Vec<_> = rows.iter().map(|row| &row.variant).collect();
    let uppers: Vec<_> = rows.iter().map(|row| row.letter).collect();
    let lowers: Vec<_> = rows.iter().map(|row| row.letter.to_ascii_lowercase()).collect();
    let slot_lists: Vec<_> = rows.iter().map(|row| {
	let slots = &row.slots;
	quote! { &[#(#slot_type::#slots),*] }
    }).collect();

    quote! {
	impl #enum_name {
	    pub const ALL: [#enum_name; #count] = [#(#enum_name::#variants),*];

	    ///Argument roles of one repetition of this command, in order.
	    pub fn slots(self) -> &'static [#slot_type] {
		match self {
		    #(#enum_name::#variants => #slot_lists,)*
		}
	    }

	    pub fn arity(self) -> usize {
		self.slots().len()
	    }

	    pub fn to_char(self) -> char {
		match self {
		    #(#enum_name::#variants => #uppers,)*
		}
	    }

	    ///Accepts both the absolute (uppercase) and relative (lowercase) spelling.
	    pub fn from_char(c: char) -> Option<Self> {
		match c {
		    #(#uppers | #lowers => Some(#enum_name::#variants),)*
		    _ => None,
		}
	    }
	}
    }
}

fn impl_path_grammar(grammar: &mut DeriveInput) -> Result<TokenStream, String> {
    if !grammar.generics.params.is_empty() {
	return Err(String::from("generic grammars are not supported"));
    }

    let data_enum = match &grammar.data {
	Data::Enum(data_enum) => Ok(data_enum),
	_ => Err("Must be defined with an enum."),
    }?;

    let (rows, new_variants) = parse_variants(&data_enum.variants)?;
    let table = generate_table(&grammar.ident, &rows);

    if let Data::Enum(de) = &mut grammar.data {
	de.variants = new_variants;
    }

    let result = quote! {
	#grammar

	#table
    };

    Ok(result.into())
}
