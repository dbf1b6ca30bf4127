use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use wavepath::{
    MaskPair, ViewBox, enclose_above, flip_vertical, invert_document, invert_path, mask_document,
    mirror_reverse, parse_path,
};

///Derives complementary wave masks from SVG path data.
#[derive(Parser, Debug)]
#[command(name = "wave-mask")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    ///Log transform details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    ///Flip path data upside down
    Flip(PathArgs),

    ///Mirror path data left to right and reverse its commands
    Mirror(PathArgs),

    ///Flip, then mirror and reverse
    Invert(PathArgs),

    ///Rewrite a bottom-baseline wave to fill the area above its curve
    Enclose(EncloseArgs),

    ///Print the top and bottom mask values for a wave
    Mask(MaskArgs),

    ///Invert the first path of an SVG document
    InvertSvg(DocumentArgs),

    ///Report commands whose argument count does not fit their letter
    Check(PathArgs),
}

#[derive(Args, Debug)]
pub struct ViewBoxArgs {
    ///View box width
    #[arg(long, default_value_t = 1000.0)]
    pub width: f64,

    ///View box height
    #[arg(long, default_value_t = 100.0)]
    pub height: f64,

    ///Full view box ("min-x min-y width height"), overrides --width and --height
    #[arg(long, conflicts_with_all = ["width", "height"])]
    pub view_box: Option<ViewBox>,
}

impl ViewBoxArgs {
    pub fn resolve(&self) -> Result<ViewBox> {
	match self.view_box {
	    Some(vb) => Ok(vb),
	    None => ViewBox::new(self.width, self.height).context("invalid view box"),
	}
    }
}

#[derive(Args, Debug)]
pub struct PathArgs {
    ///Path data; read from --input or stdin when omitted
    pub path: Option<String>,

    ///File holding the path data
    #[arg(short, long, conflicts_with = "path")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub view_box: ViewBoxArgs,
}

impl PathArgs {
    pub fn read(&self) -> Result<String> {
	if let Some(path) = &self.path {
	    return Ok(path.clone());
	}

	read_source(self.input.as_ref())
    }
}

#[derive(Args, Debug)]
pub struct EncloseArgs {
    #[command(flatten)]
    pub source: PathArgs,

    ///Fail instead of repairing input that does not follow the baseline convention
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct MaskArgs {
    #[command(flatten)]
    pub source: PathArgs,

    ///Print standalone SVG documents instead of CSS url() values
    #[arg(long)]
    pub document: bool,
}

#[derive(Args, Debug)]
pub struct DocumentArgs {
    ///SVG file; stdin when omitted
    pub input: Option<PathBuf>,

    ///View box width; taken from the document's viewBox when omitted
    #[arg(long, requires = "height")]
    pub width: Option<f64>,

    ///View box height; taken from the document's viewBox when omitted
    #[arg(long, requires = "width")]
    pub height: Option<f64>,
}

fn read_source(file: Option<&PathBuf>) -> Result<String> {
    match file {
	Some(file) => std::fs::read_to_string(file)
	    .with_context(|| format!("failed to read {}", file.display())),
	None => {
	    let mut content = String::new();
	    std::io::stdin().read_to_string(&mut content).context("failed to read stdin")?;
	    Ok(content)
	},
    }
}

fn document_view_box(args: &DocumentArgs, document: &str) -> Result<ViewBox> {
    if let (Some(width), Some(height)) = (args.width, args.height) {
	return ViewBox::new(width, height).context("invalid view box");
    }

    match ViewBox::from_document(document) {
	Some(vb) => vb.context("invalid viewBox attribute"),
	None => {
	    log::info!("document has no viewBox; using {}", ViewBox::default());
	    Ok(ViewBox::default())
	},
    }
}

pub fn execute<W: Write>(command: Commands, out: &mut W) -> Result<()> {
    match command {
	Commands::Flip(args) => {
	    let vb = args.view_box.resolve()?;
	    let path = parse_path(&args.read()?);
	    writeln!(out, "{}", flip_vertical(&path, vb.height))?;
	},
	Commands::Mirror(args) => {
	    let vb = args.view_box.resolve()?;
	    let path = parse_path(&args.read()?);
	    writeln!(out, "{}", mirror_reverse(&path, vb.width))?;
	},
	Commands::Invert(args) => {
	    let vb = args.view_box.resolve()?;
	    writeln!(out, "{}", invert_path(args.read()?.trim(), &vb))?;
	},
	Commands::Enclose(args) => {
	    let vb = args.source.view_box.resolve()?;
	    let enclosed = enclose_above(&args.source.read()?, vb.width, vb.height);

	    if args.strict && !enclosed.is_matched() {
		bail!("path does not follow the bottom-baseline convention: {:?}", enclosed.repairs());
	    }
	    writeln!(out, "{}", enclosed.path())?;
	},
	Commands::Mask(args) => {
	    let vb = args.source.view_box.resolve()?;
	    let path = args.source.read()?;
	    let path = path.trim();

	    if args.document {
		let bottom = enclose_above(path, vb.width, vb.height);
		writeln!(out, "{}", mask_document(path, &vb))?;
		writeln!(out, "{}", mask_document(bottom.path(), &vb))?;
	    } else {
		let pair = MaskPair::new(path, &vb);
		writeln!(out, "top: {}", pair.top)?;
		writeln!(out, "bottom: {}", pair.bottom)?;
	    }
	},
	Commands::InvertSvg(args) => {
	    let document = read_source(args.input.as_ref())?;
	    let vb = document_view_box(&args, &document)?;
	    write!(out, "{}", invert_document(&document, &vb))?;
	},
	Commands::Check(args) => {
	    let path = parse_path(&args.read()?);
	    let mismatches = path.validate();

	    for mismatch in mismatches.iter() {
		writeln!(out, "{}", mismatch)?;
	    }
	    if !mismatches.is_empty() {
		bail!("{} of {} commands have the wrong number of arguments", mismatches.len(), path.len());
	    }
	    writeln!(out, "{} commands ok", path.len())?;
	},
    }

    Ok(())
}
