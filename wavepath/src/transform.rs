use crate::parse::parse_path;
use crate::types::{Command, Letter, PathData, Position, Slot, ViewBox};

///Reflects every argument in `axis` slots: absolute values against `extent`,
///relative deltas by sign.
///
///Relative arcs are left alone; only the absolute endpoint of `A` is moved.
fn reflect(command: &Command, axis: Slot, extent: f64) -> Command {
    if command.letter == Letter::EllipticalArc && command.position == Position::Relative {
	return command.clone();
    }

    command.map_args(|slot, v| {
	if slot != Some(axis) {
	    return v;
	}

	match command.position {
	    Position::Absolute => extent - v,
	    Position::Relative => -v,
	}
    })
}

///Flips a path upside down inside a box of the given height.
///
///Arc sweep flags are not toggled, so a flipped arc bulges the other way
///from a true mirror image.
pub fn flip_vertical(path: &PathData, height: f64) -> PathData {
    path.iter()
	.map(|command| reflect(command, Slot::Y, height))
	.collect()
}

///Mirrors a path left to right inside a box of the given width and reverses
///the order of its commands.
pub fn mirror_reverse(path: &PathData, width: f64) -> PathData {
    path.iter()
	.rev()
	.map(|command| reflect(command, Slot::X, width))
	.collect()
}

///Vertical flip followed by mirror and reverse.
pub fn invert(path: &PathData, view_box: &ViewBox) -> PathData {
    let flipped = flip_vertical(path, view_box.height);
    mirror_reverse(&flipped, view_box.width)
}

///String form of [`invert`]. Input without any command comes back unchanged.
pub fn invert_path(path_data: &str, view_box: &ViewBox) -> String {
    let path = parse_path(path_data);
    if path.is_empty() {
	return String::from(path_data);
    }

    let inverted = invert(&path, view_box);
    log::debug!("inverted {} commands inside {}", inverted.len(), view_box);

    inverted.to_string()
}
