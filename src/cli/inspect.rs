//! Inspect command implementation.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;

use super::{load_options, report_diagnostics};
use crate::error::Result;
use crate::graphics::{convert, Diagram};
use crate::output::{display_path, plural, Printer};
use crate::parser::{read_grid, scan_tokens};

/// Print a summary of the shapes and labels found in a diagram
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Diagram file to inspect
    pub file: PathBuf,

    /// YAML file with conversion options
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: InspectArgs, printer: &Printer) -> Result<()> {
    let options = load_options(args.config.as_deref())?;
    options.validate()?;

    let grid = read_grid(&args.file, &options)?;
    let tokens = scan_tokens(&grid, &options);
    printer.info(
        "Inspecting",
        &format!("{} ({}x{} cells)", display_path(&args.file), grid.width(), grid.height()),
    );

    let conversion = convert(&grid, &tokens, &options);
    print!("{}", summary(&conversion.diagram));
    report_diagnostics(printer, &conversion.diagnostics);
    Ok(())
}

/// One line per shape, composite and label.
pub fn summary(diagram: &Diagram) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}, {}, {}",
        plural(diagram.shapes.len(), "shape", "shapes"),
        plural(diagram.composite_shapes.len(), "composite", "composites"),
        plural(diagram.texts.len(), "text", "texts"),
    );

    for shape in &diagram.shapes {
        let outline = if shape.closed { "closed" } else { "open" };
        let _ = write!(out, "shape {:?} {} {}", shape.kind, outline, plural(shape.points.len(), "point", "points"));
        if shape.stroke_dashed {
            out.push_str(" dashed");
        }
        if let Some(fill) = shape.fill_colour {
            let _ = write!(out, " fill {}", fill);
        }
        out.push('\n');
    }
    for composite in &diagram.composite_shapes {
        let _ = write!(out, "composite {}", plural(composite.shapes.len(), "segment", "segments"));
        if composite.is_dashed() {
            out.push_str(" dashed");
        }
        out.push('\n');
    }
    for text in &diagram.texts {
        let _ = writeln!(out, "text {:?} at ({:.1}, {:.1}) size {:.1}", text.text, text.x, text.y, text.font_size);
    }
    out
}
