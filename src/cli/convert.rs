//! Convert command implementation.
//!
//! Reads diagram text files and writes one JSON diagram per input.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use log::debug;
use walkdir::WalkDir;

use super::{load_options, report_diagnostics};
use crate::config::ConversionOptions;
use crate::error::{DiagramError, Result};
use crate::graphics::convert;
use crate::output::{display_path, plural, Printer};
use crate::parser::{read_grid, scan_tokens};

/// Extension of diagram source files picked up from directories.
pub const DIAGRAM_EXTENSION: &str = "txt";

/// Convert diagrams to JSON shape descriptions
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Diagram files, or directories to search for .txt diagrams
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output directory (default: next to each input)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// YAML file with conversion options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Draw every corner rounded
    #[arg(long, short = 'r')]
    pub round_corners: bool,

    /// Leave edges shared by two shapes where they are
    #[arg(long = "no-separation", short = 'E')]
    pub no_separation: bool,

    /// Scale factor for cell and font sizes
    #[arg(long, short)]
    pub scale: Option<f32>,

    /// Tab stop width
    #[arg(long, short)]
    pub tabs: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ConvertArgs {
    /// Options from the config file with command-line flags applied.
    pub fn options(&self) -> Result<ConversionOptions> {
        let mut options = load_options(self.config.as_deref())?;
        if self.round_corners {
            options.all_corners_round = true;
        }
        if self.no_separation {
            options.separate_common_edges = false;
        }
        if let Some(scale) = self.scale {
            options.scale = scale;
        }
        if let Some(tabs) = self.tabs {
            options.tab_size = tabs;
        }
        options.validate()?;
        Ok(options)
    }
}

pub fn run(args: ConvertArgs, printer: &Printer) -> Result<()> {
    let options = args.options()?;
    let inputs = collect_inputs(&args.paths)?;
    if inputs.is_empty() {
        printer.warning("Skipping", "no diagrams found");
        return Ok(());
    }

    if let Some(dir) = &args.output {
        fs::create_dir_all(dir).map_err(|e| DiagramError::Io {
            path: dir.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let mut warnings = 0;
    for input in &inputs {
        printer.status("Converting", &display_path(input));
        let grid = read_grid(input, &options)?;
        let tokens = scan_tokens(&grid, &options);
        let conversion = convert(&grid, &tokens, &options);
        report_diagnostics(printer, &conversion.diagnostics);
        warnings += conversion.diagnostics.len();

        let target = output_path(input, args.output.as_deref());
        let json = conversion
            .diagram
            .to_json(args.pretty)
            .map_err(|e| DiagramError::Io {
                path: target.clone(),
                message: format!("Failed to serialize diagram: {}", e),
            })?;
        fs::write(&target, json).map_err(|e| DiagramError::Io {
            path: target.clone(),
            message: format!("Failed to write diagram: {}", e),
        })?;
        debug!("wrote {}", target.display());
    }

    let mut summary = plural(inputs.len(), "diagram", "diagrams");
    if warnings > 0 {
        summary.push_str(&format!(" ({})", plural(warnings, "diagnostic", "diagnostics")));
    }
    printer.success("Finished", &summary);
    Ok(())
}

/// Expand directories into the diagram files below them.
///
/// Files named directly are taken whatever their extension. Directory
/// contents are sorted so output order does not depend on the filesystem.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == DIAGRAM_EXTENSION))
                .collect();
            found.sort();
            inputs.extend(found);
        } else if path.is_file() {
            inputs.push(path.clone());
        } else {
            return Err(DiagramError::Io {
                path: path.clone(),
                message: "No such file or directory".to_string(),
            });
        }
    }
    Ok(inputs)
}

/// Where the JSON for `input` goes.
pub fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => {
            let stem = input.file_stem().unwrap_or(input.as_os_str());
            dir.join(stem).with_extension("json")
        }
        None => input.with_extension("json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BOX: &str = "+----+\n| hi |\n+----+\n";

    fn args(paths: Vec<PathBuf>) -> ConvertArgs {
        ConvertArgs {
            paths,
            output: None,
            config: None,
            round_corners: false,
            no_separation: false,
            scale: None,
            tabs: None,
            pretty: false,
        }
    }

    #[test]
    fn test_convert_writes_json_next_to_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("box.txt");
        fs::write(&input, BOX).unwrap();

        run(args(vec![input]), &Printer::new()).unwrap();

        let json = fs::read_to_string(dir.path().join("box.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["shapes"].as_array().unwrap().len(), 1);
        assert_eq!(value["texts"][0]["text"], "hi");
    }

    #[test]
    fn test_convert_directory_to_output_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("diagrams/nested")).unwrap();
        fs::write(dir.path().join("diagrams/a.txt"), BOX).unwrap();
        fs::write(dir.path().join("diagrams/nested/b.txt"), "---->").unwrap();
        fs::write(dir.path().join("diagrams/notes.md"), "# not a diagram").unwrap();

        let out = dir.path().join("out");
        let mut convert_args = args(vec![dir.path().join("diagrams")]);
        convert_args.output = Some(out.clone());
        run(convert_args, &Printer::new()).unwrap();

        assert!(out.join("a.json").exists());
        assert!(out.join("b.json").exists());
        assert!(!out.join("notes.json").exists());
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempdir().unwrap();
        let result = run(args(vec![dir.path().join("missing.txt")]), &Printer::new());
        assert!(matches!(result, Err(DiagramError::Io { .. })));
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("asciidiag.yaml");
        fs::write(&config, "scale: 3\nall_corners_round: false\n").unwrap();

        let mut convert_args = args(Vec::new());
        convert_args.config = Some(config);
        convert_args.round_corners = true;
        convert_args.tabs = Some(2);
        let options = convert_args.options().unwrap();
        assert_eq!(options.scale, 3.0);
        assert!(options.all_corners_round);
        assert_eq!(options.tab_size, 2);
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let mut convert_args = args(Vec::new());
        convert_args.scale = Some(0.0);
        assert!(matches!(convert_args.options(), Err(DiagramError::Config { .. })));
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("diagrams/flow.txt");
        assert_eq!(output_path(input, None), PathBuf::from("diagrams/flow.json"));
        assert_eq!(
            output_path(input, Some(Path::new("out"))),
            PathBuf::from("out/flow.json")
        );
    }
}
