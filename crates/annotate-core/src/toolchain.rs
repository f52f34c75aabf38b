//! Locations and argument vectors for the bundled external tools.
//!
//! Two executables do the heavy lifting: a notation converter
//! (`pgn-extract`) translating between PGN and UCI move text, and an
//! analysis driver (`analyse`) that feeds a UCI engine and writes the
//! annotated game to stdout. Both live under `bin/` in the install
//! directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::process::{self, ProcessError};
use crate::request::{AnalysisRequest, Color};

/// Converter flag selecting UCI move output.
const TO_UCI_FLAG: &str = "-Wuci";
/// Converter flag selecting SAN move output with English piece letters.
const TO_SAN_FLAG: &str = "-WsanPNBRQK";
const OUTPUT_FLAG: &str = "--output";

/// Value passed to the driver's `--movesuntil` option; zero disables the
/// cutoff so every move past the opening skip is analyzed.
const MOVES_UNTIL: u32 = 0;

/// Suffix the analysis driver appends to its input path when writing the
/// statistics side channel.
pub const STATS_SUFFIX: &str = "_stats";

/// Errors from invoking the external tools.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool could not be located or run.
    #[error(transparent)]
    Process(#[from] ProcessError),
    /// A conversion finished without producing its output file.
    #[error("Conversion produced no output file at '{}'", .0.display())]
    MissingOutput(PathBuf),
}

/// Path of the statistics side channel the analysis driver writes for
/// `input`.
pub fn stats_path(input: &Path) -> PathBuf {
    let mut raw = input.as_os_str().to_owned();
    raw.push(STATS_SUFFIX);
    PathBuf::from(raw)
}

fn tool_name(base: &str) -> String {
    format!("{base}{}", std::env::consts::EXE_SUFFIX)
}

/// Locates and invokes the bundled conversion and analysis executables.
#[derive(Debug, Clone)]
pub struct Toolchain {
    install_dir: PathBuf,
}

impl Toolchain {
    /// Creates a toolchain rooted at the given install directory.
    pub fn new(install_dir: PathBuf) -> Self {
        Self { install_dir }
    }

    /// Path to the bundled notation converter.
    pub fn converter(&self) -> PathBuf {
        self.install_dir.join("bin").join(tool_name("pgn-extract"))
    }

    /// Path to the bundled analysis driver.
    pub fn analyser(&self) -> PathBuf {
        self.install_dir.join("bin").join(tool_name("analyse"))
    }

    /// Translates a PGN game file into UCI move text at `output`.
    pub fn convert_to_uci(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.convert(TO_UCI_FLAG, input, output)
    }

    /// Translates (possibly annotated) UCI move text back into PGN at
    /// `output`.
    pub fn convert_to_pgn(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.convert(TO_SAN_FLAG, input, output)
    }

    /// The converter's exit status and stdout carry no information the
    /// pipeline needs; only the presence of the output file matters.
    fn convert(&self, format_flag: &str, input: &Path, output: &Path) -> Result<(), ToolError> {
        let args = conversion_args(format_flag, input, output);
        let status = process::run(&self.converter(), &args)?;
        tracing::debug!(?status, output = %output.display(), "converter finished");
        if !output.exists() {
            return Err(ToolError::MissingOutput(output.to_path_buf()));
        }
        Ok(())
    }

    /// Runs the analysis driver over a UCI-notation game file and returns
    /// the annotated move text it writes to stdout.
    ///
    /// As a side effect the driver writes a statistics file at
    /// [`stats_path`]`(input)`; the caller harvests it after this returns.
    pub fn analyse(&self, request: &AnalysisRequest, input: &Path) -> Result<String, ToolError> {
        let args = analysis_args(request, input);
        Ok(process::run_captured(&self.analyser(), &args)?)
    }
}

fn conversion_args(format_flag: &str, input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        format_flag.into(),
        OUTPUT_FLAG.into(),
        output.as_os_str().to_owned(),
        input.as_os_str().to_owned(),
    ]
}

fn analysis_args(request: &AnalysisRequest, input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--engine".into(), request.engine.as_os_str().to_owned()];
    match request.color {
        Color::White => args.push("--whiteonly".into()),
        Color::Black => args.push("--blackonly".into()),
        Color::All => {}
    }
    args.push("--searchdepth".into());
    args.push(request.depth.to_string().into());
    args.push("--bookdepth".into());
    args.push(request.opening_skip.to_string().into());
    args.push("--movesuntil".into());
    args.push(MOVES_UNTIL.to_string().into());
    args.push("--setoption".into());
    args.push("Threads".into());
    args.push(request.threads.to_string().into());
    args.push("--annotatePGN".into());
    args.push(input.as_os_str().to_owned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request(color: Color) -> AnalysisRequest {
        AnalysisRequest {
            engine: PathBuf::from("/opt/engines/stockfish"),
            threads: 4,
            depth: 25,
            opening_skip: 6,
            color,
        }
    }

    fn as_strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_conversion_args_shape() {
        let args = conversion_args(
            TO_UCI_FLAG,
            Path::new("games/first.pgn"),
            Path::new("/tmp/first.uci"),
        );

        assert_eq!(
            as_strings(&args),
            vec!["-Wuci", "--output", "/tmp/first.uci", "games/first.pgn"]
        );
    }

    #[test]
    fn test_reverse_conversion_uses_san_flag() {
        let args = conversion_args(
            TO_SAN_FLAG,
            Path::new("/tmp/first.analyzed"),
            Path::new("games/first.analyzed.pgn"),
        );

        assert_eq!(as_strings(&args)[0], "-WsanPNBRQK");
    }

    #[test]
    fn test_analysis_args_for_both_colors_omit_the_selector() {
        let args = as_strings(&analysis_args(
            &test_request(Color::All),
            Path::new("/tmp/first.uci"),
        ));

        assert!(!args.contains(&"--whiteonly".to_string()));
        assert!(!args.contains(&"--blackonly".to_string()));
    }

    #[test]
    fn test_analysis_args_for_black_include_the_selector() {
        let args = as_strings(&analysis_args(
            &test_request(Color::Black),
            Path::new("/tmp/first.uci"),
        ));

        assert!(args.contains(&"--blackonly".to_string()));
        assert!(!args.contains(&"--whiteonly".to_string()));
        // The selector sits directly after the engine option.
        assert_eq!(args[0], "--engine");
        assert_eq!(args[2], "--blackonly");
    }

    #[test]
    fn test_analysis_args_carry_every_request_parameter() {
        let args = as_strings(&analysis_args(
            &test_request(Color::White),
            Path::new("/tmp/first.uci"),
        ));

        assert_eq!(
            args,
            vec![
                "--engine",
                "/opt/engines/stockfish",
                "--whiteonly",
                "--searchdepth",
                "25",
                "--bookdepth",
                "6",
                "--movesuntil",
                "0",
                "--setoption",
                "Threads",
                "4",
                "--annotatePGN",
                "/tmp/first.uci",
            ]
        );
    }

    #[test]
    fn test_analysis_input_is_the_final_argument() {
        let args = analysis_args(&test_request(Color::All), Path::new("/tmp/first.uci"));

        assert_eq!(args.last().unwrap(), &OsString::from("/tmp/first.uci"));
    }

    #[test]
    fn test_stats_path_appends_the_suffix() {
        assert_eq!(
            stats_path(Path::new("/tmp/run/first.uci")),
            PathBuf::from("/tmp/run/first.uci_stats")
        );
    }

    #[test]
    fn test_tool_locations_are_under_bin() {
        let toolchain = Toolchain::new(PathBuf::from("/opt/annotate"));

        assert!(toolchain
            .converter()
            .starts_with(Path::new("/opt/annotate/bin")));
        assert!(toolchain
            .analyser()
            .starts_with(Path::new("/opt/annotate/bin")));
    }
}
