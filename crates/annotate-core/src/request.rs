//! The per-invocation analysis request model.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Which side's moves the analysis tool should annotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Annotate only white's moves.
    White,
    /// Annotate only black's moves.
    Black,
    /// Annotate both sides.
    All,
}

impl Color {
    /// Parses one of the single-character tokens `W`, `B` or `A`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "W" => Some(Self::White),
            "B" => Some(Self::Black),
            "A" => Some(Self::All),
            _ => None,
        }
    }

    /// The single-character token for this selector.
    pub fn token(self) -> char {
        match self {
            Self::White => 'W',
            Self::Black => 'B',
            Self::All => 'A',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Optional per-invocation overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Engine executable replacing the configured one.
    pub engine: Option<PathBuf>,
    /// Worker thread count for the engine.
    pub threads: Option<u32>,
    /// Search depth per analyzed position.
    pub depth: Option<u32>,
    /// Opening moves excluded from analysis.
    pub opening_skip: Option<u32>,
    /// Side selector.
    pub color: Option<Color>,
}

/// A fully resolved analysis request.
///
/// Built once per invocation by layering command-line overrides over
/// configuration values over compiled-in defaults, and immutable afterward.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Engine executable driving the analysis.
    pub engine: PathBuf,
    /// Worker threads the engine may use.
    pub threads: u32,
    /// Search depth per analyzed position.
    pub depth: u32,
    /// Opening moves excluded from analysis.
    pub opening_skip: u32,
    /// Side selector.
    pub color: Color,
}

impl AnalysisRequest {
    /// Resolves the request for this invocation.
    pub fn resolve(config: &Config, install_dir: &Path, overrides: Overrides) -> Self {
        Self {
            engine: overrides
                .engine
                .unwrap_or_else(|| config.engine_path(install_dir)),
            threads: overrides.threads.unwrap_or(config.threads),
            depth: overrides.depth.unwrap_or(config.depth),
            opening_skip: overrides.opening_skip.unwrap_or(config.opening_skip),
            color: overrides.color.unwrap_or(Color::All),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DEPTH, DEFAULT_ENGINE_RELATIVE, DEFAULT_THREADS};

    #[test]
    fn test_color_parses_recognized_tokens() {
        assert_eq!(Color::parse("W"), Some(Color::White));
        assert_eq!(Color::parse("B"), Some(Color::Black));
        assert_eq!(Color::parse("A"), Some(Color::All));
    }

    #[test]
    fn test_color_rejects_unrecognized_tokens() {
        assert_eq!(Color::parse("w"), None);
        assert_eq!(Color::parse(""), None);
        assert_eq!(Color::parse("AB"), None);
        assert_eq!(Color::parse("All"), None);
    }

    #[test]
    fn test_color_displays_as_its_token() {
        assert_eq!(Color::White.to_string(), "W");
        assert_eq!(Color::Black.to_string(), "B");
        assert_eq!(Color::All.to_string(), "A");
    }

    #[test]
    fn test_resolve_with_no_overrides_uses_config_and_defaults() {
        let config = Config::default();
        let install_dir = Path::new("/opt/annotate");

        let request = AnalysisRequest::resolve(&config, install_dir, Overrides::default());

        assert_eq!(request.engine, install_dir.join(DEFAULT_ENGINE_RELATIVE));
        assert_eq!(request.threads, DEFAULT_THREADS);
        assert_eq!(request.depth, DEFAULT_DEPTH);
        assert_eq!(request.color, Color::All);
    }

    #[test]
    fn test_resolve_prefers_overrides_over_config() {
        let config = Config {
            engine: Some(PathBuf::from("/configured/engine")),
            threads: 2,
            depth: 18,
            opening_skip: 3,
        };
        let overrides = Overrides {
            engine: Some(PathBuf::from("/flag/engine")),
            threads: Some(8),
            depth: None,
            opening_skip: None,
            color: Some(Color::Black),
        };

        let request = AnalysisRequest::resolve(&config, Path::new("/opt"), overrides);

        assert_eq!(request.engine, PathBuf::from("/flag/engine"));
        assert_eq!(request.threads, 8);
        assert_eq!(request.depth, 18); // config value survives
        assert_eq!(request.opening_skip, 3);
        assert_eq!(request.color, Color::Black);
    }
}
