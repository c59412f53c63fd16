//! Registry Ports - Team and Division Lookup Interfaces
//!
//! The odds engine validates fixtures against these traits and never
//! owns the data behind them. Implementations are built once at
//! startup and shared read-only across requests.

/// Lookup of known teams, their numeric encodings and division membership.
pub trait TeamRegistry: Send + Sync {
  /// Numeric encoding of a team, `None` if the name is unknown.
  ///
  /// Matching is exact; near-misses are served by [`TeamRegistry::suggest`].
  fn team_code(&self, name: &str) -> Option<u32>;

  /// Sorted team names, optionally restricted to one division.
  fn teams(&self, division: Option<&str>) -> Vec<String>;

  /// Registry names resembling `query`, best match first, at most `limit`.
  fn suggest(&self, query: &str, limit: usize) -> Vec<String>;

  /// Number of registered teams.
  fn team_count(&self) -> usize;
}

/// Lookup of division codes (e.g. `SP1`) and their display names.
pub trait DivisionRegistry: Send + Sync {
  /// Numeric encoding of a division, `None` if the code is unknown.
  fn division_code(&self, code: &str) -> Option<u32>;

  /// Human-readable name for a known code.
  fn display_name(&self, code: &str) -> Option<String>;

  /// Every valid code, sorted.
  fn codes(&self) -> Vec<String>;
}
