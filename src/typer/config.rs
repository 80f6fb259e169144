/// Default cap on fixed-point passes.
pub const DEFAULT_MAX_PASSES: usize = 10;

#[derive(Debug, Clone)]
pub struct TyperConfig {
    /// TOML rule table replacing the built-in OPLS-AA rules.
    pub rules: Option<String>,
    pub max_passes: usize,
    /// Write the unreduced candidate list instead of a single type.
    pub debug: bool,
}

impl Default for TyperConfig {
    fn default() -> Self {
        Self {
            rules: None,
            max_passes: DEFAULT_MAX_PASSES,
            debug: false,
        }
    }
}
