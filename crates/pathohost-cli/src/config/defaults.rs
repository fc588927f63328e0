use pathohost::remote::rcsb::DEFAULT_MAX_RESULTS;

/// Built-in values used when neither the config file nor the command line sets one.
pub struct DefaultsConfig {
    pub scratch_dir: String,
    pub vina_path: String,
    pub obabel_path: String,
    pub exhaustiveness: u32,
    pub num_modes: u32,
    pub center: [f64; 3],
    pub size: [f64; 3],
    pub rank_match: String,
    pub rank_digits: String,
    pub max_results: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            scratch_dir: "data".to_string(),
            vina_path: "vina".to_string(),
            obabel_path: "obabel".to_string(),
            exhaustiveness: 8,
            num_modes: 9,
            center: [0.0, 0.0, 0.0],
            size: [20.0, 20.0, 20.0],
            rank_match: "digits".to_string(),
            rank_digits: "123".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
