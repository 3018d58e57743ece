use mazeforge::config::MazeConfig;
use mazeforge::maze::zones::parse_zone_list;
use mazeforge::{GeneratorOptions, MazeError, MazeResult, ZoneSource};

/// Turns command line overrides on top of the saved config into generator options
pub struct OptionsBuilder {
    config: MazeConfig,
    algorithm: Option<String>,
    fill: Option<String>,
    zones: Option<String>,
    auto_zones: bool,
}

impl OptionsBuilder {
    pub fn new(config: MazeConfig) -> Self {
        Self {
            config,
            algorithm: None,
            fill: None,
            zones: None,
            auto_zones: false,
        }
    }

    pub fn algorithm(mut self, algorithm: Option<String>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn fill(mut self, fill: Option<String>) -> Self {
        self.fill = fill;
        self
    }

    pub fn zones(mut self, zones: Option<String>) -> Self {
        self.zones = zones;
        self
    }

    pub fn auto_zones(mut self, auto_zones: bool) -> Self {
        self.auto_zones = auto_zones;
        self
    }

    pub fn build(self) -> MazeResult<GeneratorOptions> {
        let mut options = self.config.options();

        if let Some(name) = &self.algorithm {
            options.algorithm = name.parse()?;
        }
        if let Some(name) = &self.fill {
            options.fill_factor = name.parse()?;
        }

        // Explicit zones replace whatever the config asks for
        options.zones = match (&self.zones, self.auto_zones) {
            (Some(_), true) => {
                return Err(MazeError::InvalidZone {
                    reason: "--zones and --auto-zones cannot be combined".to_string(),
                });
            }
            (Some(zones), false) => ZoneSource::Explicit(parse_zone_list(zones)?),
            (None, true) => ZoneSource::Auto,
            (None, false) => std::mem::take(&mut options.zones),
        };

        options.validate()?;
        Ok(options)
    }
}
