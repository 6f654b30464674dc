use std::path::PathBuf;

/// Range slider settings, in kg.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderConfig {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0,
            max: 10_000,
            step: 1_000,
        }
    }
}

impl SliderConfig {
    /// Tick positions from `min` to `max`, one per `step`.
    pub fn marks(&self) -> Vec<u32> {
        (self.min..=self.max)
            .step_by(self.step.max(1) as usize)
            .collect()
    }
}

/// Dashboard configuration
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    /// Launch records loaded at startup.
    pub data_path: PathBuf,
    pub slider: SliderConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8052,
            data_path: PathBuf::from("spacex_launch_dash.csv"),
            slider: SliderConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
