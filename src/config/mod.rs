use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::optics::{Channel, DarkCountCorrector, DepthBand, ParOptions, Percentile};

pub mod error;
pub use error::ConfigError;

/// Correction settings shared by every channel of a deployment.
#[derive(Debug, Clone)]
pub struct Config {
    percentile: Percentile,
    backscatter: DepthBand,
    fluorescence: DepthBand,
    par: ParOptions,
}

// Bands and percentiles are validated while deserializing; channel bands and
// PAR options fall back to their defaults when absent.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            percentile: f64,
            backscatter: Option<DepthBand>,
            fluorescence: Option<DepthBand>,
            par: Option<ParOptions>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let percentile = Percentile::new(helper.percentile)
            .map_err(|e| D::Error::custom(format!("Invalid percentile: {}", e)))?;

        Ok(Config {
            percentile,
            backscatter: helper
                .backscatter
                .unwrap_or_else(|| Channel::Backscatter.default_band()),
            fluorescence: helper
                .fluorescence
                .unwrap_or_else(|| Channel::Fluorescence.default_band()),
            par: helper.par.unwrap_or_default(),
        })
    }
}

impl Config {
    pub fn new(percentile: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            percentile: Percentile::new(percentile)?,
            backscatter: Channel::Backscatter.default_band(),
            fluorescence: Channel::Fluorescence.default_band(),
            par: ParOptions::default(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn percentile(&self) -> Percentile {
        self.percentile
    }

    pub fn band(&self, channel: Channel) -> DepthBand {
        match channel {
            Channel::Backscatter => self.backscatter,
            Channel::Fluorescence => self.fluorescence,
        }
    }

    pub fn par(&self) -> &ParOptions {
        &self.par
    }

    pub fn corrector(&self, channel: Channel) -> DarkCountCorrector {
        DarkCountCorrector::new(self.band(channel), self.percentile)
    }
}
