mod utils;

use glider_optics::config::Config;
use glider_optics::optics::{Channel, par_noise_floor, subtract_floor};
use glider_optics::profile::Profile;
use glider_optics::solar::sunset_sunrise_with_horizon;
use log::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .unwrap_or_else(|| "./data/config/config.json".to_string());
    let profile_path = args
        .next()
        .ok_or("usage: glider_optics <config.json> <profile.json>")?;

    info!("Loading config from {config_path}");
    let config = Config::from_file(&config_path)?;

    info!("Loading profile from {profile_path}");
    let profile = Profile::from_file(&profile_path)?;
    if profile.is_empty() {
        return Err("Profile contains no samples".into());
    }

    println!(
        "Dark-count correction - samples: {}, percentile: {}",
        profile.len(),
        config.percentile().value()
    );

    let depth = profile.depth();

    for (channel, series) in [
        (Channel::Backscatter, profile.bbp()),
        (Channel::Fluorescence, profile.flr()),
    ] {
        let Some(series) = series else {
            info!("No {channel} series in profile, skipping");
            continue;
        };

        let corrector = config.corrector(channel);
        let floor = corrector.noise_floor(&series, &depth)?;
        let corrected = subtract_floor(&series, floor);
        utils::print_series_statistics(&channel.to_string(), floor, &corrected);
    }

    let horizon_deg = config.par().horizon_deg;
    match sunset_sunrise_with_horizon(
        &profile.time,
        &profile.latitude,
        &profile.longitude,
        horizon_deg,
    ) {
        Ok((sunrise, sunset)) => {
            println!(
                "First sample - sunrise: {}, sunset: {}",
                sunrise[0].format("%Y-%m-%d %H:%M"),
                sunset[0].format("%Y-%m-%d %H:%M")
            );
        }
        Err(e) => warn!("Sunrise/sunset unavailable: {e}"),
    }

    if let Some(par) = profile.par() {
        let options = config.par();
        let percentile = config.percentile().value();
        let (time, lat, lon) = (&profile.time, &profile.latitude, &profile.longitude);

        match par_noise_floor(&par, &depth, time, lat, lon, percentile, options) {
            Ok(floor) => {
                let corrected = subtract_floor(&par, floor);
                utils::print_series_statistics("par", floor, &corrected);
            }
            Err(e) => warn!("PAR dark count skipped: {e}"),
        }
    }

    Ok(())
}
