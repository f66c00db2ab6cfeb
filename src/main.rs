use anyhow::{Context, Result};
use chrono::{Duration, TimeZone, Utc};
use log::info;
use wbgt::methods::METHODS;
use wbgt::{ObservationBatch, WbgtOptions};

fn main() -> Result<()> {
    env_logger::init();

    // A clear summer day in central Georgia, hourly in local standard time
    let start = Utc
        .with_ymd_and_hms(2000, 6, 1, 0, 0, 0)
        .single()
        .context("Invalid start date")?;
    let timestamps: Vec<_> = (0..24).map(|h| start + Duration::hours(h)).collect();
    let hours: Vec<f64> = (0..24).map(f64::from).collect();
    let solar: Vec<f64> = hours
        .iter()
        .map(|h| (850.0 * ((h - 6.0) / 14.0 * std::f64::consts::PI).sin()).max(0.0))
        .collect();
    let temp_air: Vec<f64> = hours
        .iter()
        .map(|h| 27.0 - 6.0 * ((h - 3.0) / 24.0 * 2.0 * std::f64::consts::PI).cos())
        .collect();
    let wind: Vec<f64> = hours.iter().map(|h| 1.5 + 0.1 * h).collect();

    let batch = ObservationBatch::new(
        timestamps,
        &[33.733],
        &[-83.617],
        &solar,
        &[1005.0],
        &temp_air,
        &[19.0],
        &wind,
    )?;
    let options = WbgtOptions {
        gmt_offset_hours: Some(-5.0),
        averaging_minutes: Some(60.0),
        ..WbgtOptions::default()
    };

    println!("{:>5} {:>9} {:>9} {:>9} {:>9}", "hour", "liljegren", "bernard", "dimiceli", "ono");
    let results = METHODS
        .iter()
        .map(|(_, method)| method.run(&batch, &options))
        .collect::<Result<Vec<_>>>()?;
    for i in 0..batch.len() {
        print!("{:>5}", i);
        for res in &results {
            print!(" {:>9.2}", res.wbgt[i]);
        }
        println!();
    }

    for ((name, _), res) in METHODS.iter().zip(&results) {
        let peak = res.wbgt.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        info!("{name}: peak WBGT {peak:.2} °C");
    }
    Ok(())
}
