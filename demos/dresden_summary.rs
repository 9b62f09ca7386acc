//! Summarizes and interpolates daily mean temperatures around Dresden-Hosterwitz
//! from an in-memory observation frame.

use chrono::{NaiveDate, TimeZone, Utc};
use meteo_spatial::{
    DateRange, FrameValuesProvider, LatLon, Parameter, ProviderContext, Resolution,
    SpatialClient, StaticStationDirectory, Station,
};
use polars::prelude::*;
use std::env;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    configure_polars_display();

    let stations = vec![
        Station::new("01048", "Dresden-Klotzsche", 51.1278, 13.7543, 227.0),
        Station::new("01050", "Dresden-Hosterwitz", 51.0221, 13.8470, 114.0),
        Station::new("01051", "Dresden-Strehlen", 50.976788193094855, 13.8470, 119.0),
        Station::new("03811", "Pirna", 50.9625, 13.9444, 120.0),
    ];
    let client = SpatialClient::new(
        StaticStationDirectory::new(stations),
        FrameValuesProvider::new(observations()?)?,
    );

    let context = ProviderContext::dwd_observation(Resolution::Daily, "climate_summary");
    let parameters = [Parameter::TEMPERATURE_AIR_MEAN_200];
    let date_range = DateRange::new(
        NaiveDate::from_ymd_opt(1934, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(1965, 12, 31).unwrap(),
    )?;

    let summary = client
        .summarize()
        .location(LatLon(51.0221, 13.8470))
        .context(&context)
        .parameters(&parameters)
        .date_range(date_range)
        .call()
        .await?;
    println!("Summary ({:?}):\n{}", summary.outcome, summary.frame);

    let interpolated = client
        .interpolate()
        .location(LatLon(51.03, 13.80))
        .context(&context)
        .parameters(&parameters)
        .date_range(date_range)
        .min_neighbors(3)
        .call()
        .await?;
    println!("Interpolation ({:?}):\n{}", interpolated.outcome, interpolated.frame);
    for row in &interpolated.rows {
        println!("{} used {:?}", row.date.date_naive(), row.taken_station_ids);
    }

    Ok(())
}

fn observations() -> PolarsResult<DataFrame> {
    let readings = [
        ("01048", 1934, 273.65),
        ("01051", 1940, 267.65),
        ("01048", 1940, 268.15),
        ("01050", 1950, 270.45),
        ("01051", 1950, 271.15),
        ("03811", 1950, 270.95),
        ("01048", 1950, 269.65),
    ];
    let millis: Vec<i64> = readings
        .iter()
        .map(|(_, year, _)| {
            Utc.with_ymd_and_hms(*year, 1, 1, 0, 0, 0)
                .unwrap()
                .timestamp_millis()
        })
        .collect();
    let dates = Series::new("date".into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

    DataFrame::new(vec![
        Column::new(
            "station_id".into(),
            readings.iter().map(|(id, _, _)| *id).collect::<Vec<_>>(),
        ),
        dates.into(),
        Column::new(
            "parameter".into(),
            vec![Parameter::TEMPERATURE_AIR_MEAN_200.as_str(); readings.len()],
        ),
        Column::new(
            "value".into(),
            readings.iter().map(|(_, _, v)| *v).collect::<Vec<f64>>(),
        ),
    ])
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
