use std::error::Error;
use std::io::Read;

use aligned_timeseries::codec::{self, Column};
use aligned_timeseries::time::Duration;

/// Reads a CSV table from the file given as the first argument (or stdin),
/// interpolates every column onto a regular grid of the step given in seconds
/// as the second argument (60 by default) and prints the result.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let text = match args.next() {
        Some(path) if path != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    let step = match args.next() {
        Some(seconds) => Duration::seconds(seconds.parse()?),
        None => Duration::minutes(1),
    };

    let columns: Vec<Column<f64>> = codec::read_columns(&text)?
        .into_iter()
        .map(|column| {
            log::info!("{}: {} samples", column.name, column.series.len());
            Column::new(column.name, column.series.interpolate(step))
        })
        .collect();

    print!("{}", codec::write_columns(&columns)?);
    Ok(())
}
