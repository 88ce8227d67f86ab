//! Bearing command - distance and initial bearing between two points.

use waypointer::geo::{great_circle, Coordinate, GreatCircle};

use crate::error::CliError;
use crate::OutputFormat;

/// Arguments for the bearing command.
pub struct BearingArgs {
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
    pub format: OutputFormat,
}

/// Run the bearing command.
pub fn run(args: BearingArgs) -> Result<(), CliError> {
    let route = compute(&args)?;

    match args.format {
        OutputFormat::Text => {
            println!("Distance: {:.0} m", route.distance_meters);
            println!("Bearing:  {:.1}°", route.bearing_degrees);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&route)?),
    }
    Ok(())
}

fn compute(args: &BearingArgs) -> Result<GreatCircle, CliError> {
    let from = Coordinate::new(args.from_lat, args.from_lon)?;
    let to = Coordinate::new(args.to_lat, args.to_lon)?;
    Ok(great_circle(from, to))
}
