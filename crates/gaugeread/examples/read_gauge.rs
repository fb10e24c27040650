use gaugeread::{GaugeReader, ValueRange};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <image.png> <min_value> <max_value> [out.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let min_value: f64 = args[2].parse()?;
    let max_value: f64 = args[3].parse()?;
    let reader = GaugeReader::new(ValueRange::new(min_value, max_value));
    let reading = reader.read_path(Path::new(&args[1]))?;

    println!(
        "Value {:.3} (needle {:.1} deg, scale [{:.1}, {:.1}], {:?})",
        reading.value,
        reading.needle_angle,
        reading.angle_range.min_angle,
        reading.angle_range.max_angle,
        reading.range_source
    );

    if let Some(out_path) = args.get(4) {
        let json = serde_json::to_string_pretty(&reading)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
