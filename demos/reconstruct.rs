use clap::Parser;
use geojson::GeoJson;
use snapoly::io::{read_layer, to_feature_collection};
use snapoly::LayerProcessor;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GeoJSON file (Polygons / MultiPolygons with OSM attributes)
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON file (reconstructed polygons)
    #[arg(short, long)]
    output: PathBuf,

    /// Write coordinates in the source frame instead of the layer-normalized one
    #[arg(long, default_value_t = false)]
    restore_offset: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Read Input
    println!("Reading input from {:?}", args.input);
    let file = File::open(&args.input)?;
    let reader = BufReader::new(file);
    let geojson: GeoJson = serde_json::from_reader(reader)?;

    let name = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layer".to_string());
    let layer = read_layer(&name, &geojson)?;
    println!("Loaded {} polygons in layer '{}'.", layer.polygons.len(), name);

    let output = LayerProcessor::new()
        .with_restore_offset(args.restore_offset)
        .process(layer)?;

    println!(
        "Rebuilt {} polygons (layer offset {}, {}).",
        output.records.len(),
        output.offset.min_x,
        output.offset.min_y
    );

    // Write Output
    let file = File::create(&args.output)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &GeoJson::FeatureCollection(to_feature_collection(&output.records)))?;

    println!("Wrote output to {:?}", args.output);

    Ok(())
}
