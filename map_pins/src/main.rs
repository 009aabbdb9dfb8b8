// This file is an example of how to use the `map_pins` library.
// The main library entry point is `src/lib.rs`.

use map_pins::{ClusteringConfig, ClusteringPipeline, Coordinate, Point};

fn main() -> map_pins::Result<()> {
    println!("Map Pins - Example Runner");

    let points = vec![
        Point::new("krakow", Coordinate::new(19.9450, 50.0647)?),
        Point::new("krakow-kazimierz", Coordinate::new(19.9470, 50.0510)?),
        Point::new("warsaw", Coordinate::new(21.0122, 52.2297)?),
        Point::new("gdansk", Coordinate::new(18.6466, 54.3520)?),
    ];

    let pipeline = ClusteringPipeline::new(ClusteringConfig::default())?;
    for zoom in [3u8, 7, 12, 16] {
        let result = pipeline.cluster(&points, zoom)?;
        println!("zoom {zoom}:");
        for object in &result.objects {
            let c = object.coordinate();
            match object.identity() {
                Some(id) => println!("  point   {id:<18} ({:.4}, {:.4})", c.x(), c.y()),
                None if object.is_cluster() => {
                    println!("  cluster x{:<16} ({:.4}, {:.4})", object.member_count(), c.x(), c.y())
                }
                None => println!("  point   <unmatched>        ({:.4}, {:.4})", c.x(), c.y()),
            }
        }
    }
    Ok(())
}
