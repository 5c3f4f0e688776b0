//! Find the nearest cities to a point near the antimeridian.
use atlas_nearby::prelude::*;

fn main() {
    // (name, longitude, latitude), whole degrees
    let cities = [
        ("Suva", 178, -18),
        ("Apia", -172, -14),
        ("Nuku'alofa", -175, -21),
        ("Auckland", 175, -37),
        ("Honolulu", -158, 21),
    ];

    let mut tree = HilbertRTreeI32::with_capacity(cities.len());
    for &(_, lon, lat) in &cities {
        tree.add(lon, lat, lon, lat);
    }
    tree.build();

    let query = Rect::point(-179, -17);
    let mut results = Vec::new();

    tree.query_nearest_k(query, 3, false, &mut results);
    let flat: Vec<&str> = results.iter().map(|&id| cities[id].0).collect();
    println!("Flat map:  {:?}", flat);

    tree.query_nearest_k(query, 3, true, &mut results);
    let wrapped: Vec<&str> = results.iter().map(|&id| cities[id].0).collect();
    println!("Wrapped:   {:?}", wrapped);

    assert_eq!(wrapped[0], "Suva", "Suva is 3 degrees away across the antimeridian");
    assert_ne!(flat[0], "Suva");
}
