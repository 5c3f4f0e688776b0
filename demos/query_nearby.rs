//! Walk boxes nearest first and stop after a distance threshold.
use atlas_nearby::prelude::*;

fn main() {
    let mut tree = HilbertRTreeI32::with_capacity(5);
    tree.add(0, 0, 1, 1); // Box 0
    tree.add(2, 2, 3, 3); // Box 1
    tree.add(4, 4, 5, 5); // Box 2
    tree.add(6, 6, 7, 7); // Box 3
    tree.add(20, 20, 21, 21); // Box 4
    tree.build();

    let query = Rect::new([2, 2], [4, 4]);
    let mut within = Vec::new();
    tree.nearby(&BoxDistance::new(query), |_, id, dist| {
        if dist > 25 {
            return false;
        }
        within.push((id, dist));
        true
    });
    println!("Within squared distance 25 of {:?}: {:?}", query, within);

    // Boxes 1 and 2 touch the query, box 0 is 1 away on each axis, box 3 is 2
    assert_eq!(within.len(), 4, "Expected 4 boxes within range");
    assert!(within[..2].iter().all(|&(_, d)| d == 0));
    assert_eq!(within[2], (0, 2));
    assert_eq!(within[3], (3, 8));
}
