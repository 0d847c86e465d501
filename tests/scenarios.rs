//! End-to-end scenarios exercising `SpatialIndex`, `Front` and `Archive`
//! together rather than in isolation.

use pareto_rs::{Archive, DirectionVector, Front, Point, SpatialIndex};

fn pt(coords: &[f64]) -> Point {
    Point::new(coords.to_vec())
}

#[test]
fn scenario_2d_front_minimize_maximize() {
    let mut f: Front<i32> = Front::with_directions(DirectionVector::new(vec![true, false]));
    f.insert(pt(&[0.68322, 0.545438]), 17).unwrap();
    f.insert(pt(&[-0.204484, 0.819538]), 8).unwrap();
    f.insert(pt(&[1.10158, 0.977164]), 36).unwrap();
    f.insert(pt(&[-2.01773, -1.25209]), 27).unwrap();

    assert_eq!(f.size(), 4);

    let ideal = f.ideal().unwrap();
    assert!((ideal.get(0) - (-2.01773)).abs() < 1e-6);
    assert!((ideal.get(1) - 0.977164).abs() < 1e-6);

    let nadir = f.nadir().unwrap();
    assert!((nadir.get(0) - 1.10158).abs() < 1e-6);
    assert!((nadir.get(1) - (-1.25209)).abs() < 1e-6);

    assert!(!f.dominates(&pt(&[1.0, 1.0])).unwrap());
    let singleton = Front::from_entries(DirectionVector::new(vec![true, false]), vec![(pt(&[1.0, 1.0]), 0)]).unwrap();
    assert!(!f.is_completely_dominated_by(&singleton).unwrap());
}

#[test]
fn scenario_pareto_rejection() {
    let mut f: Front<i32> = Front::with_directions(DirectionVector::all_minimize(2));
    assert!(f.insert(pt(&[1.0, 1.0]), 1).unwrap());
    assert!(!f.insert(pt(&[2.0, 2.0]), 2).unwrap());
    assert_eq!(f.size(), 1);
}

#[test]
fn scenario_pareto_eviction() {
    let mut f: Front<i32> = Front::with_directions(DirectionVector::all_minimize(2));
    f.insert(pt(&[2.0, 2.0]), 1).unwrap();
    f.insert(pt(&[3.0, 1.0]), 2).unwrap();
    f.insert(pt(&[1.0, 3.0]), 3).unwrap();
    assert_eq!(f.size(), 3);

    f.insert(pt(&[0.0, 0.0]), 4).unwrap();
    assert_eq!(f.size(), 1);
    assert!(f.contains(&pt(&[0.0, 0.0])).unwrap());
}

#[test]
fn scenario_nearest_in_2d() {
    let mut idx: SpatialIndex<&'static str> = SpatialIndex::new();
    idx.insert(pt(&[0.0, 0.0]), "a").unwrap();
    idx.insert(pt(&[1.0, 0.0]), "b").unwrap();
    idx.insert(pt(&[0.0, 1.0]), "c").unwrap();
    idx.insert(pt(&[5.0, 5.0]), "d").unwrap();

    let nearest = idx.find_nearest(&pt(&[0.4, 0.4]), 2).unwrap();
    assert_eq!(nearest.len(), 2);
    assert_eq!(nearest[0].0, &pt(&[0.0, 0.0]));
    // "b" and "c" are equidistant from (0.4, 0.4); the lexicographic tie-break
    // on coordinates picks (0, 1) before (1, 0).
    assert_eq!(nearest[1].0, &pt(&[0.0, 1.0]));

    // repeating the query must reproduce the exact same ordering.
    let nearest_again = idx.find_nearest(&pt(&[0.4, 0.4]), 2).unwrap();
    assert_eq!(nearest, nearest_again);
}

#[test]
fn scenario_archive_capacity() {
    let mut a: Archive<i32> = Archive::with_directions_and_capacity(DirectionVector::all_minimize(2), 3).unwrap();
    for (i, (x, y)) in [(0.0, 4.0), (1.0, 3.0), (2.0, 2.0), (3.0, 1.0), (4.0, 0.0)].into_iter().enumerate() {
        a.insert(pt(&[x, y]), i as i32).unwrap();
    }
    assert_eq!(a.len(), 3);
    // the two extreme (boundary) points of the curve always carry infinite
    // crowding distance and so are never the first evicted.
    assert!(a.contains(&pt(&[0.0, 4.0])));
    assert!(a.contains(&pt(&[4.0, 0.0])));
}

#[test]
fn scenario_hypervolume_2d() {
    let mut f: Front<()> = Front::with_directions(DirectionVector::all_minimize(2));
    f.insert(pt(&[1.0, 3.0]), ()).unwrap();
    f.insert(pt(&[2.0, 2.0]), ()).unwrap();
    f.insert(pt(&[3.0, 1.0]), ()).unwrap();

    let hv = f.hypervolume(Some(&pt(&[4.0, 4.0]))).unwrap();
    assert!((hv - 6.0).abs() < 1e-9);
}
