use super::bbox::BBox;

/// Find every pair `(i, j)` such that `a[i]` and `b[j]` have strictly
/// positive-area overlap (touching edges or corners don't count).
///
/// Sweeps a combined event list left to right. At each `x`, exits are
/// processed before entries so a box leaving exactly where another enters
/// never sees a stale neighbor.
pub fn sweep_overlap(a: &[BBox], b: &[BBox]) -> Vec<(usize, usize)> {
    #[derive(Clone, Copy)]
    enum Side {
        A,
        B,
    }

    struct Event {
        x: f64,
        exit: bool,
        side: Side,
        index: usize,
    }

    let mut events = Vec::with_capacity(2 * (a.len() + b.len()));
    for (i, bbox) in a.iter().enumerate() {
        events.push(Event { x: bbox.x0, exit: false, side: Side::A, index: i });
        events.push(Event { x: bbox.x1, exit: true, side: Side::A, index: i });
    }
    for (j, bbox) in b.iter().enumerate() {
        events.push(Event { x: bbox.x0, exit: false, side: Side::B, index: j });
        events.push(Event { x: bbox.x1, exit: true, side: Side::B, index: j });
    }

    events.sort_by(|p, q| {
        p.x.partial_cmp(&q.x)
            .unwrap()
            .then(p.exit.cmp(&q.exit).reverse())
    });

    let mut active_a: Vec<usize> = Vec::new();
    let mut active_b: Vec<usize> = Vec::new();
    let mut pairs = Vec::new();

    for ev in &events {
        match (ev.side, ev.exit) {
            (Side::A, false) => {
                let bbox = &a[ev.index];
                for &j in &active_b {
                    if y_overlaps(bbox, &b[j]) {
                        pairs.push((ev.index, j));
                    }
                }
                active_a.push(ev.index);
            }
            (Side::B, false) => {
                let bbox = &b[ev.index];
                for &i in &active_a {
                    if y_overlaps(&a[i], bbox) {
                        pairs.push((i, ev.index));
                    }
                }
                active_b.push(ev.index);
            }
            (Side::A, true) => {
                if let Some(pos) = active_a.iter().position(|&i| i == ev.index) {
                    active_a.remove(pos);
                }
            }
            (Side::B, true) => {
                if let Some(pos) = active_b.iter().position(|&j| j == ev.index) {
                    active_b.remove(pos);
                }
            }
        }
    }

    pairs
}

fn y_overlaps(a: &BBox, b: &BBox) -> bool {
    a.top < b.bottom && a.bottom > b.top
}

/// Brute-force O(nm) cross-check for [`sweep_overlap`]. Strict inequalities
/// on both axes, same as the sweep.
pub fn naive_overlap(a: &[BBox], b: &[BBox]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            if x.x0 < y.x1 && x.x1 > y.x0 && x.top < y.bottom && x.bottom > y.top {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn normalize(mut pairs: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bb(x0: f64, top: f64, x1: f64, bottom: f64) -> BBox {
        BBox::new(x0, top, x1, bottom)
    }

    #[test]
    fn agrees_with_naive_on_reference_scenario() {
        let a = vec![
            bb(1.0, 2.0, 3.0, 4.0),
            bb(3.0, 2.0, 4.0, 4.0),
            bb(4.0, 2.0, 6.0, 4.0),
            bb(2.0, 4.0, 5.0, 9.0),
        ];
        let b = vec![
            bb(1.2, 2.2, 2.8, 3.8),
            bb(6.0, 2.0, 8.0, 5.0),
            bb(8.0, 10.0, 10.0, 12.0),
            bb(1.4, 2.4, 6.0, 3.8),
        ];

        let sweep = normalize(sweep_overlap(&a, &b));
        let naive = normalize(naive_overlap(&a, &b));
        assert_eq!(sweep, naive);
        assert_eq!(sweep, vec![(0, 0), (0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn touching_edges_are_not_overlaps() {
        let a = vec![bb(0.0, 0.0, 10.0, 10.0)];
        let b = vec![bb(10.0, 0.0, 20.0, 10.0), bb(0.0, 10.0, 10.0, 20.0)];
        assert!(sweep_overlap(&a, &b).is_empty());
        assert!(naive_overlap(&a, &b).is_empty());
    }

    #[test]
    fn corner_touch_is_not_an_overlap() {
        let a = vec![bb(0.0, 0.0, 10.0, 10.0)];
        let b = vec![bb(10.0, 10.0, 20.0, 20.0)];
        assert!(sweep_overlap(&a, &b).is_empty());
    }

    #[test]
    fn agrees_with_naive_over_generated_cases() {
        // Deterministic linear-congruential generator so this stays
        // reproducible without depending on an external rng crate.
        let mut state: u64 = 88172645463325252;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        let mut gen_rect = |seed: &mut dyn FnMut() -> u64| -> BBox {
            let x0 = (seed() % 100) as f64;
            let y0 = (seed() % 100) as f64;
            let x1 = x0 + (seed() % 100) as f64;
            let y1 = y0 + (seed() % 100) as f64;
            bb(x0, y0, x1, y1)
        };

        let a: Vec<BBox> = (0..50).map(|_| gen_rect(&mut next)).collect();
        let b: Vec<BBox> = (0..50).map(|_| gen_rect(&mut next)).collect();

        assert_eq!(normalize(sweep_overlap(&a, &b)), normalize(naive_overlap(&a, &b)));
    }
}
