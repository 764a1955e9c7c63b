#[cfg(test)]
mod tests {
    use basin_fill::{Error, Grid, Options, Order, level_with, trapped_volume, water_surface};
    use ndarray::{Array2, array};

    fn volume(heights: Array2<u64>) -> u64 {
        trapped_volume(&Grid::new(heights)).unwrap()
    }

    #[test]
    fn test_single() {
        assert_eq!(volume(array![[1]]), 0);
    }

    #[test]
    fn test_no_interior() {
        assert_eq!(volume(array![[9, 0, 9, 9], [9, 9, 0, 9]]), 0);
        assert_eq!(volume(array![[9, 9], [9, 0], [9, 9], [0, 9]]), 0);
        assert_eq!(volume(Array2::zeros((1, 12))), 0);
    }

    #[test]
    fn test_single_cell_basin() {
        let heights = array![
            [4, 5, 4],
            [3, 1, 5],
            [5, 4, 1],
        ];
        assert_eq!(volume(heights.clone()), 2);
        assert_eq!(water_surface(&Grid::new(heights)).unwrap()[[1, 1]], 3);
    }

    #[test]
    fn test_four_cell_basin() {
        let heights = array![
            [5, 3, 4, 5],
            [6, 2, 1, 4],
            [3, 1, 1, 4],
            [8, 5, 4, 3],
        ];
        let grid = Grid::new(heights.clone());
        assert_eq!(trapped_volume(&grid).unwrap(), 7);

        let surface = water_surface(&grid).unwrap();
        let filled: Array2<u64> = array![
            [5, 3, 4, 5],
            [6, 3, 3, 4],
            [3, 3, 3, 4],
            [8, 5, 4, 3],
        ];
        assert_eq!(surface, filled);
    }

    #[test]
    fn test_no_pits() {
        assert_eq!(volume(array![[1, 2, 3], [4, 5, 6], [7, 8, 9]]), 0);
        assert_eq!(
            volume(array![
                [9, 9, 9, 9],
                [9, 5, 4, 3],
                [9, 6, 5, 9],
                [9, 9, 9, 9],
            ]),
            0
        );
    }

    #[test]
    fn test_flat() {
        assert_eq!(volume(Array2::from_elem((6, 5), 4)), 0);
    }

    #[test]
    fn test_pits_drain_through_shared_spill() {
        let heights = array![
            [10, 10, 10, 10, 10],
            [10, 2, 5, 1, 10],
            [10, 5, 5, 5, 6],
            [10, 3, 5, 4, 10],
            [10, 10, 10, 10, 10],
        ];
        let grid = Grid::new(heights);
        assert_eq!(trapped_volume(&grid).unwrap(), 19);
        let surface = water_surface(&grid).unwrap();
        assert!(surface.slice(ndarray::s![1..4, 1..4]).iter().all(|&h| h == 6));
    }

    #[test]
    fn test_separate_pits_fill_to_their_own_spill() {
        let heights = array![
            [9, 9, 9, 9, 9, 9],
            [9, 1, 9, 2, 2, 4],
            [9, 9, 9, 9, 9, 9],
        ];
        let grid = Grid::new(heights);
        assert_eq!(trapped_volume(&grid).unwrap(), 12);
        let surface = water_surface(&grid).unwrap();
        assert_eq!(surface.row(1).to_vec(), vec![9, 9, 9, 4, 4, 4]);
    }

    #[test]
    fn test_terrace_raises_in_steps() {
        // the pit has to climb over two inner rims before reaching the spill
        let heights = array![
            [9, 9, 9, 9, 9, 9, 9],
            [9, 8, 8, 8, 8, 8, 9],
            [9, 8, 6, 6, 6, 8, 9],
            [9, 8, 6, 1, 6, 8, 7],
            [9, 8, 6, 6, 6, 8, 9],
            [9, 8, 8, 8, 8, 8, 9],
            [9, 9, 9, 9, 9, 9, 9],
        ];
        let grid = Grid::new(heights);
        let options = Options {
            record_events: true,
            ..Options::default()
        };
        let report = level_with(&grid, &options).unwrap();
        // 16 rim cells at 8 gain nothing, 8 cells at 6 gain 2, the pit gains 7
        assert_eq!(report.volume, 8 * 2 + 7);
        assert_eq!(report.unequal_merges, 0);
        assert!(report.raises >= 2);
        assert_eq!(report.basins, 25);
    }

    #[test]
    fn test_order_does_not_matter() {
        let heights = array![
            [7, 7, 7, 7, 7, 7],
            [7, 3, 4, 3, 2, 7],
            [7, 4, 1, 4, 5, 7],
            [7, 2, 4, 6, 0, 5],
            [7, 7, 7, 7, 7, 7],
        ];
        let grid = Grid::new(heights);
        let expected = trapped_volume(&grid).unwrap();
        let orders = [
            Order::Reverse,
            Order::Shuffled(1),
            Order::Shuffled(42),
            Order::Shuffled(7),
        ];
        for order in orders {
            let options = Options {
                order,
                ..Options::default()
            };
            let report = level_with(&grid, &options).unwrap();
            assert_eq!(report.volume, expected, "{order:?}");
        }
    }

    #[test]
    fn test_volume_overflow_is_an_error() {
        let b = 10_000_000_000_000_000_000u64;
        let grid = Grid::new(array![[b, b, b, b], [b, 0, 0, b], [b, b, b, b]]);
        assert!(matches!(trapped_volume(&grid), Err(Error::VolumeOverflow { .. })));

        // a single cell at the same depth still fits
        let grid = Grid::new(array![[b, b, b], [b, 0, b], [b, b, b]]);
        assert_eq!(trapped_volume(&grid).unwrap(), b);
    }
}
