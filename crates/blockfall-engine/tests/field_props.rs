use blockfall_engine::{Field, LineScan, ShapeMatrix, scan_and_clear};
use proptest::{collection::vec, prelude::*};

/// A field with random playable cells and a shape that fits its border.
#[derive(Debug, Clone)]
struct Scenario {
    field: Field,
    shape: ShapeMatrix,
}

fn field_from_cells(width: usize, height: usize, border: usize, rows: &[Vec<bool>]) -> Field {
    // `rows` lists open rows bottom first; the art is top first.
    let art = rows
        .iter()
        .rev()
        .map(|row| row.iter().map(|&c| if c { '#' } else { '.' }).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");
    Field::from_ascii(width, height, border, &art)
}

fn shape_from_cells(size: usize, cells: &[bool], max_size: usize) -> ShapeMatrix {
    let rows = cells
        .chunks(size)
        .map(|row| row.iter().map(|&c| if c { '1' } else { '0' }).collect::<String>())
        .collect::<Vec<_>>();
    ShapeMatrix::from_rows(rows.as_slice(), max_size).unwrap()
}

fn shape_strategy(max_size: usize) -> impl Strategy<Value = ShapeMatrix> {
    (2..=max_size).prop_flat_map(move |size| {
        vec(any::<bool>(), size * size)
            .prop_filter("shape needs an occupied cell", |cells| cells.iter().any(|&c| c))
            .prop_map(move |cells| shape_from_cells(size, &cells, max_size))
    })
}

fn scenario_strategy() -> impl Strategy<Value = Scenario> {
    (1usize..8, 1usize..8, 2usize..5).prop_flat_map(|(width, height, border)| {
        let open_rows = height + border - 1;
        // Bias towards dense rows so that full rows show up.
        let row = vec(prop::bool::weighted(0.8), width);
        (vec(row, open_rows), shape_strategy(border)).prop_map(move |(rows, shape)| Scenario {
            field: field_from_cells(width, height, border, &rows),
            shape,
        })
    })
}

/// A scenario and a placement anywhere in or slightly outside its grid.
fn placed_scenario_strategy() -> impl Strategy<Value = (Scenario, i32, i32)> {
    scenario_strategy().prop_flat_map(|scenario| {
        let total_width = coord(scenario.field.total_width());
        let total_height = coord(scenario.field.total_height());
        (
            Just(scenario),
            -3..total_width + 3,
            -3..total_height + 3,
        )
    })
}

fn coord(v: usize) -> i32 {
    i32::try_from(v).unwrap()
}

fn brute_force_overlap(field: &Field, shape: &ShapeMatrix, x: i32, y: i32) -> bool {
    let size = shape.size();
    (0..size).any(|row| {
        (0..size).any(|col| {
            shape.is_occupied(col, row) && field.is_occupied(x + coord(col), y - coord(row))
        })
    })
}

fn full_rows(field: &Field) -> Vec<i32> {
    (1..coord(field.total_height()))
        .filter(|&y| field.is_row_full(y))
        .collect()
}

fn assert_sentinels(field: &Field) {
    let total_width = coord(field.total_width());
    let border = coord(field.border());
    let width = coord(field.width());
    for x in 0..total_width {
        assert!(field.is_occupied(x, 0));
    }
    for y in 0..coord(field.total_height()) {
        for x in (0..border).chain(border + width..total_width) {
            assert!(field.is_occupied(x, y));
        }
    }
}

proptest! {
    #[test]
    fn check_overlap_matches_brute_force((scenario, x, y) in placed_scenario_strategy()) {
        let Scenario { field, shape } = scenario;
        prop_assert_eq!(
            field.check_overlap(&shape, x, y),
            brute_force_overlap(&field, &shape, x, y)
        );
    }

    #[test]
    fn commit_then_overlap(scenario in scenario_strategy()) {
        let Scenario { mut field, shape } = scenario;
        let free = (0..coord(field.total_height()))
            .flat_map(|y| (0..coord(field.total_width())).map(move |x| (x, y)))
            .find(|&(x, y)| !field.check_overlap(&shape, x, y));
        if let Some((x, y)) = free {
            field.commit(&shape, x, y);
            prop_assert!(field.check_overlap(&shape, x, y));
            for (col, row) in shape.occupied_cells() {
                prop_assert!(field.is_occupied(x + coord(col), y - coord(row)));
            }
            assert_sentinels(&field);
        }
    }

    #[test]
    fn full_scan_removes_every_full_row(scenario in scenario_strategy()) {
        let Scenario { mut field, .. } = scenario;
        let before_full = full_rows(&field).len();
        let before_cells = field.occupied_playable_cells().count();

        let total_height = field.total_height();
        let cleared = scan_and_clear(&mut field, 1, total_height);

        prop_assert!(full_rows(&field).is_empty());
        prop_assert_eq!(cleared, before_full);
        prop_assert_eq!(
            field.occupied_playable_cells().count(),
            before_cells - cleared * field.width()
        );
        assert_sentinels(&field);
    }

    #[test]
    fn incremental_scan_matches_full_scan(scenario in scenario_strategy()) {
        let Scenario { field, .. } = scenario;
        let mut expected = field.clone();
        let cleared = scan_and_clear(&mut expected, 1, field.total_height());

        let mut actual = field.clone();
        let mut scan = LineScan::new(&actual, 1, actual.total_height());
        let mut collapses = 0;
        while let Some(collapse) = scan.next_collapse(&mut actual) {
            collapses += 1;
            // Each shifted cell moved down by one into the row below it.
            for cell in &collapse.shifted {
                prop_assert!(cell.from_y > collapse.y);
                prop_assert_eq!(cell.to_y, cell.from_y - 1);
                prop_assert!(actual.is_occupied(cell.x, cell.to_y));
            }
        }
        prop_assert!(scan.is_finished());
        prop_assert_eq!(collapses, cleared);
        prop_assert_eq!(scan.cleared(), cleared);
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn four_rotations_are_identity(shape in shape_strategy(5)) {
        let rotated = shape
            .rotated_clockwise()
            .rotated_clockwise()
            .rotated_clockwise()
            .rotated_clockwise();
        prop_assert_eq!(
            shape.rotated_clockwise().occupied_cells().count(),
            shape.occupied_cells().count()
        );
        prop_assert_eq!(rotated, shape);
    }
}

#[test]
fn adjacent_full_rows_drop_everything_above_by_two() {
    let mut field = Field::from_ascii(
        4,
        6,
        3,
        "
        .#..
        #..#
        ####
        ####
        ..#.
        ",
    );
    assert_eq!(scan_and_clear(&mut field, 1, 5), 2);
    assert_eq!(
        field,
        Field::from_ascii(
            4,
            6,
            3,
            "
            .#..
            #..#
            ..#.
            ",
        )
    );
}
