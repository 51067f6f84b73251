use std::fmt::{self, Write};

const WIDTH: usize = 41;
const HEIGHT: usize = 17;

/// Renders a polyline in the unit square as a character grid.
///
/// Segments between consecutive points are sampled densely so steps show up
/// as connected lines.
pub fn unit_square_chart(
    out: &mut impl Write,
    points: &[(f64, f64)],
    x_label: &str,
    y_label: &str,
) -> fmt::Result {
    let mut grid = vec![vec![' '; WIDTH]; HEIGHT];
    let cell = |v: f64, cells: usize| -> usize {
        let scaled = (v.clamp(0.0, 1.0) * (cells - 1) as f64).round();
        scaled as usize
    };

    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let steps = WIDTH.max(HEIGHT) * 2;
        for s in 0..=steps {
            let t = s as f64 / steps as f64;
            let (x, y) = (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
            grid[HEIGHT - 1 - cell(y, HEIGHT)][cell(x, WIDTH)] = '*';
        }
    }
    if let [(x, y)] = points {
        grid[HEIGHT - 1 - cell(*y, HEIGHT)][cell(*x, WIDTH)] = '*';
    }

    writeln!(out, "{y_label}")?;
    for (r, row) in grid.iter().enumerate() {
        let tick = match r {
            0 => "1.0",
            r if r == HEIGHT / 2 => "0.5",
            r if r == HEIGHT - 1 => "0.0",
            _ => "",
        };
        writeln!(out, "{tick:>4} |{}", row.iter().collect::<String>())?;
    }
    writeln!(out, "     +{}", "-".repeat(WIDTH))?;
    writeln!(
        out,
        "      0.0{:^w$}1.0",
        "0.5",
        w = WIDTH - 6
    )?;
    write!(out, "      {x_label:^w$}", w = WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_corners_of_a_diagonal() {
        let mut s = String::new();
        unit_square_chart(&mut s, &[(0.0, 0.0), (1.0, 1.0)], "x", "y").unwrap();
        let rows: Vec<&str> = s.lines().collect();
        // label, HEIGHT grid rows, axis, ticks, x label
        assert_eq!(rows.len(), 1 + HEIGHT + 3);
        assert!(rows[1].ends_with('*'));
        assert_eq!(rows[HEIGHT].chars().nth(6), Some('*'));
    }
}
