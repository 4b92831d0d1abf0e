//! Bar charts of bootstrap confidence intervals, one bar per summarized
//! metric, drawn with plotters onto a PNG. The rendering mirrors the
//! figures of the original analysis: light gray bars, black whiskers with
//! end caps, a dot on the interval center.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use std::error::Error;
use std::path::Path;

/// One bar of an interval chart.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalBar {
    /// Label drawn under the bar.
    pub label: String,
    /// Center of the interval (the bar height).
    pub center: f64,
    /// Half-width of the interval (the whisker length).
    pub half_width: f64,
}

/// The bar fill used throughout the study figures.
const BAR_COLOR: RGBColor = RGBColor(0xCC, 0xCC, 0xCC);

// The y range leaves one tenth below zero for the bar labels and a tenth
// of headroom above the tallest whisker.
fn y_range(bars: &[IntervalBar]) -> (f64, f64) {
    let mut top = bars
        .iter()
        .map(|b| b.center + b.half_width)
        .fold(0.0, f64::max);
    if !top.is_finite() || top <= 0.0 {
        top = 1.0;
    }
    (-0.1 * top, 1.1 * top)
}

/// Render `bars` to `path` as a PNG.
pub fn draw_interval_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    bars: &[IntervalBar],
) -> Result<(), Box<dyn Error>> {
    let (y_min, y_max) = y_range(bars);
    let n = bars.len() as f64;

    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..n, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(y_desc)
        .draw()?;

    // Baseline at zero; the labels live in the band below it.
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (n, 0.0)],
        BLACK.mix(0.5),
    )))?;

    let label_style = TextStyle::from(("sans-serif", 18).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    let cap = 0.08;

    for (i, bar) in bars.iter().enumerate() {
        let x = i as f64 + 0.5;
        let lo = bar.center - bar.half_width;
        let hi = bar.center + bar.half_width;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, 0.0), (x + 0.3, bar.center)],
            BAR_COLOR.filled(),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, lo), (x, hi)],
            BLACK.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x - cap, lo), (x + cap, lo)],
            BLACK.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x - cap, hi), (x + cap, hi)],
            BLACK.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(Circle::new((x, bar.center), 3, BLACK.filled())))?;
        chart.draw_series(std::iter::once(Text::new(
            bar.label.clone(),
            (x, y_min * 0.3),
            label_style.clone(),
        )))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(center: f64, half_width: f64) -> IntervalBar {
        IntervalBar {
            label: "bar".to_owned(),
            center,
            half_width,
        }
    }

    #[test]
    fn y_range_leaves_headroom() {
        let (lo, hi) = y_range(&[bar(10.0, 2.0), bar(5.0, 1.0)]);
        assert_eq!(lo, -1.2);
        assert_eq!(hi, 13.2);
    }

    #[test]
    fn degenerate_bars_still_give_a_usable_range() {
        let (lo, hi) = y_range(&[bar(0.0, 0.0)]);
        assert!(lo < 0.0 && hi > 0.0);
        let (lo, hi) = y_range(&[]);
        assert!(lo < 0.0 && hi > 0.0);
    }

    // Ignored by default: touches the font machinery and writes a file.
    #[test]
    #[ignore]
    fn renders_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        draw_interval_chart(
            &path,
            "TCT",
            "time (ms)",
            &[bar(120.0, 15.0), bar(300.0, 40.0)],
        )
        .unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
