use coexp_rs::heatmap::HeatmapMatrix;
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::error::Error;
use std::path::{Path, PathBuf};

const CELL_WIDTH: i32 = 64;
const CELL_HEIGHT: i32 = 24;
const MARGIN: i32 = 20;
const CHAR_WIDTH: i32 = 7;
const COLOR_BAR_WIDTH: i32 = 18;
const COLOR_BAR_STEPS: i32 = 64;
const FONT_SIZE: f64 = 12.0;
const FONT_PX: i32 = 12;

/// Image format picked from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

/// Chooses the image format and final path for a requested output path.
/// `.png` is kept, everything else is written as `.svg`.
pub fn resolve_output(path: &Path) -> (ImageFormat, PathBuf) {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "png" => (ImageFormat::Png, path.to_path_buf()),
        "svg" => (ImageFormat::Svg, path.to_path_buf()),
        _ => (ImageFormat::Svg, path.with_extension("svg")),
    }
}

/// Maps a value scaled to [-1, 1] onto a blue-white-red scale
fn diverging_color(t: f64) -> RGBColor {
    if t.is_nan() {
        return RGBColor(190, 190, 190);
    }
    let t = t.clamp(-1.0, 1.0);
    let fade = |amount: f64| (255.0 * (1.0 - amount)).round() as u8;
    if t >= 0.0 {
        RGBColor(255, fade(t), fade(t))
    } else {
        RGBColor(fade(-t), fade(-t), 255)
    }
}

/// Largest absolute finite value, the half-width of the color scale
fn color_limit(matrix: &HeatmapMatrix) -> f64 {
    let limit = matrix
        .values
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if limit > 0.0 {
        limit
    } else {
        1.0
    }
}

fn longest(labels: &[String]) -> i32 {
    labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32
}

/// Pixel size of the image needed for the matrix
fn canvas_size(matrix: &HeatmapMatrix) -> (u32, u32) {
    let (rows, cols) = matrix.values.dim();
    let left = MARGIN + longest(&matrix.gene_names) * CHAR_WIDTH;
    let bottom = MARGIN + longest(&matrix.group_labels()) * CHAR_WIDTH;
    let width = left + cols as i32 * CELL_WIDTH + 6 * MARGIN + COLOR_BAR_WIDTH;
    let height = MARGIN + (rows as i32 * CELL_HEIGHT).max(120) + bottom;
    (width as u32, height as u32)
}

fn paint<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    matrix: &HeatmapMatrix,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (rows, cols) = matrix.values.dim();
    let left = MARGIN + longest(&matrix.gene_names) * CHAR_WIDTH;
    let top = MARGIN;
    let limit = color_limit(matrix);

    let centered = ("sans-serif", FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let right_aligned = ("sans-serif", FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    let rotated = ("sans-serif", FONT_SIZE)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK);

    for row in 0..rows {
        let y0 = top + row as i32 * CELL_HEIGHT;
        for col in 0..cols {
            let x0 = left + col as i32 * CELL_WIDTH;
            let corners = [(x0, y0), (x0 + CELL_WIDTH, y0 + CELL_HEIGHT)];
            let value = matrix.values[[row, col]];

            root.draw(&Rectangle::new(corners, diverging_color(value / limit).filled()))?;
            root.draw(&Rectangle::new(corners, WHITE.stroke_width(1)))?;
            root.draw(&Text::new(
                format!("{:.2}", value),
                (x0 + CELL_WIDTH / 2, y0 + CELL_HEIGHT / 2),
                centered.clone(),
            ))?;
        }
        root.draw(&Text::new(
            matrix.gene_names[row].clone(),
            (left - 6, y0 + CELL_HEIGHT / 2),
            right_aligned.clone(),
        ))?;
    }

    let grid_bottom = top + rows as i32 * CELL_HEIGHT;
    for (col, label) in matrix.group_labels().into_iter().enumerate() {
        let x = left + col as i32 * CELL_WIDTH + CELL_WIDTH / 2 + FONT_PX / 2;
        root.draw(&Text::new(label, (x, grid_bottom + 6), rotated.clone()))?;
    }

    // color bar
    let bar_left = left + cols as i32 * CELL_WIDTH + 2 * MARGIN;
    let bar_height = (rows as i32 * CELL_HEIGHT).max(120);
    let step = bar_height as f64 / COLOR_BAR_STEPS as f64;
    for i in 0..COLOR_BAR_STEPS {
        let t = 1.0 - 2.0 * (i as f64 + 0.5) / COLOR_BAR_STEPS as f64;
        let y0 = top + (i as f64 * step).floor() as i32;
        let y1 = top + ((i + 1) as f64 * step).ceil() as i32;
        root.draw(&Rectangle::new(
            [(bar_left, y0), (bar_left + COLOR_BAR_WIDTH, y1)],
            diverging_color(t).filled(),
        ))?;
    }

    let tick = ("sans-serif", FONT_SIZE - 2.0).into_font().color(&BLACK);
    root.draw(&Text::new(
        format!("{:.2}", limit),
        (bar_left + COLOR_BAR_WIDTH + 4, top),
        tick.clone(),
    ))?;
    root.draw(&Text::new(
        format!("{:.2}", -limit),
        (bar_left + COLOR_BAR_WIDTH + 4, top + bar_height - FONT_PX),
        tick,
    ))?;

    let title = if matrix.zscored {
        "gene expression z-scores"
    } else {
        "gene expression"
    };
    root.draw(&Text::new(
        title,
        (bar_left + COLOR_BAR_WIDTH + 2 * MARGIN, top),
        rotated,
    ))?;

    root.present()?;
    Ok(())
}

/// Renders the heatmap to `path`, picking PNG or SVG from the extension.
///
/// # Returns
/// * `Result<PathBuf, Box<dyn Error>>` - The file actually written
pub fn draw_heatmap(matrix: &HeatmapMatrix, path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let (format, output) = resolve_output(path);
    let size = canvas_size(matrix);

    match format {
        ImageFormat::Png => paint(&BitMapBackend::new(&output, size).into_drawing_area(), matrix)?,
        ImageFormat::Svg => paint(&SVGBackend::new(&output, size).into_drawing_area(), matrix)?,
    }

    info!("Heatmap saved to {}", output.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output() {
        assert_eq!(
            resolve_output(Path::new("out/map.png")),
            (ImageFormat::Png, PathBuf::from("out/map.png"))
        );
        assert_eq!(
            resolve_output(Path::new("out/map.SVG")),
            (ImageFormat::Svg, PathBuf::from("out/map.SVG"))
        );
        assert_eq!(
            resolve_output(Path::new("out/map.pdf")),
            (ImageFormat::Svg, PathBuf::from("out/map.svg"))
        );
    }

    fn rgb(color: RGBColor) -> (u8, u8, u8) {
        let RGBColor(r, g, b) = color;
        (r, g, b)
    }

    #[test]
    fn test_diverging_color() {
        assert_eq!(rgb(diverging_color(0.0)), (255, 255, 255));
        assert_eq!(rgb(diverging_color(1.0)), (255, 0, 0));
        assert_eq!(rgb(diverging_color(-1.0)), (0, 0, 255));
        // clamped beyond the scale
        assert_eq!(rgb(diverging_color(5.0)), (255, 0, 0));
        assert_eq!(rgb(diverging_color(f64::NAN)), (190, 190, 190));
    }
}
