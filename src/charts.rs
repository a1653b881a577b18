// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chart generation for drink log statistics.

use crate::{model::DrinkType, series::DailyEntry, trend::TrendSeries};
use anyhow::{Context, Result};
use camino::Utf8Path;
use chrono::{Duration, NaiveDate};
use plotters::coord::types::RangedCoordi64;
use plotters::prelude::*;

const CHART_WIDTH: u32 = 1600;
const CHART_HEIGHT: u32 = 900;

// Typography - Inter font family
const FONT_FAMILY: &str = "Inter";
const TITLE_SIZE: i32 = 24;
const LABEL_SIZE: i32 = 16;
const AXIS_SIZE: i32 = 14;

// Colors
const BACKGROUND: RGBColor = RGBColor(250, 250, 252); // Off-white
const TEXT_PRIMARY: RGBColor = RGBColor(15, 23, 42); // Slate 900
const TEXT_SECONDARY: RGBColor = RGBColor(100, 116, 139); // Slate 500
const GRID_COLOR: RGBColor = RGBColor(226, 232, 240); // Slate 200
const ACCENT_AMBER: RGBColor = RGBColor(245, 158, 11); // Amber 500

/// Fill color for a drink type's stack segment.
fn type_color(drink_type: DrinkType) -> RGBColor {
    match drink_type {
        DrinkType::Beer => RGBColor(245, 158, 11),      // Amber
        DrinkType::Seltzer => RGBColor(56, 189, 248),   // Sky
        DrinkType::Wine => RGBColor(190, 18, 60),       // Rose
        DrinkType::Cocktail => RGBColor(236, 72, 153),  // Pink
        DrinkType::Shot => RGBColor(99, 102, 241),      // Indigo
        DrinkType::Spirit => RGBColor(120, 53, 15),     // Brown
        DrinkType::Other => RGBColor(156, 163, 175),    // Gray
    }
}

/// Render the daily and trend charts for one user into `output_dir`.
pub fn generate_charts(
    user: &str,
    series: &[DailyEntry],
    trend: &TrendSeries,
    output_dir: &Utf8Path,
) -> Result<()> {
    std::fs::create_dir_all(output_dir.as_std_path())
        .with_context(|| format!("failed to create output directory at {}", output_dir))?;

    println!("\nGenerating charts...");

    generate_daily(user, series, &output_dir.join("daily.png"))?;
    generate_trend(user, trend, &output_dir.join("trend.png"))?;

    println!("  Charts saved to {}", output_dir);
    Ok(())
}

/// Create a styled drawing area with background.
fn create_drawing_area(
    output_path: &Utf8Path,
) -> Result<DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>> {
    let root = BitMapBackend::new(output_path.as_std_path(), (CHART_WIDTH, CHART_HEIGHT))
        .into_drawing_area();
    root.fill(&BACKGROUND)?;
    Ok(root)
}

/// Generate the drinks-per-day chart (area + line).
fn generate_daily(user: &str, series: &[DailyEntry], output_path: &Utf8Path) -> Result<()> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Ok(());
    };

    let data: Vec<(NaiveDate, i64)> = series
        .iter()
        .map(|d| (d.date.date(), d.count as i64))
        .collect();

    let min_date = first.date.date();
    // A one-day window still needs a non-empty x range.
    let max_date = last.date.date().max(min_date + Duration::days(1));
    let max_count = data.iter().map(|(_, c)| *c).max().unwrap_or(0) + 1;

    let root = create_drawing_area(output_path)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Drinks per Day - {}", user),
            (FONT_FAMILY, TITLE_SIZE).into_font().color(&TEXT_PRIMARY),
        )
        .margin(60)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(min_date..max_date, 0i64..max_count)?;

    configure_date_mesh(&mut chart)?;

    chart.draw_series(AreaSeries::new(
        data.iter().copied(),
        0,
        ACCENT_AMBER.mix(0.15),
    ))?;

    chart.draw_series(LineSeries::new(
        data.iter().copied(),
        ShapeStyle {
            color: ACCENT_AMBER.to_rgba(),
            filled: true,
            stroke_width: 3,
        },
    ))?;

    root.present()?;
    println!("  • daily.png");
    Ok(())
}

/// Configure common mesh styling for date-based charts.
fn configure_date_mesh<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<RangedDate<NaiveDate>, RangedCoordi64>>,
) -> Result<()>
where
    <DB as DrawingBackend>::ErrorType: 'static,
{
    chart
        .configure_mesh()
        .bold_line_style(&GRID_COLOR.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .x_labels(8)
        .y_labels(6)
        .x_label_style((FONT_FAMILY, AXIS_SIZE).into_font().color(&TEXT_SECONDARY))
        .y_label_style((FONT_FAMILY, AXIS_SIZE).into_font().color(&TEXT_SECONDARY))
        .x_label_formatter(&|date| date.format("%b %-d").to_string())
        .disable_x_mesh()
        .draw()?;
    Ok(())
}

/// Generate the stacked trend chart, one bar per bucket.
fn generate_trend(user: &str, trend: &TrendSeries, output_path: &Utf8Path) -> Result<()> {
    if trend.buckets.is_empty() {
        return Ok(());
    }

    let root = create_drawing_area(output_path)?;

    let bucket_count = trend.buckets.len() as i32;
    let max_total = trend.max_total() as i64 + 1;
    let labels: Vec<String> = trend.buckets.iter().map(|b| b.label.clone()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Drink Trend - {} ({}-day buckets)", user, trend.bucket_days),
            (FONT_FAMILY, TITLE_SIZE).into_font().color(&TEXT_PRIMARY),
        )
        .margin(60)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(0i32..bucket_count, 0i64..max_total)?;

    chart
        .configure_mesh()
        .bold_line_style(&GRID_COLOR.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .x_labels(labels.len().min(16))
        .y_labels(6)
        .x_label_style((FONT_FAMILY, AXIS_SIZE).into_font().color(&TEXT_SECONDARY))
        .y_label_style((FONT_FAMILY, AXIS_SIZE).into_font().color(&TEXT_SECONDARY))
        .x_label_formatter(&|idx| {
            usize::try_from(*idx)
                .ok()
                .and_then(|i| labels.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .disable_x_mesh()
        .draw()?;

    // Stack segments bottom-up in the shared type order.
    for drink_type in &trend.type_order {
        let color = type_color(*drink_type);
        let segments = trend.buckets.iter().enumerate().filter_map(|(idx, bucket)| {
            let stack = trend.stack(bucket);
            let below: usize = stack
                .iter()
                .take_while(|(t, _)| t != drink_type)
                .map(|(_, n)| n)
                .sum();
            let count = bucket.count(*drink_type);
            (count > 0).then(|| {
                let x = idx as i32;
                Rectangle::new(
                    [(x, below as i64), (x + 1, (below + count) as i64)],
                    color.filled(),
                )
            })
        });

        chart
            .draw_series(segments)?
            .label(drink_type.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .label_font((FONT_FAMILY, LABEL_SIZE).into_font().color(&TEXT_PRIMARY))
        .background_style(&BACKGROUND)
        .border_style(&GRID_COLOR)
        .margin(15)
        .draw()?;

    root.present()?;
    println!("  • trend.png");
    Ok(())
}
