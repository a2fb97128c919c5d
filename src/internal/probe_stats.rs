#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! Measures probe chain lengths of `HashTable` at increasing load, with and
//! without delete churn, and plots them.

use std::collections::HashSet;

use openmap::HashTable;
use plotters::prelude::*;
use rand::{Rng, seq::SliceRandom};

// Table size used for every measurement
const TABLE_SIZE: usize = 1 << 16;
// Load factors from 0.05 to 0.5 in 10 steps
const NUM_LOAD_FACTORS: usize = 10;
const MAX_LOAD: f64 = 0.5;
// Fraction of keys deleted and replaced by fresh ones in the churn runs
const CHURN_RATIO: f64 = 0.3;
// Lookups of keys that were never inserted
const MISSES: usize = 10_000;

/// Probe statistics for one table state
#[derive(Debug, Clone, Copy, Default)]
struct Stats {
    avg_hit: f64,
    avg_miss: f64,
    worst_hit: usize,
    tombstones: usize,
}

fn fill(keys: &[u64]) -> HashTable<u64, u64> {
    let mut table = HashTable::with_capacity(TABLE_SIZE);
    for &key in keys {
        table.put(key, key);
    }
    table
}

fn measure(table: &HashTable<u64, u64>, live: &[u64], misses: &[u64]) -> Stats {
    let hits: Vec<usize> = live.iter().map(|key| table.probe_count(key)).collect();
    let miss_total: usize = misses.iter().map(|key| table.probe_count(key)).sum();

    Stats {
        avg_hit: hits.iter().sum::<usize>() as f64 / hits.len().max(1) as f64,
        avg_miss: miss_total as f64 / misses.len().max(1) as f64,
        worst_hit: hits.iter().copied().max().unwrap_or(0),
        tombstones: table.tombstones(),
    }
}

/// Deletes a share of `keys` and inserts as many fresh ones, returning the live keys
fn churn(table: &mut HashTable<u64, u64>, keys: &[u64], rng: &mut impl Rng) -> Vec<u64> {
    let mut live = keys.to_vec();
    live.shuffle(rng);
    let removed = (live.len() as f64 * CHURN_RATIO) as usize;
    let victims: Vec<u64> = live.drain(..removed).collect();

    let mut known: HashSet<u64> = keys.iter().copied().collect();
    for key in victims {
        table.delete(&key);
        let mut fresh = rng.random::<u64>();
        while !known.insert(fresh) {
            fresh = rng.random::<u64>();
        }
        table.put(fresh, fresh);
        live.push(fresh);
    }
    live
}

fn pick(stats: &[Stats], f: fn(&Stats) -> f64) -> Vec<f64> {
    stats.iter().map(f).collect()
}

fn draw(
    path: &str,
    caption: &str,
    y_desc: &str,
    load_factors: &[f64],
    series: &[(&str, Vec<f64>, RGBColor)],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series.iter().flat_map(|(_, values, _)| values.iter().copied()).fold(0.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..MAX_LOAD, 0.0..max_y.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for (label, values, color) in series {
        let line_style = ShapeStyle::from(color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                load_factors.iter().copied().zip(values.iter().copied()),
                line_style,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            load_factors
                .iter()
                .copied()
                .zip(values.iter().copied())
                .map(|point| Circle::new(point, 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let load_factors: Vec<f64> = (1..=NUM_LOAD_FACTORS)
        .map(|i| MAX_LOAD * i as f64 / NUM_LOAD_FACTORS as f64)
        .collect();

    let mut rng = rand::rng();
    let max_keys = (TABLE_SIZE as f64 * MAX_LOAD) as usize;

    // Distinct random keys, plus keys that are guaranteed to be absent
    let mut seen = HashSet::with_capacity(max_keys + MISSES);
    let mut keys = Vec::with_capacity(max_keys);
    while keys.len() < max_keys {
        let key = rng.random::<u64>();
        if seen.insert(key) {
            keys.push(key);
        }
    }
    let mut misses = Vec::with_capacity(MISSES);
    while misses.len() < MISSES {
        let key = rng.random::<u64>();
        if seen.insert(key) {
            misses.push(key);
        }
    }

    let mut fresh_stats = Vec::with_capacity(NUM_LOAD_FACTORS);
    let mut churn_stats = Vec::with_capacity(NUM_LOAD_FACTORS);

    for &load in &load_factors {
        let n_keys = (TABLE_SIZE as f64 * load) as usize;
        let inserted = keys.get(..n_keys).unwrap_or(&keys);

        let mut table = fill(inserted);
        let fresh = measure(&table, inserted, &misses);
        let live = churn(&mut table, inserted, &mut rng);
        let churned = measure(&table, &live, &misses);

        println!(
            "load {load:.2} ({n_keys} keys): fresh avg hit {:.2} / miss {:.2} / worst {}, churned avg hit {:.2} / miss {:.2} / worst {} with {} tombstones",
            fresh.avg_hit,
            fresh.avg_miss,
            fresh.worst_hit,
            churned.avg_hit,
            churned.avg_miss,
            churned.worst_hit,
            churned.tombstones,
        );

        fresh_stats.push(fresh);
        churn_stats.push(churned);
    }

    draw(
        "average_probes.png",
        "Average Probe Length of Linear Probing",
        "Slots visited per lookup",
        &load_factors,
        &[
            ("Hit, fresh table", pick(&fresh_stats, |s| s.avg_hit), RGBColor(50, 90, 220)),
            ("Miss, fresh table", pick(&fresh_stats, |s| s.avg_miss), RGBColor(220, 50, 50)),
            ("Hit, after churn", pick(&churn_stats, |s| s.avg_hit), RGBColor(50, 180, 50)),
            ("Miss, after churn", pick(&churn_stats, |s| s.avg_miss), RGBColor(180, 50, 180)),
        ],
    )?;

    draw(
        "worst_case_probes.png",
        "Worst-Case Probe Length of Linear Probing",
        "Slots visited by the longest lookup",
        &load_factors,
        &[
            ("Fresh table", pick(&fresh_stats, |s| s.worst_hit as f64), RGBColor(50, 90, 220)),
            ("After churn", pick(&churn_stats, |s| s.worst_hit as f64), RGBColor(220, 50, 50)),
        ],
    )?;

    println!("Generated plot images: average_probes.png, worst_case_probes.png");

    Ok(())
}
