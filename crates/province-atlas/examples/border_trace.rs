//! Example: trace province borders out of a map directory.
//!
//! Loads a definitions table and a 24-bpp province bitmap, extracts the
//! maximal border polylines, and writes them to a JSON file next to the
//! bitmap. Optionally renders a 2x-scale PNG overlay: province colors on
//! pixel centers, border polylines on the lattice between them.
//!
//! Run from the workspace root:
//!   cargo run -p province-atlas --example border_trace -- --help
//!   cargo run -p province-atlas --example border_trace -- \
//!       --definitions map/definition.csv --bitmap map/provinces.bmp

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgb as ImageRgb, RgbImage};
use province_atlas::{
    ColorIndex, DefinitionsTable, Edge, EdgeSet, IMPASSABLE, OCEAN, ProvinceGrid, Rgb,
    build_edge_set, open_province_map,
};
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Extract province border polylines from a map bitmap")]
struct Args {
    /// Path to the definitions table (id;r;g;b;name;...)
    #[arg(long, default_value = "map/definition.csv")]
    definitions: PathBuf,

    /// Path to the 24-bpp province bitmap
    #[arg(long, default_value = "map/provinces.bmp")]
    bitmap: PathBuf,

    /// Output JSON path (default: <bitmap stem>_edges.json next to the bitmap)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also render a 2x-scale PNG overlay of provinces and borders
    #[arg(long)]
    overlay: Option<PathBuf>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct EdgeDto {
    relation: [u16; 2],
    closed: bool,
    knots: Vec<[u16; 2]>,
}

#[derive(Serialize)]
struct TraceResult {
    width: usize,
    height: usize,
    provinces: usize,
    segments_scanned: usize,
    unit_boundaries: usize,
    edges: Vec<EdgeDto>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn display_color(table: &DefinitionsTable, id: u16) -> Rgb {
    match id {
        OCEAN => Rgb::WHITE,
        IMPASSABLE => Rgb::BLACK,
        id => table.color_of(id).unwrap_or(Rgb::new(0xFF, 0x00, 0xFF)),
    }
}

/// Renders a (2W+1)x(2H+1) canvas: each cell fills a 2x2 block, border
/// polylines land on the lattice lines between the blocks.
fn render_overlay(table: &DefinitionsTable, grid: &ProvinceGrid, edges: &EdgeSet) -> RgbImage {
    let mut img = RgbImage::new(2 * grid.width() as u32 + 1, 2 * grid.height() as u32 + 1);

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let Rgb { r, g, b } = display_color(table, grid.get(x, y));
            let px = ImageRgb([r, g, b]);
            for (dx, dy) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
                img.put_pixel(2 * x as u32 + dx, 2 * y as u32 + dy, px);
            }
        }
    }

    let border = ImageRgb([0xE0, 0x20, 0x20]);
    for edge in edges {
        let knots: Vec<_> = edge.knots().collect();
        for pair in knots.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ax, ay) = (2 * a.x as u32, 2 * a.y as u32);
            let (bx, by) = (2 * b.x as u32, 2 * b.y as u32);
            if ax == bx {
                for y in ay.min(by)..=ay.max(by) {
                    img.put_pixel(ax, y, border);
                }
            } else {
                for x in ax.min(bx)..=ax.max(bx) {
                    img.put_pixel(x, ay, border);
                }
            }
        }
    }

    img
}

fn edge_dto(edge: &Edge) -> EdgeDto {
    EdgeDto {
        relation: [edge.relation().low(), edge.relation().high()],
        closed: edge.is_closed(),
        knots: edge.knots().map(|k| [k.x, k.y]).collect(),
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let out_path = args.out.unwrap_or_else(|| {
        let stem = args.bitmap.file_stem().unwrap_or_default().to_string_lossy();
        let dir = args.bitmap.parent().unwrap_or(Path::new("."));
        dir.join(format!("{stem}_edges.json"))
    });

    let defs_file = File::open(&args.definitions)
        .with_context(|| format!("opening {}", args.definitions.display()))?;
    let table = DefinitionsTable::parse(&args.definitions, BufReader::new(defs_file))
        .context("parsing definitions table")?;
    let index = ColorIndex::build(&args.definitions, &table).context("building color index")?;
    println!(
        "loaded {}: {} provinces",
        args.definitions.display(),
        table.len()
    );

    let t0 = Instant::now();
    let grid = open_province_map(&args.bitmap, &index).context("loading province bitmap")?;
    let load_ms = t0.elapsed().as_secs_f64() * 1e3;
    println!(
        "loaded {}: {}x{} px  ({load_ms:.2} ms)",
        args.bitmap.display(),
        grid.width(),
        grid.height()
    );

    let t0 = Instant::now();
    let edges = build_edge_set(&grid);
    let trace_ms = t0.elapsed().as_secs_f64() * 1e3;
    let stats = edges.stats();
    println!(
        "traced {} edges from {} segments / {} unit boundaries  ({trace_ms:.2} ms)",
        edges.len(),
        stats.segments,
        stats.unit_edges
    );

    let result = TraceResult {
        width: grid.width(),
        height: grid.height(),
        provinces: table.len(),
        segments_scanned: stats.segments,
        unit_boundaries: stats.unit_edges,
        edges: edges.iter().map(edge_dto).collect(),
    };

    let out_file =
        File::create(&out_path).with_context(|| format!("creating {}", out_path.display()))?;
    serde_json::to_writer_pretty(out_file, &result)
        .with_context(|| format!("writing JSON to {}", out_path.display()))?;
    println!("edges written to {}", out_path.display());

    if let Some(overlay_path) = args.overlay {
        render_overlay(&table, &grid, &edges)
            .save(&overlay_path)
            .with_context(|| format!("writing overlay to {}", overlay_path.display()))?;
        println!("overlay written to {}", overlay_path.display());
    }

    Ok(())
}
