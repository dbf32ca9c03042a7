use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use image::{GenericImageView, RgbaImage};
use log::{error, info, warn};
use rayon::prelude::*;
use recolorify_core::palette::parse_palette_json;
use recolorify_core::pipeline::recolor_file;
use recolorify_core::{Palette, RecolorError, RecolorParams};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "recolorify-cli",
    about = "Recolor images to a palette with Shepard's method"
)]
struct Cli {
    /// Number of worker threads (default: num_cpus)
    #[arg(long, short, global = true)]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct PaletteArgs {
    /// Palette colors as comma-separated hex values (e.g. "#000000,#720546,#FFFFFF")
    #[arg(long)]
    colors: Option<String>,

    /// JSON palette file: ["#RRGGBB", ...] or [{"hex": "#RRGGBB"}, ...]
    #[arg(long)]
    palette_file: Option<PathBuf>,

    /// Drop malformed palette entries instead of failing
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Args, Clone)]
struct TuningArgs {
    /// Multiplier applied to source RGB before matching
    #[arg(long, default_value_t = 1.0)]
    luminosity: f64,

    /// Number of palette candidates blended per pixel
    #[arg(long, default_value_t = 30)]
    nearest: i64,

    /// Inverse-distance exponent (higher = closer to nearest-color snapping)
    #[arg(long, default_value_t = 4.0)]
    power: f64,

    /// Leave pixels farther than this from every palette color untouched (0 = off)
    #[arg(long, default_value_t = 0.0)]
    max_distance: f64,

    /// Use a named preset (overrides the individual knobs): balanced, soft, crisp, strict
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recolor a single image
    Single {
        /// Input image path
        input: PathBuf,

        /// Output image path (default: input_recolored.png)
        output: Option<PathBuf>,

        #[command(flatten)]
        palette: PaletteArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Recolor all images in a directory
    Batch {
        /// Input directory
        input_dir: PathBuf,

        /// Output directory (default: input_dir/recolored)
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        palette: PaletteArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Write one output per preset instead of using the tuning flags
        #[arg(
            long,
            conflicts_with_all = ["preset", "luminosity", "nearest", "power", "max_distance"]
        )]
        all_presets: bool,

        /// Reprocess even if output is up-to-date
        #[arg(long)]
        force: bool,
    },

    /// Compare two images pixel-by-pixel
    Compare {
        /// First image
        image_a: PathBuf,

        /// Second image
        image_b: PathBuf,

        /// Save visual diff to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tiff"];
const OUTPUT_SUFFIX: &str = "recolored";

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_generated_file(path: &Path) -> bool {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    stem.ends_with(OUTPUT_SUFFIX)
        || RecolorParams::preset_names()
            .iter()
            .any(|name| stem.ends_with(&format!("{}_{}", OUTPUT_SUFFIX, name)))
}

fn file_stem(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("{}: not a valid file name", path.display()))
}

fn default_output_path(input: &Path) -> Result<PathBuf> {
    let stem = file_stem(input)?;
    let parent = input.parent().unwrap_or(Path::new("."));
    Ok(parent.join(format!("{}_{}.png", stem, OUTPUT_SUFFIX)))
}

fn resolve_palette(args: &PaletteArgs) -> Result<Palette> {
    let entries: Vec<String> = match (&args.colors, &args.palette_file) {
        (Some(_), Some(_)) => bail!("use either --colors or --palette-file, not both"),
        (Some(colors), None) => colors.split(',').map(str::to_string).collect(),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read palette file {}", path.display()))?;
            parse_palette_json(&text)?
        }
        (None, None) => bail!("a palette is required: pass --colors or --palette-file"),
    };

    let palette = if args.skip_invalid {
        let (palette, rejected) = Palette::parse_hex_list_nonempty(&entries)?;
        if !rejected.is_empty() {
            warn!("dropped {} invalid palette entries", rejected.len());
        }
        palette
    } else {
        let palette = Palette::parse_hex_list(&entries)?;
        if palette.is_empty() {
            return Err(RecolorError::EmptyPalette.into());
        }
        palette
    };

    info!("Palette: {}", palette.to_hex_strings().join(", "));
    Ok(palette)
}

fn resolve_params(args: &TuningArgs) -> Result<RecolorParams> {
    if let Some(ref name) = args.preset {
        return RecolorParams::from_preset(name).with_context(|| {
            format!(
                "unknown preset '{}'. Available: {}",
                name,
                RecolorParams::preset_names().join(", ")
            )
        });
    }
    Ok(RecolorParams::sanitized(
        Some(args.luminosity),
        Some(args.nearest),
        Some(args.power),
        Some(args.max_distance),
    ))
}

fn is_up_to_date(input: &Path, output: &Path) -> bool {
    let (Ok(in_meta), Ok(out_meta)) = (input.metadata(), output.metadata()) else {
        return false;
    };
    match (in_meta.modified(), out_meta.modified()) {
        (Ok(in_time), Ok(out_time)) => out_time > in_time,
        _ => false,
    }
}

fn cmd_single(
    input: &Path,
    output: Option<&Path>,
    palette: &Palette,
    params: &RecolorParams,
) -> Result<()> {
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_path(input)?,
    };

    info!("Processing: {} -> {}", input.display(), output_path.display());
    info!(
        "luminosity={} nearest={} power={} max_distance={}",
        params.luminosity, params.nearest, params.power, params.max_distance
    );

    recolor_file(input, &output_path, palette, params)
        .with_context(|| format!("failed to recolor {}", input.display()))?;
    info!("Done: {}", output_path.display());
    Ok(())
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    palette: &Palette,
    variants: Vec<(String, RecolorParams)>,
    force: bool,
) -> Result<()> {
    let images: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_image_file(p) && !is_generated_file(p))
        .collect();

    if images.is_empty() {
        warn!("No source images found in {}", input_dir.display());
        return Ok(());
    }

    info!("Found {} source images, {} variants", images.len(), variants.len());
    std::fs::create_dir_all(output_dir)?;

    let mut jobs: Vec<(PathBuf, PathBuf, &RecolorParams)> = Vec::new();
    let mut skipped = 0usize;
    for image_path in &images {
        let stem = match file_stem(image_path) {
            Ok(stem) => stem,
            Err(e) => {
                warn!("Skipping {}", e);
                continue;
            }
        };
        for (suffix, params) in &variants {
            let output_path = output_dir.join(format!("{}_{}.png", stem, suffix));
            if !force && is_up_to_date(image_path, &output_path) {
                skipped += 1;
                continue;
            }
            jobs.push((image_path.clone(), output_path, params));
        }
    }

    info!("To process: {} outputs, skipping {} up-to-date", jobs.len(), skipped);

    // Each recolor already fans out over row bands; files run in parallel on
    // the same pool so small images still keep every thread busy.
    let errors: Vec<String> = jobs
        .par_iter()
        .filter_map(|(input, output, params)| {
            info!("  {} -> {}", input.display(), output.display());
            match recolor_file(input, output, palette, params) {
                Ok(()) => None,
                Err(e) => {
                    let msg = format!("{}: {}", input.display(), e);
                    error!("  {}", msg);
                    Some(msg)
                }
            }
        })
        .collect();

    info!(
        "Done! Processed: {}, Skipped: {}, Errors: {}",
        jobs.len() - errors.len(),
        skipped,
        errors.len()
    );
    for e in &errors {
        error!("  {}", e);
    }
    if !errors.is_empty() {
        bail!("{} images failed", errors.len());
    }
    Ok(())
}

fn cmd_compare(image_a: &Path, image_b: &Path, diff_output: Option<&Path>) -> Result<()> {
    let a = image::open(image_a).with_context(|| format!("failed to open {}", image_a.display()))?;
    let b = image::open(image_b).with_context(|| format!("failed to open {}", image_b.display()))?;

    let (wa, ha) = a.dimensions();
    let (wb, hb) = b.dimensions();

    if wa != wb || ha != hb {
        println!("Images have different dimensions: {}x{} vs {}x{}", wa, ha, wb, hb);
        return Ok(());
    }

    let rgba_a = a.to_rgba8();
    let rgba_b = b.to_rgba8();
    let total_pixels = wa as u64 * ha as u64;

    let mut exact_matches = 0u64;
    let mut sum_abs_error = [0u64; 4];
    let mut max_error = [0u32; 4];
    let mut diff_img = diff_output.map(|_| RgbaImage::new(wa, ha));

    for ((x, y, pa), pb) in rgba_a.enumerate_pixels().zip(rgba_b.pixels()) {
        let mut pixel_match = true;
        let mut vis = [0u8, 0, 0, 255];
        for c in 0..4 {
            let diff = (pa[c] as i32 - pb[c] as i32).unsigned_abs();
            if diff > 0 {
                pixel_match = false;
            }
            sum_abs_error[c] += diff as u64;
            max_error[c] = max_error[c].max(diff);
            if c < 3 {
                vis[c] = (diff * 4).min(255) as u8;
            }
        }
        if let Some(ref mut img) = diff_img {
            img.put_pixel(x, y, image::Rgba(vis));
        }
        if pixel_match {
            exact_matches += 1;
        }
    }

    let match_pct = if total_pixels == 0 {
        100.0
    } else {
        (exact_matches as f64 / total_pixels as f64) * 100.0
    };
    let mae: Vec<f64> = sum_abs_error
        .iter()
        .map(|&s| s as f64 / total_pixels.max(1) as f64)
        .collect();

    println!("Image comparison: {} vs {}", image_a.display(), image_b.display());
    println!("Dimensions: {}x{}", wa, ha);
    println!("Total pixels: {}", total_pixels);
    println!("Exact matches: {} ({:.2}%)", exact_matches, match_pct);
    println!(
        "MAE per channel (R,G,B,A): {:.4}, {:.4}, {:.4}, {:.4}",
        mae[0], mae[1], mae[2], mae[3]
    );
    println!(
        "Max error per channel (R,G,B,A): {}, {}, {}, {}",
        max_error[0], max_error[1], max_error[2], max_error[3]
    );

    if let (Some(img), Some(out_path)) = (diff_img, diff_output) {
        img.save(out_path)?;
        println!("Visual diff saved to: {}", out_path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Some(n) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Single {
            input,
            output,
            palette,
            tuning,
        } => {
            let palette = resolve_palette(&palette)?;
            let params = resolve_params(&tuning)?;
            cmd_single(&input, output.as_deref(), &palette, &params)?;
        }

        Commands::Batch {
            input_dir,
            output_dir,
            palette,
            tuning,
            all_presets,
            force,
        } => {
            let output = output_dir.unwrap_or_else(|| input_dir.join(OUTPUT_SUFFIX));
            let palette = resolve_palette(&palette)?;

            let variants: Vec<(String, RecolorParams)> = if all_presets {
                RecolorParams::all_presets()
                    .into_iter()
                    .map(|(name, p)| (format!("{}_{}", OUTPUT_SUFFIX, name), p))
                    .collect()
            } else {
                vec![(OUTPUT_SUFFIX.to_string(), resolve_params(&tuning)?)]
            };

            cmd_batch(&input_dir, &output, &palette, variants, force)?;
        }

        Commands::Compare {
            image_a,
            image_b,
            output,
        } => {
            cmd_compare(&image_a, &image_b, output.as_deref())?;
        }
    }

    Ok(())
}
