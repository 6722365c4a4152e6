use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use rtml_o_mat::coords::SkyPosition;
use rtml_o_mat::finder::{
    parse_click, parse_pixel, Camera, Finder, PixelPoint, Pointer, Report,
};
use rtml_o_mat::ingest::{self, CatalogOptions, InputFormat, RequestDefaults};
use rtml_o_mat::rtml::{Constraints, ExposureSpec};
use rtml_o_mat::Config;

#[derive(Parser)]
#[command(name = "rtml-o-mat")]
#[command(about = "Guide-star finder and RTML observation request converters")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place the science and guide camera footprints on a survey cutout
    Finder(FinderArgs),
    /// Convert a CSV file with one target per line
    Csv(ConvertArgs),
    /// Convert a delimited catalog where all targets share one configuration
    Catalog {
        #[command(flatten)]
        convert: ConvertArgs,
        #[command(flatten)]
        shared: CatalogArgs,
    },
    /// Convert a YAML target file with exposure groups
    Yaml(ConvertArgs),
}

#[derive(Args)]
struct FinderArgs {
    /// RA (J2000), hr:min:sec
    #[arg(long, allow_hyphen_values = true)]
    ra: Option<String>,
    /// DEC (J2000), deg:min:sec
    #[arg(long, allow_hyphen_values = true)]
    dec: Option<String>,
    /// Cutout field of view, degrees
    #[arg(long)]
    fov: Option<f64>,
    /// Cutout width, pixels
    #[arg(long)]
    pixels: Option<u32>,
    /// Pixel to place the driven camera on, X,Y
    #[arg(long, value_parser = parse_pixel)]
    click: Option<PixelPoint>,
    /// Camera whose center follows the click
    #[arg(long, value_enum, default_value_t = Camera::Science)]
    drive: Camera,
    /// Read further clicks from stdin, one `x y [s|g]` per line
    #[arg(long)]
    interactive: bool,
    /// Print placements as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ConvertArgs {
    input: PathBuf,
    /// Output file, defaults to <input-stem>.rtml
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    project: Option<String>,
}

#[derive(Args)]
struct CatalogArgs {
    /// Request type label
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    priority: Option<i32>,
    #[arg(long)]
    airmax: Option<f64>,
    #[arg(long)]
    monitor: Option<u32>,
    #[arg(long)]
    repeat: Option<u32>,
    #[arg(long)]
    bin: Option<u32>,
    /// FILTER,SECONDS,COUNT; repeat for several exposures
    #[arg(long = "exposure")]
    exposures: Vec<ExposureSpec>,
    #[arg(long)]
    delimiter: Option<char>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(Config::from_file).transpose() {
        Ok(c) => c.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Finder(args) => finder(args, &config),
        Commands::Csv(args) => convert(InputFormat::Flat, args, &config, &config.catalog),
        Commands::Catalog { convert: args, shared } => {
            let catalog = catalog_options(shared, &config.catalog);
            convert(InputFormat::Catalog, args, &config, &catalog)
        }
        Commands::Yaml(args) => convert(InputFormat::Structured, args, &config, &config.catalog),
    }
}

fn finder(args: FinderArgs, config: &Config) -> ExitCode {
    let (ra, dec) = match (args.ra, args.dec) {
        (Some(ra), Some(dec)) => (ra, dec),
        _ => match prompt_coordinates() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading coordinates: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let target = match SkyPosition::parse(&ra, &dec) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Coordinate error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut cutout = config.cutout.clone();
    cutout.fov_deg = args.fov.unwrap_or(cutout.fov_deg);
    cutout.pixels = args.pixels.unwrap_or(cutout.pixels);

    let finder = match Finder::from_settings(target, &cutout, config.instrument) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Finder error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Target: {} ({}, {})",
        finder.target(),
        finder.target().ra_deg(),
        finder.target().dec_deg()
    );
    println!(
        "Plate scale: {:.4} arcmin/pixel",
        finder.scale().arcmin_per_pixel()
    );
    println!("Cutout: {}", finder.cutout_url());

    let first = match args.click {
        Some(position) => finder.click(Pointer {
            position,
            camera: args.drive,
        }),
        None => Ok(finder.initial()),
    };
    match first {
        Ok(report) => print_report(&report, args.json),
        Err(e) => {
            eprintln!("Placement error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if args.interactive {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Error reading stdin: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let line = line.trim();
            if line.is_empty() || line == "q" {
                break;
            }
            match parse_click(line, args.drive).and_then(|p| finder.click(p)) {
                Ok(report) => print_report(&report, args.json),
                Err(e) => eprintln!("{}", e),
            }
        }
    }

    ExitCode::SUCCESS
}

fn prompt_coordinates() -> io::Result<(String, String)> {
    Ok((prompt("RA (hr:min:sec): ")?, prompt("DEC (deg:min:sec): ")?))
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_report(report: &Report, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Error serializing placement: {}", e),
        }
        return;
    }

    let o = &report.overlay;
    if let Some(camera) = report.driven {
        println!("Placed {} camera", camera);
    }
    println!(
        "  science    center=({:.2}, {:.2}) size={:.2}x{:.2}",
        o.science.center.x, o.science.center.y, o.science.width, o.science.height
    );
    println!(
        "  guide      center=({:.2}, {:.2}) size={:.2}x{:.2}",
        o.guide.center.x, o.guide.center.y, o.guide.width, o.guide.height
    );
    println!(
        "  guide star center=({:.2}, {:.2}) radius={:.2}",
        o.guide_star.center.x, o.guide_star.center.y, o.guide_star.radius
    );
    println!(
        "  target     center=({:.2}, {:.2}) radius={:.2}",
        o.target_marker.center.x, o.target_marker.center.y, o.target_marker.radius
    );
    println!("{}", report.science_center);
}

fn catalog_options(args: CatalogArgs, base: &CatalogOptions) -> CatalogOptions {
    let c = base.constraints;
    CatalogOptions {
        description: args.kind.unwrap_or_else(|| base.description.clone()),
        constraints: Constraints {
            airmass_max: args.airmax.unwrap_or(c.airmass_max),
            priority: args.priority.unwrap_or(c.priority),
            monitor: args.monitor.unwrap_or(c.monitor),
            repeat: args.repeat.unwrap_or(c.repeat),
            binning: args.bin.unwrap_or(c.binning),
        },
        exposures: if args.exposures.is_empty() {
            base.exposures.clone()
        } else {
            args.exposures
        },
        delimiter: args.delimiter.unwrap_or(base.delimiter),
        ..base.clone()
    }
}

fn convert(
    format: InputFormat,
    args: ConvertArgs,
    config: &Config,
    catalog: &CatalogOptions,
) -> ExitCode {
    let defaults = RequestDefaults {
        user: args.user.clone().unwrap_or_else(|| config.defaults.user.clone()),
        project: args.project.clone().or_else(|| config.defaults.project.clone()),
    };
    let mut catalog = catalog.clone();
    if let Some(user) = args.user {
        catalog.user = user;
    }
    if let Some(project) = args.project {
        catalog.project = project;
    }

    let requests = match ingest::read_requests(&args.input, format, &defaults, &catalog) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let output = ingest::output_path(&args.input, args.output);
    if let Err(e) = ingest::write_rtml(&output, &config.contact, config.rtml.clone(), &requests)
    {
        eprintln!("Error writing {}: {}", output.display(), e);
        return ExitCode::FAILURE;
    }

    println!("Wrote {} requests to {}", requests.len(), output.display());
    ExitCode::SUCCESS
}
