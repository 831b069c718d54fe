use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use planet_fields::craters::crater_count;
use planet_fields::{build_world_fields, WorldFields, WorldParams};

#[derive(Parser, Debug)]
#[command(name = "planet_fields")]
#[command(about = "Generate deterministic planet surface fields and print their statistics")]
struct Args {
    /// Width of the grid in tiles
    #[arg(short = 'W', long, default_value = "96")]
    width: usize,

    /// Height of the grid in tiles
    #[arg(short = 'H', long, default_value = "48")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of tectonic plates (overrides the params file)
    #[arg(short = 'p', long)]
    plates: Option<usize>,

    /// JSON file with generator params; missing keys keep their defaults
    #[arg(long)]
    params: Option<PathBuf>,

    /// Print the effective params as JSON and exit
    #[arg(long)]
    dump_params: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FieldStats {
    name: &'static str,
    min: f32,
    mean: f32,
    max: f32,
}

#[derive(Serialize)]
struct WorldSummary {
    seed: u64,
    width: usize,
    height: usize,
    plates: usize,
    craters: usize,
    volcanoes: usize,
    water_fraction: f32,
    fields: Vec<FieldStats>,
}

impl WorldSummary {
    fn from_world(world: &WorldFields, params: &WorldParams) -> Self {
        let fields = world
            .named_fields()
            .into_iter()
            .map(|f| {
                let (min, max) = f.field.min_max();
                FieldStats {
                    name: f.name,
                    min,
                    mean: f.field.mean(),
                    max,
                }
            })
            .collect();

        Self {
            seed: world.seed(),
            width: world.width,
            height: world.height,
            plates: world.plates.plates.len(),
            craters: crater_count(world.width, world.height, &params.craters),
            volcanoes: world.volcanoes.volcanoes.len(),
            water_fraction: 1.0 - world.fluid.land_fraction(),
            fields,
        }
    }

    fn print_text(&self) {
        println!("Planet seed: {}", self.seed);
        println!("Map size: {}x{}", self.width, self.height);
        println!(
            "{} plates, {} craters, {} volcanoes",
            self.plates, self.craters, self.volcanoes
        );
        println!("Water: {:.1}%", self.water_fraction * 100.0);
        println!();
        println!("{:<22} {:>9} {:>9} {:>9}", "field", "min", "mean", "max");
        for f in &self.fields {
            println!("{:<22} {:>9.4} {:>9.4} {:>9.4}", f.name, f.min, f.mean, f.max);
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut params = match &args.params {
        Some(path) => WorldParams::load(path)?,
        None => WorldParams::default(),
    };
    if let Some(count) = args.plates {
        params.plates.plate_count = count;
    }

    if args.dump_params {
        println!("{}", params.to_json_pretty()?);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let world = build_world_fields(args.width, args.height, seed, &params)?;
    let summary = WorldSummary::from_world(&world, &params);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print_text();
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Args::parse()) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
