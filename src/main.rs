//! Pair potential scan
//!
//! Loads a force field and prints energy and virial over a range of
//! separations for one kind pair.
//!
//! ```text
//! mie-mc <forcefield.toml> [kind1] [kind2] [charge product]
//! ```

use std::error::Error;

use mie_potential::{ForceFieldConfig, PairPotential, PotentialModel, BIG_NUM};

const SCAN_POINTS: usize = 40;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first() else {
        eprintln!("usage: mie-mc <forcefield.toml> [kind1] [kind2] [charge product]");
        std::process::exit(2);
    };

    let config = ForceFieldConfig::load(path)?;
    let model = PotentialModel::from_config(&config)?;

    let kind1 = match args.get(1) {
        Some(name) => config.kind_index(name)?,
        None => 0,
    };
    let kind2 = match args.get(2) {
        Some(name) => config.kind_index(name)?,
        None => kind1,
    };
    let qi_qj: f64 = match args.get(3) {
        Some(q) => q.parse()?,
        None => 0.0,
    };

    log::info!(
        "Scanning {} - {} (qi*qj = {})",
        config.kinds[kind1].name,
        config.kinds[kind2].name,
        qi_qj
    );

    let elect = model.electrostatics();
    let r_low = elect.r_cut_low_sq().sqrt();
    let r_cut = elect.r_cut();

    println!(
        "{:>10} {:>16} {:>16} {:>16} {:>16}",
        "r", "energy", "virial", "coulomb", "coulomb virial"
    );
    for i in 0..=SCAN_POINTS {
        let r = r_low + (r_cut - r_low) * i as f64 / SCAN_POINTS as f64;
        let dist_sq = r * r;
        let coulomb = model.coulomb_energy(dist_sq, qi_qj);
        let coulomb = if coulomb == BIG_NUM {
            "overlap".to_string()
        } else {
            format!("{:.6}", coulomb)
        };
        println!(
            "{:>10.4} {:>16.6} {:>16.6} {:>16} {:>16.6}",
            r,
            model.energy(dist_sq, kind1, kind2),
            model.virial(dist_sq, kind1, kind2),
            coulomb,
            model.coulomb_virial(dist_sq, qi_qj)
        );
    }

    log::info!(
        "Tail corrections: energy {} virial {}",
        model.energy_lrc(kind1, kind2),
        model.virial_lrc(kind1, kind2)
    );

    Ok(())
}
