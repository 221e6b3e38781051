use clap::Parser;

use grid_agents::config::Config;
use grid_agents::simulation::Simulation;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("grid_agents=info"))
        .init();

    let config = Config::parse();

    if !config.quiet {
        println!("Starting grid agent simulation...");
        println!("Grid size: {}x{}", config.grid_size, config.grid_size);
        println!("Obstacles: {}", config.num_obstacles);
        if config.all {
            println!("Agent: all");
        } else {
            println!("Agent: {}", config.agent);
        }
        if config.no_visualization || config.all {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
            println!("Press Ctrl+C to stop the simulation");
        }
        println!();
    }

    if config.all {
        match Simulation::run_all_agents(config) {
            Ok(results) => Simulation::print_comparison_results(&results),
            Err(e) => {
                eprintln!("Error running all agents: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let quiet = config.quiet;
    match Simulation::new(config) {
        Ok(mut simulation) => {
            let stats = simulation.run();
            if !quiet {
                println!("\n=== FINAL RESULTS ===");
                println!("Seed: {}", simulation.scenario().seed);
                println!("{}", stats);
            }
        }
        Err(e) => {
            eprintln!("Failed to create simulation: {}", e);
            eprintln!("Try reducing --num-obstacles or increasing --grid-size");
            std::process::exit(1);
        }
    }
}
