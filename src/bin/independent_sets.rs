use clap::{App, load_yaml};

use timetable_color::util::{EngineKind, init_logging, read_params, run_engine};


/** assigns time slots to a timetable (or colors a DIMACS graph) using independent set covering */
pub fn main() {
    init_logging();
    // parse arguments
    let yaml = load_yaml!("independent_sets.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let result = read_params(&main_args)
        .and_then(|params| run_engine(EngineKind::IndependentSets, &params));
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
