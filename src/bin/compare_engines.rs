use clap::{App, load_yaml};
use serde_json::json;

use timetable_color::error::ColorError;
use timetable_color::util::{EngineKind, Params, export_results, init_logging, load_instance, read_params};


/** runs every engine on the same instance, prints colors and times, exports the best solution */
fn compare(params:&Params) -> Result<(), ColorError> {
    let instance = load_instance(params)?;
    let mut all_stats = serde_json::Map::new();
    let mut best:Option<(&'static str, Vec<usize>, usize)> = None;
    for kind in EngineKind::ALL.iter() {
        let mut engine = kind.build(instance.graph.clone(), params.time_limit);
        let (coloring, nb_colors) = engine.solve();
        let stats = engine.statistics();
        println!("{:>20}: {:>4} colors, {} s", engine.name(), nb_colors, stats["time"]);
        all_stats.insert(engine.name().to_string(), json!({
            "colors": nb_colors,
            "statistics": stats,
        }));
        if best.as_ref().map_or(true, |(_,_,k)| nb_colors < *k) {
            best = Some((engine.name(), coloring, nb_colors));
        }
    }
    if let Some((name, coloring, nb_colors)) = best {
        println!("best: {} ({} colors)", name, nb_colors);
        export_results(&instance, &coloring, &serde_json::Value::Object(all_stats), params)?;
    }
    Ok(())
}

/** compares the coloring engines on an instance */
pub fn main() {
    init_logging();
    // parse arguments
    let yaml = load_yaml!("compare_engines.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    if let Err(e) = read_params(&main_args).and_then(|params| compare(&params)) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
