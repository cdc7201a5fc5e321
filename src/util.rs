use std::rc::Rc;

use clap::ArgMatches;
use dogs::search_algorithm::TimeStoppingCriterion;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::{
    color::{ConflictGraph, CheckerResult, check_coloring, coloring_to_solution},
    compact_instance::CompactInstance,
    error::ColorError,
    search::ColoringEngine,
    search::branch_bound::BranchBoundSolver,
    search::brown::BrownSolver,
    search::independent_sets::IndependentSetSolver,
    timetable::Timetable,
};

/// command line parameters shared by the executables
#[derive(Debug, Clone)]
pub struct Params {
    /// instance file
    pub inst_filename: String,
    /// instance format ("dimacs" or "timetable")
    pub instance_type: String,
    /// time limit in seconds (None: unbounded search)
    pub time_limit: Option<f32>,
    /// where to write the solution
    pub sol_file: Option<String>,
    /// where to write the statistics
    pub perf_file: Option<String>,
    /// print the schedule (timetable instances)
    pub show_schedule: bool,
}

/// instance read from the command line
#[derive(Debug)]
pub struct LoadedInstance {
    /// conflict graph
    pub graph: Rc<dyn ConflictGraph>,
    /// timetable the graph was built from (timetable instances)
    pub timetable: Option<Timetable>,
}

/// installs the tracing subscriber (level from RUST_LOG, info by default)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // fails only if a subscriber is already installed (tests)
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

/** reads command line input */
pub fn read_params(main_args:&ArgMatches) -> Result<Params, ColorError> {
    let inst_filename = main_args.value_of("instance").unwrap_or_default().to_string();
    let instance_type = main_args.value_of("type").unwrap_or("timetable").to_string();
    let time_limit = match main_args.value_of("time") {
        None => None,
        Some(t) => Some(t.parse::<f32>().map_err(|_| ColorError::InvalidTime(t.to_string()))?),
    };
    let sol_file = main_args.value_of("solution").map(|e| {
        println!("printing solutions in: {}", e);
        e.to_string()
    });
    let perf_file = main_args.value_of("perf").map(|e| {
        println!("printing perfs in: {}", e);
        e.to_string()
    });
    Ok(Params {
        inst_filename,
        instance_type,
        time_limit,
        sol_file,
        perf_file,
        show_schedule: main_args.is_present("schedule"),
    })
}

/** reads the instance described by the parameters and displays its statistics */
pub fn load_instance(params:&Params) -> Result<LoadedInstance, ColorError> {
    let res = match params.instance_type.as_str() {
        "dimacs" => LoadedInstance {
            graph: Rc::new(CompactInstance::from_dimacs_file(&params.inst_filename)?),
            timetable: None,
        },
        "timetable" => {
            let timetable = Timetable::from_file(&params.inst_filename)?;
            let (nb_groups, nb_teachers, nb_classrooms, _) = timetable.nb_entities();
            println!(
                "loaded: {} lessons, {} groups, {} teachers, {} classrooms",
                timetable.lessons().len(), nb_groups, nb_teachers, nb_classrooms
            );
            LoadedInstance {
                graph: Rc::new(timetable.conflict_graph()),
                timetable: Some(timetable),
            }
        },
        other => return Err(ColorError::UnknownInstanceType(other.to_string())),
    };
    res.graph.display_statistics();
    println!("=======================");
    Ok(res)
}

/// engines available from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// branch & bound with the clique bound
    BranchBound,
    /// clique-seeded backtracking
    Brown,
    /// independent set covering
    IndependentSets,
}

impl EngineKind {
    /// every engine, in comparison order
    pub const ALL:[EngineKind ; 3] = [EngineKind::BranchBound, EngineKind::IndependentSets, EngineKind::Brown];

    /** builds the engine, bounded by the time limit if any */
    pub fn build(&self, inst:Rc<dyn ConflictGraph>, time_limit:Option<f32>) -> Box<dyn ColoringEngine> {
        match (self, time_limit) {
            (EngineKind::BranchBound, None) => Box::new(BranchBoundSolver::new(inst)),
            (EngineKind::BranchBound, Some(t)) => Box::new(
                BranchBoundSolver::with_stopping_criterion(inst, TimeStoppingCriterion::new(t))
            ),
            (EngineKind::Brown, None) => Box::new(BrownSolver::new(inst)),
            (EngineKind::Brown, Some(t)) => Box::new(
                BrownSolver::with_stopping_criterion(inst, TimeStoppingCriterion::new(t))
            ),
            (EngineKind::IndependentSets, None) => Box::new(IndependentSetSolver::new(inst)),
            (EngineKind::IndependentSets, Some(t)) => Box::new(
                IndependentSetSolver::with_stopping_criterion(inst, TimeStoppingCriterion::new(t))
            ),
        }
    }
}

/** checks the solution and exports it (and the statistics) to the files given as parameters */
pub fn export_results(
    instance:&LoadedInstance,
    coloring:&[usize],
    stats:&Value,
    params:&Params,
) -> Result<(), ColorError> {
    match check_coloring(instance.graph.clone(), coloring) {
        CheckerResult::Ok(_) => {},
        invalid => return Err(ColorError::InvalidSolution(invalid)),
    }
    if let Some(filename) = &params.perf_file {
        let content = serde_json::to_string(stats)?;
        std::fs::write(filename, content).map_err(|e| ColorError::io(filename, e))?;
    }
    if let Some(filename) = &params.sol_file {
        match &instance.timetable {
            Some(timetable) => timetable.write_schedule(filename, coloring)?,
            None => {
                let content = CompactInstance::solution_to_string(&coloring_to_solution(coloring));
                std::fs::write(filename, content).map_err(|e| ColorError::io(filename, e))?;
            }
        }
    }
    Ok(())
}

/** solves the instance with one engine, prints the result, and exports it */
pub fn run_engine(kind:EngineKind, params:&Params) -> Result<(), ColorError> {
    let instance = load_instance(params)?;
    let mut engine = kind.build(instance.graph.clone(), params.time_limit);
    let (coloring, nb_colors) = engine.solve();
    let stats = engine.statistics();
    println!("{}: {} colors in {} s", engine.name(), nb_colors, stats["time"]);
    if let Some(map) = stats.as_object() {
        for (k,v) in map {
            println!("\t{}: {}", k, v);
        }
    }
    if params.show_schedule {
        if let Some(timetable) = &instance.timetable {
            println!("{}", timetable.render_schedule(&coloring, engine.name())?);
        }
    }
    export_results(&instance, &coloring, &stats, params)
}
