use std::path::PathBuf;

use clap::Parser;

mod renderer;

#[derive(Parser)]
#[command(name = "studyplan-cli", version)]
#[command(about = "Generates an ADHD-aware exam study plan from a JSON timetable", long_about = None)]
struct Cli {
    /// Input timetable JSON file
    #[arg(short, long, default_value = "custom_data.json")]
    input: PathBuf,

    /// Write the rendered plan here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print progress to stderr as the plan is built
    #[arg(short, long)]
    verbose: bool,

    /// Render the plan as JSON instead of a text report
    #[arg(long)]
    json: bool,
}

fn run(cli: Cli) -> Result<(), studyplan_core::PlannerError> {
    if cli.verbose {
        eprintln!("loading input from {}", cli.input.display());
    }
    let input = studyplan_core::load_from_path(&cli.input)?;

    if cli.verbose {
        eprintln!(
            "planning {} subject(s) between {} and {}",
            input.subjects.len(),
            input.metadata.planner_start,
            input.metadata.planner_end
        );
    }
    let today = chrono::Local::now().date_naive();
    let plan = studyplan_core::build_plan(&input, today)?;

    if cli.verbose {
        eprintln!("placed {} item(s), {} warning(s)", plan.items.len(), plan.warnings.len());
    }

    let rendered = if cli.json {
        renderer::render_json(&plan)?
    } else {
        renderer::render_text(&input, &plan)
    };

    match cli.output {
        Some(path) => std::fs::write(&path, rendered)?,
        None => println!("{rendered}"),
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
