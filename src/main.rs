mod table;
mod ui;

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use egui::Vec2;
use log::{LevelFilter, error, info, warn};

use f1lab::{
    AppConfig, F1LabError, HttpSessionSource, SessionDataSource, SessionKey, SessionType,
    TrackMapGenerator, TrackProjection, project,
    session::{FIRST_YEAR, LAST_YEAR},
    timing::{LapSortKey, ResultSortKey, SortDirection, lap_time_cell, order_by},
    writer,
};
use table::render_table;
use ui::DashboardApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Base URL of the session data backend
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
struct SessionArgs {
    /// Season, e.g. 2021
    year: i32,
    /// Event name, e.g. "Monaco"
    event: String,
    #[arg(value_enum)]
    session: SessionType,
}

impl SessionArgs {
    fn key(&self) -> Result<SessionKey, F1LabError> {
        session_key(self.year, &self.event, self.session)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the session dashboard
    Dashboard {
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(short, long)]
        event: Option<String>,
        #[arg(short, long, value_enum)]
        session: Option<SessionType>,
    },
    /// Print the drivers of a session
    Drivers {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Print the laps of a session
    Laps {
        #[command(flatten)]
        session: SessionArgs,
        /// Only laps of this driver, e.g. VER
        #[arg(short, long)]
        driver: Option<String>,
        #[arg(long, value_enum, default_value_t = LapSortKey::LapNumber)]
        sort: LapSortKey,
        #[arg(long)]
        desc: bool,
        /// Also write the laps to this file as JSON lines
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the results of a session
    Results {
        #[command(flatten)]
        session: SessionArgs,
        #[arg(long, value_enum, default_value_t = ResultSortKey::Position)]
        sort: ResultSortKey,
        #[arg(long)]
        desc: bool,
    },
    /// Write the circuit of a session as an SVG track map
    TrackMap {
        #[command(flatten)]
        session: SessionArgs,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn session_key(year: i32, event: &str, session_type: SessionType) -> Result<SessionKey, F1LabError> {
    if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
        return Err(F1LabError::InvalidUserInput {
            field: "year".to_string(),
            reason: format!("must be between {} and {}", FIRST_YEAR, LAST_YEAR),
        });
    }
    if event.trim().is_empty() {
        return Err(F1LabError::InvalidUserInput {
            field: "event".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(SessionKey::new(year, event.trim(), session_type))
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

fn dashboard(
    config: AppConfig,
    source: HttpSessionSource,
    year: Option<i32>,
    event: Option<String>,
    session: Option<SessionType>,
) -> Result<(), F1LabError> {
    let default_session = config.default_session();
    let initial_session = session_key(
        year.unwrap_or(default_session.year),
        event.as_deref().unwrap_or(&default_session.event),
        session.unwrap_or(default_session.session_type),
    )?;
    let source: Arc<dyn SessionDataSource> = Arc::new(source);

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_title("F1 Performance Lab")
        .with_inner_size(Vec2::new(1200., 800.));

    eframe::run_native(
        "F1 Performance Lab",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                source,
                config,
                initial_session,
                cc,
            )))
        }),
    )
    .map_err(|e| F1LabError::DashboardError {
        reason: e.to_string(),
    })
}

fn drivers(source: &dyn SessionDataSource, key: &SessionKey) -> Result<(), F1LabError> {
    let drivers = source.drivers(key)?;
    let rows: Vec<Vec<String>> = drivers
        .iter()
        .map(|d| {
            vec![
                d.number.map(|n| n.to_string()).unwrap_or_default(),
                d.abbreviation.clone(),
                d.name.clone(),
                d.team.clone(),
            ]
        })
        .collect();
    println!("{}", key);
    println!("{}", render_table(&["No", "Driver", "Name", "Team"], &rows));
    Ok(())
}

fn laps(
    source: &dyn SessionDataSource,
    key: &SessionKey,
    driver: Option<&str>,
    sort: LapSortKey,
    desc: bool,
    output: Option<&PathBuf>,
) -> Result<(), F1LabError> {
    let lap_list = source.laps(key, driver)?;
    let laps = order_by(&lap_list.laps, sort, direction(desc));
    let rows: Vec<Vec<String>> = laps
        .iter()
        .map(|lap| {
            let flags = [(lap.is_personal_best, "PB"), (lap.is_fastest, "F")]
                .into_iter()
                .filter(|(set, _)| *set)
                .map(|(_, flag)| flag)
                .collect::<Vec<_>>()
                .join(" ");
            vec![
                lap.driver.clone(),
                lap.lap_number.to_string(),
                lap_time_cell(lap.lap_time.as_deref()),
                lap_time_cell(lap.sector_1_time.as_deref()),
                lap_time_cell(lap.sector_2_time.as_deref()),
                lap_time_cell(lap.sector_3_time.as_deref()),
                lap.compound.clone().filter(|c| !c.is_empty()).unwrap_or_else(|| "-".to_string()),
                lap.tyre_life
                    .filter(|life| *life > 0)
                    .map(|life| life.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                flags,
            ]
        })
        .collect();
    println!("{} - {} laps", key, lap_list.total());
    println!(
        "{}",
        render_table(
            &[
                "Driver", "Lap", "Lap Time", "Sector 1", "Sector 2", "Sector 3", "Compound",
                "Tyre Life", "Flags",
            ],
            &rows,
        )
    );

    if let Some(output) = output {
        writer::write_laps(output, &laps)?;
    }
    Ok(())
}

fn results(
    source: &dyn SessionDataSource,
    key: &SessionKey,
    sort: ResultSortKey,
    desc: bool,
) -> Result<(), F1LabError> {
    let results = order_by(&source.results(key)?, sort, direction(desc));
    let rows: Vec<Vec<String>> = results
        .iter()
        .enumerate()
        .map(|(index, r)| {
            vec![
                r.position
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| (index + 1).to_string()),
                r.abbreviation.clone(),
                r.name.clone(),
                r.team.clone(),
                lap_time_cell(r.q1.as_deref()),
                lap_time_cell(r.q2.as_deref()),
                lap_time_cell(r.q3.as_deref()),
                lap_time_cell(r.best_lap_time.as_deref()),
                r.points_cell(),
                r.status_cell().to_string(),
            ]
        })
        .collect();
    println!("{}", key);
    println!(
        "{}",
        render_table(
            &[
                "Pos", "Driver", "Name", "Team", "Q1", "Q2", "Q3", "Best Lap", "Points", "Status",
            ],
            &rows,
        )
    );
    Ok(())
}

fn track_map(source: &dyn SessionDataSource, key: &SessionKey, output: &PathBuf) -> Result<(), F1LabError> {
    let circuit = source.circuit(key)?;
    let scene = match project(Some(&circuit)) {
        TrackProjection::Scene(scene) => scene,
        TrackProjection::NoData => {
            return Err(F1LabError::SvgGenerationError {
                reason: circuit
                    .error
                    .unwrap_or_else(|| "No track data available".to_string()),
            });
        }
    };
    let svg = TrackMapGenerator::new().generate_svg(&scene)?;
    writer::write_svg(output, &svg)
}

fn run(cli: Args) -> Result<(), F1LabError> {
    let config = AppConfig::load().with_env_override(cli.api_url.clone());
    info!("Using data backend at {}", config.api_url);
    let source = HttpSessionSource::from_config(&config)?;

    match cli.command {
        Commands::Dashboard {
            year,
            event,
            session,
        } => dashboard(config, source, year, event, session),
        Commands::Drivers { session } => drivers(&source, &session.key()?),
        Commands::Laps {
            session,
            driver,
            sort,
            desc,
            output,
        } => laps(
            &source,
            &session.key()?,
            driver.as_deref(),
            sort,
            desc,
            output.as_ref(),
        ),
        Commands::Results {
            session,
            sort,
            desc,
        } => results(&source, &session.key()?, sort, desc),
        Commands::TrackMap { session, output } => track_map(&source, &session.key()?, &output),
    }
}

fn main() {
    let cli = Args::parse();

    let mut log_builder = colog::default_builder();
    log_builder.filter_level(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    log_builder.init();

    if let Err(e) = ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    }) {
        warn!("Could not set Ctrl-C handler: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
