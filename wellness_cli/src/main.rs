use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use wellness_core::breath::{
    format_clock, HapticCue, Phase, Scheduler, BREATHING_TIPS, COMPLETION_PATTERN_MS,
    CYCLE_PULSE_MS,
};
use wellness_core::metrics::MethodTopic;
use wellness_core::*;

#[derive(Parser)]
#[command(name = "wellness")]
#[command(about = "Body metrics calculators and guided breathing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a display name
    Login {
        #[arg(long)]
        name: String,
    },

    /// List the available tools (default)
    Home,

    /// Show the profile settings
    Profile {
        /// Display name to show instead of the configured one
        #[arg(long)]
        name: Option<String>,
    },

    /// Body Mass Index calculator
    Bmi(BmiArgs),

    /// Body fat, BMR, TDEE and calorie goals
    BodyFat(BodyFatArgs),

    /// Guided breathing session
    Breathe {
        /// Session length in minutes (defaults to the configured length)
        #[arg(long)]
        minutes: Option<u32>,

        /// Run the session clock this many times faster than real time
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },

    /// Explain how a method works
    Info {
        #[arg(value_enum)]
        topic: TopicArg,
    },
}

#[derive(Args)]
struct BmiArgs {
    /// Height in centimeters
    #[arg(long, conflicts_with_all = ["feet", "inches"])]
    height_cm: Option<f64>,

    /// Height, feet part
    #[arg(long)]
    feet: Option<f64>,

    /// Height, inches part
    #[arg(long)]
    inches: Option<f64>,

    /// Weight in kilograms
    #[arg(long, conflicts_with = "pounds")]
    weight_kg: Option<f64>,

    /// Weight in pounds
    #[arg(long)]
    pounds: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BodyFatArgs {
    /// male or female (defaults to the profile)
    #[arg(long)]
    gender: Option<Gender>,

    #[arg(long)]
    age: Option<f64>,

    #[arg(long)]
    weight: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    #[arg(long)]
    neck: Option<f64>,

    #[arg(long)]
    waist: Option<f64>,

    /// Required for women
    #[arg(long)]
    hip: Option<f64>,

    #[arg(long)]
    wrist: Option<f64>,

    #[arg(long)]
    forearm: Option<f64>,

    /// sedentary, light, moderate, active or very-active
    #[arg(long)]
    activity: Option<ActivityLevel>,

    /// metric (cm/kg) or imperial (in/lb)
    #[arg(long)]
    unit: Option<UnitSystem>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum TopicArg {
    Navy,
    Bmi,
    Jackson,
    Bmr,
    Tdee,
}

impl From<TopicArg> for MethodTopic {
    fn from(topic: TopicArg) -> Self {
        match topic {
            TopicArg::Navy => MethodTopic::Navy,
            TopicArg::Bmi => MethodTopic::Bmi,
            TopicArg::Jackson => MethodTopic::Jackson,
            TopicArg::Bmr => MethodTopic::Bmr,
            TopicArg::Tdee => MethodTopic::Tdee,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        // form failures were already listed field by field
        if !matches!(err, Error::Validation(_)) {
            eprintln!("Error: {}", err);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        wellness_core::logging::init_with_level("debug");
    } else {
        wellness_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Login { name }) => cmd_login(&name),
        Some(Commands::Home) | None => {
            print_home(&config.profile.display_name);
            Ok(())
        }
        Some(Commands::Profile { name }) => {
            cmd_profile(name.as_deref(), &config);
            Ok(())
        }
        Some(Commands::Bmi(args)) => cmd_bmi(args, &config),
        Some(Commands::BodyFat(args)) => cmd_body_fat(args, &config),
        Some(Commands::Breathe { minutes, speed }) => {
            let minutes = minutes.unwrap_or(config.breathing.default_minutes);
            cmd_breathe(minutes, speed, &config)
        }
        Some(Commands::Info { topic }) => {
            println!("{}", MethodTopic::from(topic).explanation());
            Ok(())
        }
    }
}

// ============================================================================
// Login / Home / Profile
// ============================================================================

fn cmd_login(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidValue("Please enter your name".into()));
    }

    tracing::info!("Signed in as {}", name);
    println!("Welcome, {}!", name);
    print_home(name);
    Ok(())
}

fn print_home(name: &str) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  Hello, {}", name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  bmi        Body Mass Index calculator");
    println!("  body-fat   Body fat, BMR and daily calories");
    println!("  breathe    Guided breathing exercise");
    println!("  profile    Your settings");
    println!();
}

fn cmd_profile(name: Option<&str>, config: &Config) {
    let profile = &config.profile;
    let name = name.unwrap_or(&profile.display_name);

    println!("Profile");
    println!("  Name:      {}", name);
    println!("  Gender:    {}", profile.gender);
    println!(
        "  Units:     {} ({}/{})",
        profile.unit_system,
        profile.unit_system.length_label(),
        profile.unit_system.mass_label()
    );
    println!(
        "  Activity:  {} ({})",
        profile.activity_level,
        profile.activity_level.description()
    );
    println!(
        "  Breathing: {} min sessions",
        config.breathing.default_minutes
    );
}

// ============================================================================
// Calculators
// ============================================================================

fn cmd_bmi(args: BmiArgs, config: &Config) -> Result<()> {
    let height = if args.feet.is_some() || args.inches.is_some() {
        HeightInput::FeetInches {
            feet: args.feet,
            inches: args.inches,
        }
    } else {
        HeightInput::Centimeters(args.height_cm)
    };
    let weight = match args.pounds {
        Some(lb) => WeightInput::Pounds(Some(lb)),
        None => WeightInput::Kilograms(args.weight_kg),
    };
    let form = BmiForm { height, weight };

    let mut calculator = BmiCalculator::new(config.history.bmi_capacity);
    let reading = match calculator.calculate(&form) {
        Ok(reading) => reading,
        Err(report) => return Err(report_failure(report)),
    };

    let Some(reading) = reading else {
        println!("Height and weight must be greater than zero.");
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
        return Ok(());
    }

    println!("Your BMI: {:.1}", reading.bmi);
    println!("Category: {}", reading.category);
    println!("  15 {} 35", scale_bar(reading.scale_position));
    println!();
    println!("{}", reading.health_tip);
    Ok(())
}

fn cmd_body_fat(args: BodyFatArgs, config: &Config) -> Result<()> {
    let profile = &config.profile;
    let form = BodyFatForm {
        gender: args.gender.unwrap_or(profile.gender),
        age: args.age,
        weight: args.weight,
        height: args.height,
        neck: args.neck,
        waist: args.waist,
        hip: args.hip,
        wrist: args.wrist,
        forearm: args.forearm,
        activity_level: args.activity.unwrap_or(profile.activity_level),
        unit_system: args.unit.unwrap_or(profile.unit_system),
    };

    let mut calculator = BodyFatCalculator::new(config.history.body_fat_capacity);
    let metrics = match calculator.calculate(&form) {
        Ok(metrics) => metrics,
        Err(report) => return Err(report_failure(report)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    print_body_fat(&metrics, &form);
    Ok(())
}

fn print_body_fat(metrics: &DerivedMetrics, form: &BodyFatForm) {
    let percent = |value: Option<f64>| match value {
        Some(v) => format!("{:.1}%", v),
        None => "n/a".to_string(),
    };

    println!("Body Fat Results");
    println!("  U.S. Navy method:  {}", percent(metrics.body_fat_navy));
    println!("  BMI method:        {}", percent(metrics.body_fat_bmi));
    println!("  Jackson-Pollock:   {}", percent(metrics.body_fat_jackson));
    if let Some(category) = metrics.body_fat_category {
        println!("  Category:          {}", category);
    }
    if let Some(comp) = metrics.body_composition {
        let unit = form.unit_system.mass_label();
        println!("  Fat mass:          {:.1} {}", comp.fat_mass, unit);
        println!("  Lean mass:         {:.1} {}", comp.lean_mass, unit);
    }

    println!();
    if let (Some(bmi), Some(category)) = (metrics.bmi, metrics.bmi_category) {
        println!("  BMI:               {:.1} ({})", bmi, category);
    }
    if let Some(bmr) = metrics.bmr {
        println!("  BMR:               {} kcal/day", bmr);
    }
    if let Some(tdee) = metrics.tdee {
        println!(
            "  TDEE:              {} kcal/day ({})",
            tdee, form.activity_level
        );
    }

    if let Some(goals) = metrics.calorie_goals {
        println!();
        println!("Daily Calorie Goals");
        println!("  Maintain weight:   {} kcal", goals.maintain);
        println!("  Mild loss:         {} kcal", goals.mild_loss);
        println!("  Moderate loss:     {} kcal", goals.moderate_loss);
        println!("  Weight gain:       {} kcal", goals.gain);
    }
}

fn report_failure(report: ValidationReport) -> Error {
    eprintln!("Please correct the following:");
    for (field, message) in report.iter() {
        eprintln!("  {}: {}", field, message);
    }
    Error::Validation(report)
}

fn scale_bar(position: f64) -> String {
    const WIDTH: usize = 20;
    let marker = ((position / 100.0) * WIDTH as f64).round() as usize;
    (0..=WIDTH)
        .map(|i| if i == marker.min(WIDTH) { '▲' } else { '─' })
        .collect()
}

// ============================================================================
// Breathing
// ============================================================================

/// Stands in for the vibration motor: one log line per cue
struct TerminalHaptics;

impl HapticCue for TerminalHaptics {
    fn cycle_completed(&mut self) {
        tracing::debug!("haptic pulse {}ms", CYCLE_PULSE_MS);
    }

    fn session_completed(&mut self) {
        tracing::debug!("haptic pattern {:?}", COMPLETION_PATTERN_MS);
    }
}

/// Clock multipliers `--speed` accepts
const MIN_SPEED: f64 = 0.1;
const MAX_SPEED: f64 = 1000.0;

fn cmd_breathe(minutes: u32, speed: f64, config: &Config) -> Result<()> {
    if minutes == 0 {
        return Err(Error::InvalidValue(
            "session length must be at least 1 minute".into(),
        ));
    }
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(Error::InvalidValue(format!(
            "speed must be between {} and {}, got {}",
            MIN_SPEED, MAX_SPEED, speed
        )));
    }
    let options = &config.breathing.duration_options;
    if !options.contains(&minutes) {
        let listed: Vec<String> = options.iter().map(|m| m.to_string()).collect();
        return Err(Error::InvalidValue(format!(
            "{} min is not an available session length (choose {})",
            minutes,
            listed.join(", ")
        )));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(run_breathing(minutes, speed));
    // a pending stdin read must not hold up exit
    runtime.shutdown_background();
    result
}

async fn run_breathing(minutes: u32, speed: f64) -> Result<()> {
    let mut timer = BreathTimer::new(
        BreathSession::new(minutes),
        TimerQueue::new(),
        TerminalHaptics,
    );

    println!("Breathing Exercise ({} min)", minutes);
    println!("Commands: p + Enter = pause/resume, r = reset, s = start, q = quit");
    println!();
    println!("Tips:");
    for tip in BREATHING_TIPS {
        println!("  • {}", tip);
    }
    println!();

    if let Some(event) = timer.start(minutes) {
        render_event(&event, timer.session());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    // session clock = virtual_base + (wall - wall_base) * speed
    let mut virtual_base = timer.scheduler().now();
    let mut wall_base = Instant::now();
    let to_wall = |virtual_at: Duration, virtual_base: Duration, wall_base: Instant| {
        let ahead = virtual_at.saturating_sub(virtual_base).as_secs_f64();
        wall_base + Duration::from_secs_f64(ahead / speed)
    };
    let virtual_now = |virtual_base: Duration, wall_base: Instant| {
        virtual_base + Duration::from_secs_f64(wall_base.elapsed().as_secs_f64() * speed)
    };

    loop {
        if timer.session().status() == SessionStatus::Completed {
            break;
        }

        let next_due = timer.next_due();
        let wake_at = next_due
            .map(|due| to_wall(due, virtual_base, wall_base))
            .unwrap_or_else(Instant::now);

        tokio::select! {
            _ = tokio::time::sleep_until(wake_at), if next_due.is_some() => {
                if let Some(due) = next_due {
                    for event in timer.advance_to(due) {
                        render_event(&event, timer.session());
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                let command = match line {
                    Ok(Some(line)) => line,
                    Ok(None) | Err(_) => {
                        tracing::debug!("stdin closed, session continues");
                        stdin_open = false;
                        continue;
                    }
                };

                // catch up before acting on the command
                let now = virtual_now(virtual_base, wall_base);
                for event in timer.advance_to(now) {
                    render_event(&event, timer.session());
                }

                let event = match command.trim().to_lowercase().as_str() {
                    "p" => timer.toggle(),
                    "r" => Some(timer.reset()),
                    "s" => timer.start(minutes),
                    "q" => {
                        timer.reset();
                        println!("Session stopped.");
                        return Ok(());
                    }
                    "" => None,
                    other => {
                        println!("Unknown command '{}'", other);
                        None
                    }
                };
                if let Some(event) = event {
                    render_event(&event, timer.session());
                }

                virtual_base = timer.scheduler().now();
                wall_base = Instant::now();
            }
            else => {
                tracing::debug!("nothing scheduled and no input left");
                break;
            }
        }
    }

    if timer.session().status() != SessionStatus::Completed {
        println!("Session ended.");
    }
    Ok(())
}

fn render_event(event: &SessionEvent, session: &BreathSession) {
    let clock = format_clock(session.remaining_seconds());
    match event {
        SessionEvent::Started { duration_seconds } => {
            println!("Session started: {}", format_clock(*duration_seconds));
            print_phase(&clock, session.phase());
        }
        SessionEvent::PhaseChanged { phase } => print_phase(&clock, *phase),
        SessionEvent::CycleCompleted { completed_cycles } => {
            println!(
                "  {}  cycle {} done ({}%)",
                clock,
                completed_cycles,
                session.progress_percent()
            );
            print_phase(&clock, session.phase());
        }
        SessionEvent::Paused => println!("  {}  Paused", clock),
        SessionEvent::Resumed => {
            println!("  {}  Resumed", clock);
            print_phase(&clock, session.phase());
        }
        SessionEvent::Reset => println!("Session reset ({}). Send s to start.", clock),
        SessionEvent::Completed { completed_cycles } => {
            println!();
            println!("Session Complete");
            println!(
                "Congratulations! You've completed {} breath cycles.",
                completed_cycles
            );
        }
    }
}

fn print_phase(clock: &str, phase: Phase) {
    let label = match phase {
        Phase::Inhale => "INHALE",
        Phase::Hold => "HOLD",
        Phase::Exhale => "EXHALE",
        Phase::Rest => "REST",
    };
    let guidance: Vec<&str> = phase.instruction().lines().collect();
    println!(
        "  {}  {:<6} {} ({}s)",
        clock,
        label,
        guidance.join(", "),
        phase.duration_secs()
    );
}
