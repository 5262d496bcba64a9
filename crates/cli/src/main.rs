use census::InpatientStatus;
use clap::{Parser, Subcommand};
use his_core::constants::WARD_DEPARTMENTS;
use his_core::input::{parse_count, parse_date, parse_measure, parse_optional_count, parse_time};
use his_core::pack_years::pack_years;
use his_core::{
    CoreConfig, Form, MedicalRecordForm, PatientInfo, RecordAction, RecordSeed, RecordType,
    StatusFilter, TagField, UseStatus, WardBoard,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "his")]
#[command(about = "Hospital information system ward and form tools")]
struct Cli {
    /// Census YAML file (defaults to the bundled sample ward)
    #[arg(long, global = true, env = "HIS_CENSUS_PATH")]
    census: Option<PathBuf>,
    /// Clinician recorded on new medical records
    #[arg(long, global = true, env = "HIS_CLINICIAN")]
    clinician: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List inpatients on the ward
    Inpatients {
        /// Match patient name, patient ID or attending doctor
        #[arg(long)]
        search: Option<String>,
        /// Status key or label (admitted, critical, 稳定, ...)
        #[arg(long)]
        status: Option<String>,
        /// Exact department name
        #[arg(long)]
        department: Option<String>,
    },
    /// List admission requests
    Requests {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Approve an admission request and assign a bed
    Approve {
        request_id: String,
        bed_number: String,
        /// Print the updated census as YAML
        #[arg(long)]
        print_census: bool,
    },
    /// Reject an admission request
    Reject {
        request_id: String,
        reason: String,
        #[arg(long)]
        print_census: bool,
    },
    /// Compute smoking pack-years
    PackYears {
        /// never, current or former
        #[arg(long, default_value = "current")]
        status: String,
        /// Cigarettes per day
        cigarettes_per_day: String,
        /// Years smoked
        years: String,
    },
    /// Show preset palettes for tag fields
    Presets {
        /// Tag field (exposures, tobacco_types, ...); all fields when omitted
        field: Option<String>,
    },
    /// Open a new medical record for an inpatient and print its summary
    RecordTemplate {
        /// Inpatient ID (for example IP-001)
        inpatient_id: String,
        /// admission, progress, nursing, operation or discharge
        #[arg(long = "type", default_value = "admission")]
        record_type: String,
        /// Record date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Record time as HH:MM (defaults to now)
        #[arg(long)]
        time: Option<String>,
        /// Body temperature in degrees Celsius
        #[arg(long)]
        temperature: Option<String>,
        /// Heart rate in beats per minute; empty keeps the default
        #[arg(long)]
        heart_rate: Option<String>,
        /// Print the draft as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
}

fn parse_use_status(raw: &str) -> Result<UseStatus, String> {
    match raw.trim() {
        "never" => Ok(UseStatus::Never),
        "current" => Ok(UseStatus::Current),
        "former" => Ok(UseStatus::Former),
        other => Err(format!("unknown smoking status '{other}'")),
    }
}

fn config_from_args(cli: &Cli) -> Result<CoreConfig, Box<dyn std::error::Error>> {
    let clinician = his_core::config::clinician_from_env_value(cli.clinician.clone());
    let census_path = his_core::config::census_path_from_env_value(
        cli.census.as_ref().map(|path| path.display().to_string()),
    );
    Ok(CoreConfig::new(&clinician, census_path)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config_from_args(&cli)?;

    match cli.command {
        Some(Commands::Inpatients {
            search,
            status,
            department,
        }) => {
            let mut board = WardBoard::from_config(&config)?;
            board.set_search(search.unwrap_or_default());
            if let Some(status) = status {
                board.set_status_filter(StatusFilter::Only(status.parse::<InpatientStatus>()?));
            }
            board.set_department_filter(department);

            let inpatients = board.filtered_inpatients();
            if inpatients.is_empty() {
                println!("No inpatients found.");
            } else {
                for p in inpatients {
                    println!(
                        "{} {} ({}) {}岁 {} | {} {}-{} | {} / {} | {} | {}",
                        p.id,
                        p.patient_name,
                        p.patient_id,
                        p.age,
                        p.sex,
                        p.ward,
                        p.room,
                        p.bed_number,
                        p.department,
                        p.doctor,
                        p.status,
                        p.diagnosis.join(", ")
                    );
                }
            }
        }
        Some(Commands::Requests { search, department }) => {
            let mut board = WardBoard::from_config(&config)?;
            board.set_search(search.unwrap_or_default());
            board.set_department_filter(department);

            println!("Pending requests: {}", board.pending_request_count());
            for r in board.filtered_requests() {
                println!(
                    "{} {} ({}) {} | {} / {} | {} | {} | {}",
                    r.id,
                    r.patient_name,
                    r.patient_id,
                    r.request_date,
                    r.department,
                    r.doctor,
                    r.diagnosis,
                    r.urgency,
                    r.status
                );
            }
        }
        Some(Commands::Approve {
            request_id,
            bed_number,
            print_census,
        }) => {
            let mut board = WardBoard::from_config(&config)?;
            match board.approve_admission(&request_id, &bed_number) {
                Ok(()) => {
                    println!("Approved {} with bed {}", request_id, bed_number);
                    if print_census {
                        print!("{}", board.render_census()?);
                    }
                }
                Err(e) => eprintln!("Error approving admission request: {}", e),
            }
        }
        Some(Commands::Reject {
            request_id,
            reason,
            print_census,
        }) => {
            let mut board = WardBoard::from_config(&config)?;
            match board.reject_admission(&request_id, &reason) {
                Ok(()) => {
                    println!("Rejected {}: {}", request_id, reason);
                    if print_census {
                        print!("{}", board.render_census()?);
                    }
                }
                Err(e) => eprintln!("Error rejecting admission request: {}", e),
            }
        }
        Some(Commands::PackYears {
            status,
            cigarettes_per_day,
            years,
        }) => {
            let status = parse_use_status(&status)?;
            let per_day = parse_count("cigarettes_per_day", &cigarettes_per_day)?;
            let years = parse_count("years", &years)?;
            match pack_years(status, per_day, years) {
                Some(value) => println!("{value:.1} pack-years"),
                None => println!("No pack-years value (no smoking exposure recorded)"),
            }
        }
        Some(Commands::Presets { field }) => {
            let fields = match &field {
                Some(name) => vec![serde_json::from_value::<TagField>(
                    serde_json::Value::String(name.clone()),
                )?],
                None => TagField::ALL.to_vec(),
            };
            for tag_field in fields {
                println!(
                    "{}: {}",
                    serde_json::to_value(tag_field)?.as_str().unwrap_or_default(),
                    tag_field.palette().join(", ")
                );
            }
            if field.is_none() {
                println!("departments: {}", WARD_DEPARTMENTS.join(", "));
            }
        }
        Some(Commands::RecordTemplate {
            inpatient_id,
            record_type,
            date,
            time,
            temperature,
            heart_rate,
            json,
        }) => {
            let board = WardBoard::from_config(&config)?;
            let Some(inpatient) = board.inpatient(&inpatient_id) else {
                eprintln!("Error: unknown inpatient {}", inpatient_id);
                return Ok(());
            };
            let record_type: RecordType =
                serde_json::from_value(serde_json::Value::String(record_type))?;
            let now = chrono::Local::now().naive_local();
            let record_date = match date {
                Some(raw) => parse_date("date", &raw)?,
                None => now.date(),
            };
            let record_time = match time {
                Some(raw) => parse_time("time", &raw)?,
                None => now.time(),
            };
            let mut form = MedicalRecordForm::open(
                PatientInfo::from(inpatient),
                record_type,
                RecordSeed::default(),
                &config,
                record_date.and_time(record_time),
            );
            if let Some(raw) = temperature {
                form.apply(RecordAction::SetTemperature(parse_measure("temperature", &raw)?))?;
            }
            if let Some(raw) = heart_rate {
                if let Some(rate) = parse_optional_count("heart_rate", &raw)? {
                    form.apply(RecordAction::SetHeartRate(rate))?;
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else {
                println!("{}", form.summary());
            }
        }
        None => {
            println!("Use 'his --help' for commands");
        }
    }

    Ok(())
}
