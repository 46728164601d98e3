use anyhow::{bail, Context, Result};
use project_forecast::{
    config::Settings,
    users::{UserDirectory, UserLookup},
    Assessment, Assessor, CategoricalField, PredictionClient, RawFields, SystemClock,
    VocabularyStore, GENERIC_FAILURE_MESSAGE,
};
use std::{
    env, fs,
    io::{self, Read},
    process,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "\
usage:
  project_forecast assess <raw.json | ->   normalize, validate and predict
  project_forecast user <name>             show a user's project history
  project_forecast vocab                   list accepted categorical values
  project_forecast health                  check the prediction service";

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading raw fields from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(source).with_context(|| format!("reading raw fields from {source}"))
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,project_forecast=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        eprintln!("{USAGE}");
        process::exit(2);
    };

    // ─── 2) config ───────────────────────────────────────────────────
    let settings = Settings::load()?;
    info!(
        dataset = %settings.dataset_path.display(),
        api = %settings.api_base_url,
        "startup"
    );

    match command.as_str() {
        "assess" => {
            let source = args.next().unwrap_or_else(|| "-".to_string());

            // ─── 3) vocabulary: any failure here aborts ──────────────
            let store = VocabularyStore::new(&settings.dataset_path, settings.columns.clone());
            let vocabulary = store.get().context("loading reference vocabulary")?;

            let raw = RawFields::from_json_str(&read_input(&source)?)?;
            let client = PredictionClient::new(&settings.base_url()?, settings.timeout())?;
            let assessor = Assessor::new(vocabulary, settings.matcher(), client, SystemClock);

            // ─── 4) normalize → validate → predict ───────────────────
            match assessor.assess(&raw) {
                Ok(Assessment::Complete { report, .. }) => print!("{report}"),
                Ok(Assessment::Incomplete(missing)) => {
                    print!("{}", missing.message());
                    process::exit(1);
                }
                Err(e) => {
                    error!(error = %e, "prediction failed");
                    println!("{GENERIC_FAILURE_MESSAGE}");
                    process::exit(3);
                }
            }
        }

        "user" => {
            let name = args.collect::<Vec<_>>().join(" ");
            if name.trim().is_empty() {
                bail!("whose history? usage: project_forecast user <name>");
            }
            let users = UserDirectory::load(&settings.users_path)?;
            match users.lookup(&name) {
                UserLookup::Found(user) => println!("{user}"),
                UserLookup::NotFound(name) => {
                    println!("no history found for {name}");
                    process::exit(1);
                }
            }
        }

        "vocab" => {
            let store = VocabularyStore::new(&settings.dataset_path, settings.columns.clone());
            let vocabulary = store.get().context("loading reference vocabulary")?;
            for field in CategoricalField::ALL {
                println!("{}: {}", field.field().label(), vocabulary.get(field).join(", "));
            }
        }

        "health" => {
            let client = PredictionClient::new(&settings.base_url()?, settings.timeout())?;
            let health = client.health()?;
            println!("status: {}, model loaded: {}", health.status, health.model_loaded);
        }

        other => {
            eprintln!("unknown command `{other}`\n{USAGE}");
            process::exit(2);
        }
    }

    Ok(())
}
