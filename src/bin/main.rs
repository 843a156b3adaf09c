// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use clap::Parser;
use txs::estimates::EstimatesStore;
use txs::naming::Range;
use txs::user_config::UserConfig;

#[derive(Debug, clap::Parser)]
#[command(long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(long, short, default_value_t = String::from("txs.json"))]
    conf: String,
    /// Create a template for the configuration file.
    #[arg(long, short)]
    template: bool,
    /// Colon-separated encoder settings shared by all samples (colons in
    /// values must be escaped), overrides the configuration file.
    #[arg(long, short = 'x')]
    settings: Option<String>,
    /// Time range in the source, e.g., "10:00 60", overrides the
    /// configuration file.
    #[arg(long, short, num_args = 2, value_names = ["START", "DURATION"])]
    range: Option<Vec<String>>,
    /// Estimates file, relative to the samples directory, overrides the
    /// configuration file.
    #[arg(long, short)]
    estimates_file: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Show the samples generated by given sample settings.
    Plan {
        /// Path to the source.
        #[arg(long, short)]
        source: String,
        /// Settings to test: values are separated by "/", flags are also
        /// tested without them.
        #[arg(long = "sample-settings", num_args = 1.., required = true)]
        sample_settings: Vec<String>,
        /// Print the full settings of all the samples as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Record the estimated encoding time and final size of a sample.
    Record {
        /// Directory that contains the samples.
        samples: String,
        /// Settings that identify the sample.
        #[arg(long)]
        diff: String,
        /// Encoding time, in s.
        #[arg(long)]
        time: f64,
        /// Final size, in bytes.
        #[arg(long)]
        size: f64,
        /// Duration of the sample, in s. With --source-duration, time and
        /// size are those of the sample and are scaled to the whole source.
        #[arg(long, requires = "source_duration")]
        sample_duration: Option<f64>,
        /// Duration of the source, in s.
        #[arg(long, requires = "sample_duration")]
        source_duration: Option<f64>,
    },
    /// Remove the estimates of a sample.
    Forget {
        /// Directory that contains the samples.
        samples: String,
        /// Settings that identify the sample.
        #[arg(long)]
        diff: String,
    },
    /// Show all the estimates recorded.
    Estimates {
        /// Directory that contains the samples.
        samples: String,
    },
    /// Show the settings of the test encode used to find consecutive
    /// B-frames, which are optimized for speed, e.g., crf=51.
    Bframes {
        /// Path to the source.
        #[arg(long, short)]
        source: String,
        /// Maximum number of consecutive B-frames in the test encode.
        #[arg(long, short, default_value_t = String::from("16"))]
        bframes: String,
        /// Adaptive B-frame decision method.
        #[arg(long, short = 'a', default_value_t = String::from("2"))]
        b_adapt: String,
        /// Log of the test encode, to show the consecutive B-frames percentages.
        #[arg(long, short)]
        log: Option<String>,
    },
    /// Show a tutorial that explains the basic workflow.
    Tutorial,
}

static TUTORIAL: &str = r"Expand sample settings into all their combinations:

    $ txs -x crf=19:me=umh -r 25:00 10 plan -s source.mkv \
      --sample-settings aq-strength=0.5/1.0:aq-mode=2/3:no-deblock

All the samples share the base settings crf=19:me=umh, start at 25:00 in
source.mkv and last 10 seconds. The values of each setting are separated by
'/' and every flag, such as no-deblock, is also tested without it, hence the
command above lists 8 samples in the directory
samples.source@25:00-10.aq-strength:aq-mode:no-deblock:

    source.sample@25:00-10.crf=19:me=umh:aq-strength=0.5:aq-mode=2.mkv
    source.sample@25:00-10.crf=19:me=umh:aq-strength=0.5:aq-mode=2:no-deblock.mkv
    ...
    source.sample@25:00-10.crf=19:me=umh:aq-strength=1.0:aq-mode=3:no-deblock.mkv

Several sets of sample settings limit the number of combinations:

    $ txs -x crf=19:me=umh -r 25:00 10 plan -s source.mkv \
      --sample-settings aq-strength=0.5/1.0 aq-mode=2/3

lists 4 samples, two with different aq-strength and two with different
aq-mode. Colons, '=', '/' and '\' in values are escaped with '\'.

After encoding a sample, record how long the whole source would take and how
large it would be, scaling the measures of the sample:

    $ txs record SAMPLES_DIR --diff aq-strength=0.5:aq-mode=2 \
      --time 30 --size 5000000 --sample-duration 10 --source-duration 5400

The estimates are shown by the plan and estimates subcommands, and removed
with the forget subcommand.";

fn plan(
    user_config: &UserConfig,
    source: &str,
    sample_settings: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let base_settings = user_config.base_settings()?;
    let samples = txs::combinations::expand(
        &sample_settings
            .iter()
            .map(|x| x.as_str())
            .collect::<Vec<&str>>(),
    )?;
    let full_settings = samples
        .iter()
        .map(|diff| txs::merge::merge(&[&base_settings, diff]))
        .collect::<Vec<_>>();

    if json {
        println!("{}", serde_json::to_string_pretty(&full_settings)?);
        return Ok(());
    }

    let title = txs::utils::title(std::path::Path::new(source));
    let samples_dir = std::path::Path::new(".").join(txs::naming::samples_dir_name(
        &title,
        &user_config.range,
        &samples,
    ));
    let store = EstimatesStore::new(samples_dir.join(&user_config.estimates_file));

    println!(
        "    Base settings: {}",
        txs::render::render(&base_settings, false)?
    );
    println!(
        "{:9} samples: {}",
        samples.len(),
        txs::render::render_all(&samples)
    );
    println!("Samples directory: {}", samples_dir.display());
    println!(
        "          Excerpt: {}",
        txs::naming::excerpt_file_name(&title, &user_config.range, &user_config.extension)
    );

    let estimates = store.read()?;
    for (i, (diff, settings)) in samples.iter().zip(full_settings.iter()).enumerate() {
        let key = txs::render::render(diff, false)?;
        println!("Sample {}/{}: {}", i + 1, samples.len(), key);
        println!(
            "  {}",
            txs::naming::sample_file_name(
                &title,
                &user_config.range,
                settings,
                &user_config.extension
            )?
        );
        if let Some(estimate) = estimates.get(&key) {
            println!("  Estimated encoding time: {}", estimate.time_display);
            println!("     Estimated final size: {}", estimate.size_display);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    // If requested, save a template configuration file and quit.
    let conf_path = std::path::Path::new(&args.conf);
    if args.template {
        if conf_path.exists() {
            log::warn!("File {:#?} exists and will not be overwritten", conf_path);
        } else {
            std::fs::write(
                conf_path,
                serde_json::to_string_pretty(&UserConfig::default())?,
            )?;
        }
        return Ok(());
    }

    // Read the user's configuration file, then apply the command-line overrides.
    let mut user_config = UserConfig::load(conf_path)?;
    if let Some(settings) = args.settings {
        user_config.settings = settings;
    }
    if let Some(range) = args.range {
        anyhow::ensure!(range.len() == 2, "--range requires START and DURATION");
        user_config.range = Range {
            start: range[0].clone(),
            duration: range[1].clone(),
        };
    }
    if let Some(estimates_file) = args.estimates_file {
        user_config.estimates_file = estimates_file;
    }

    let store = |samples: &str| {
        EstimatesStore::new(std::path::Path::new(samples).join(&user_config.estimates_file))
    };

    match args.command {
        None => {
            anyhow::bail!("missing subcommand, run with --help for a list")
        }
        Some(Command::Plan {
            source,
            sample_settings,
            json,
        }) => plan(&user_config, &source, &sample_settings, json),
        Some(Command::Record {
            samples,
            diff,
            time,
            size,
            sample_duration,
            source_duration,
        }) => {
            let (time, size) = match (sample_duration, source_duration) {
                (Some(sample_duration), Some(source_duration)) => {
                    txs::estimates::Estimate::extrapolate(
                        time,
                        size,
                        sample_duration,
                        source_duration,
                    )?
                }
                _ => (time, size),
            };
            let diff_settings = txs::settings::parse(&[diff.as_str()])?;
            anyhow::ensure!(!diff_settings.is_empty(), "empty sample settings");
            let settings = txs::merge::merge(&[&user_config.base_settings()?, &diff_settings]);
            let estimate = store(&samples).update(&diff_settings, time, size, &settings)?;
            println!("  Estimated encoding time: {}", estimate.time_display);
            println!("     Estimated final size: {}", estimate.size_display);
            Ok(())
        }
        Some(Command::Forget { samples, diff }) => {
            let diff_settings = txs::settings::parse(&[diff.as_str()])?;
            if store(&samples).remove(&diff_settings)?.is_none() {
                log::warn!("no estimates found for {}", diff);
            }
            Ok(())
        }
        Some(Command::Estimates { samples }) => {
            for (key, estimate) in store(&samples).read()?.iter() {
                println!(
                    "{} / {} / {}",
                    key, estimate.time_display, estimate.size_display
                );
            }
            Ok(())
        }
        Some(Command::Bframes {
            source,
            bframes,
            b_adapt,
            log,
        }) => {
            let title = txs::utils::title(std::path::Path::new(&source));
            let settings =
                txs::bframes::bframes_settings(&user_config.base_settings()?, &bframes, &b_adapt);
            let bframes_dir = txs::bframes::bframes_dir_name(&title, &user_config.range);
            println!("Finding consecutive B-frames with these settings:");
            println!("{}", txs::render::render(&settings, false)?);
            println!(
                "{}",
                std::path::Path::new(&bframes_dir)
                    .join(txs::bframes::bframes_file_name(
                        &title,
                        &user_config.range,
                        &settings,
                        &user_config.extension
                    )?)
                    .display()
            );
            if let Some(log) = log {
                let percentages = txs::bframes::read_bframes(std::path::Path::new(&log))?;
                for line in txs::bframes::format_bframes(&percentages) {
                    println!("{}", line);
                }
                println!(
                    "For each possible number of consecutive B-frames, show how many frames \
                     (in percent) are in such a sequence of B-frames."
                );
            }
            Ok(())
        }
        Some(Command::Tutorial) => {
            println!("{}", TUTORIAL);
            Ok(())
        }
    }
}
