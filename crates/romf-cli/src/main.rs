use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use romf_cli::commands;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("ROMF_LOG", "error,romf=info"))
        .init();

    let matches = cli().get_matches();
    run(&matches)
}

fn cli() -> Command {
    Command::new("romf")
        .version(clap::crate_version!())
        .about("\u{1F332} romf - train, apply and score random forest classifiers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Fit a random forest and save it to disk")
                .arg(
                    Arg::new("config")
                        .help("Path to the JSON hyperparameter file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train_data")
                        .short('d')
                        .long("train_data")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Labeled CSV/TSV training data with a `label` column")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value("model.romf")
                        .help("File path the trained model will be written to")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_fraction")
                        .short('t')
                        .long("test_fraction")
                        .value_parser(clap::value_parser!(f64))
                        .help(
                            "Hold out this fraction of rows and report accuracy on them. \
                             The split is seeded with the config's random_state.",
                        ),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Predict labels with a saved model")
                .arg(model_arg())
                .arg(data_arg("Feature CSV/TSV to predict on"))
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Write predictions here instead of stdout")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Report the accuracy of a saved model on labeled data")
                .arg(model_arg())
                .arg(data_arg("Labeled CSV/TSV with a `label` column")),
        )
}

fn model_arg() -> Arg {
    Arg::new("model")
        .help("Path to a saved model")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn data_arg(help: &'static str) -> Arg {
    Arg::new("data")
        .short('d')
        .long("data")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help(help)
        .value_hint(ValueHint::FilePath)
}

fn path_arg(matches: &ArgMatches, id: &str) -> PathBuf {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .unwrap_or_else(|| unreachable!("clap enforces required argument {}", id))
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("train", sub)) => {
            let output = path_arg(sub, "output_file");
            let summary = commands::train(
                path_arg(sub, "config"),
                path_arg(sub, "train_data"),
                output.clone(),
                sub.get_one::<f64>("test_fraction").copied(),
            )?;
            log::info!(
                "trained on {} rows x {} features, saved to {}",
                summary.n_train,
                summary.n_features,
                output.display()
            );
            if let Some(accuracy) = summary.held_out_accuracy {
                println!("held-out accuracy: {:.4}", accuracy);
            }
        }
        Some(("predict", sub)) => {
            let predictions = commands::predict(path_arg(sub, "model"), path_arg(sub, "data"))?;
            match sub.get_one::<PathBuf>("output_file") {
                Some(path) => {
                    commands::write_predictions(path, &predictions)?;
                    log::info!("wrote {} predictions to {}", predictions.len(), path.display());
                }
                None => {
                    for label in &predictions {
                        println!("{}", label);
                    }
                }
            }
        }
        Some(("evaluate", sub)) => {
            let accuracy = commands::evaluate(path_arg(sub, "model"), path_arg(sub, "data"))?;
            println!("accuracy: {:.4}", accuracy);
        }
        _ => unreachable!("subcommand_required is set"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn train_defaults_output_file() {
        let matches = cli()
            .try_get_matches_from(["romf", "train", "cfg.json", "-d", "train.csv"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(path_arg(sub, "output_file"), PathBuf::from("model.romf"));
        assert!(sub.get_one::<f64>("test_fraction").is_none());
    }

    #[test]
    fn train_parses_test_fraction() {
        let matches = cli()
            .try_get_matches_from([
                "romf", "train", "cfg.json", "-d", "train.csv", "--test_fraction", "0.25",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<f64>("test_fraction").copied(), Some(0.25));
    }

    #[test]
    fn predict_requires_data() {
        assert!(cli()
            .try_get_matches_from(["romf", "predict", "model.romf"])
            .is_err());
    }
}
