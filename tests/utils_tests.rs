//! Unit tests for configuration loading, operators and reporting utilities.

use crossover_ga::chromosome::{Chromosome, Direction};
use crossover_ga::config::Config;
use crossover_ga::error::Error;
use crossover_ga::mutation::{BitFlipMutation, MutationOperator};
use crossover_ga::observer::{GenerationObserver, LogObserver, NoopObserver};
use crossover_ga::population::Population;
use crossover_ga::selection::{DeterministicTournament, RankingSelection, SelectionOperator};
use crossover_ga::set_covering::{CoverageMatrix, SetCoveringProblem};
use crossover_ga::termination::{AnyContinuator, Continuator, GenerationContinuator};
use crossover_ga::utils::{self, RunRecord};
use crossover_ga::GeneticAlgorithm;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// A path in the system temp directory unique to this test binary.
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("crossover_ga_{}_{}", std::process::id(), name))
}

fn create_population() -> Population {
    (0..5)
        .map(|i| {
            let mut chromosome = Chromosome::zeros(3);
            chromosome.set_fitness(i as f64);
            chromosome
        })
        .collect()
}

#[test]
fn test_format_duration() {
    assert_eq!(utils::format_duration(Duration::from_secs(0)), "0h 00m 00.000s");
    assert_eq!(
        utils::format_duration(Duration::from_millis(3_723_250)),
        "1h 02m 03.250s"
    );
}

#[test]
fn test_config_defaults_and_builders() {
    let config = Config::default();
    assert_eq!(config.population_size, 100);
    assert_eq!(config.generations, 50);
    assert_eq!(config.crossover_id, 0);
    assert_eq!(config.crossover_rate, 0.8);
    assert_eq!(config.mutation_rate, 0.05);
    assert_eq!(config.elitism, 1);
    assert_eq!(config.tournament_size, 8);
    assert_eq!(config.id, None);
    assert!(config.validate().is_ok());

    let config = Config::new().with_mutation_rate(-0.1);
    assert!(matches!(config.validate(), Err(Error::Configuration(_))));

    let config = Config::new().with_population_size(4).with_elitism(5);
    assert!(config.validate().is_err());
}

#[test]
fn test_config_from_json_file() {
    let path = temp_path("config.json");
    fs::write(
        &path,
        r#"{"id": "scp41-two-point", "population_size": 30, "generations": 10,
            "crossover_id": 2, "crossover_rate": 0.9, "mutation_rate": 0.01, "seed": 5}"#,
    )
    .unwrap();

    let config = Config::from_json_file(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.population_size, 30);
    assert_eq!(config.generations, 10);
    assert_eq!(config.crossover_id, 2);
    assert_eq!(config.seed, 5);
    assert_eq!(config.id.as_deref(), Some("scp41-two-point"));
    // Not given, so the default applies
    assert_eq!(config.tournament_size, 8);
}

#[test]
fn test_config_file_missing_required_key() {
    let path = temp_path("incomplete.json");
    fs::write(&path, r#"{"population_size": 30, "generations": 10}"#).unwrap();

    let result = Config::from_json_file(&path);
    fs::remove_file(&path).ok();

    match result {
        Err(Error::Configuration(message)) => assert!(message.contains("crossover_id")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_config_file_must_be_a_map() {
    let path = temp_path("list.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let result = Config::from_json_file(&path);
    fs::remove_file(&path).ok();
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_run_record_round_trip() {
    let matrix = CoverageMatrix::from_columns(
        4,
        &[vec![0, 1], vec![1, 2], vec![0, 2, 3]],
        vec![2.0, 3.0, 1.0],
    )
    .unwrap();
    let problem = SetCoveringProblem::new("small.txt".to_string(), matrix);
    let config = Config::new()
        .with_id("small-one-point")
        .with_population_size(6)
        .with_generations(4)
        .with_crossover_id(1);

    let mut algorithm = GeneticAlgorithm::new(problem, config.clone()).unwrap();
    let outcome = algorithm
        .run(&mut |_: usize, _: &Population| {})
        .unwrap();

    let record = RunRecord::new(&algorithm.problem, &config, "1-Pontos", &outcome);
    assert_eq!(record.acronym, "SCP");
    assert_eq!(record.instance, "small.txt");
    assert_eq!(record.convergence.len(), 4);
    assert!(record.selected_columns.iter().all(|&c| (1..=3).contains(&c)));
    assert_eq!(record.total_cost, algorithm.problem.total_cost(&outcome.best));

    let path = temp_path("record.json");
    utils::save_run_record(&record, &path).unwrap();
    let loaded = utils::load_run_record(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(loaded.id.as_deref(), Some("small-one-point"));
    assert_eq!(loaded.crossover_name, "1-Pontos");
    assert_eq!(loaded.population_size, 6);
    assert_eq!(loaded.selected_columns, record.selected_columns);
    assert_eq!(loaded.convergence, record.convergence);
}

#[test]
fn test_format_parameters() {
    let table = utils::format_parameters(&Config::new(), "Uniforme");
    assert!(table.contains("Population : 100"));
    assert!(table.contains("Crossover  : Uniforme"));
    assert!(table.contains("Cross. rate: 80%"));
}

#[test]
fn test_tournament_prefers_better_individuals() {
    let population = create_population();
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    // A ring as large as the population almost always finds the best
    let selected = DeterministicTournament::new(50).select(&population, Direction::Maximize, 10, &mut rng);
    assert_eq!(selected.len(), 10);
    assert!(selected.iter().all(|c| c.fitness() == Some(4.0)));

    let selected = DeterministicTournament::new(50).select(&population, Direction::Minimize, 3, &mut rng);
    assert!(selected.iter().all(|c| c.fitness() == Some(0.0)));

    let empty = Population::default();
    assert!(DeterministicTournament::default()
        .select(&empty, Direction::Maximize, 4, &mut rng)
        .is_empty());
}

#[test]
fn test_ranking_never_selects_the_worst_at_full_pressure() {
    let population = create_population();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let selected = RankingSelection::default().select(&population, Direction::Maximize, 200, &mut rng);
    assert_eq!(selected.len(), 200);
    assert!(selected.iter().all(|c| c.fitness() != Some(0.0)));
    assert!(selected.iter().any(|c| c.fitness() == Some(4.0)));
}

#[test]
fn test_bit_flip_mutation_rates() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);

    let mut chromosome = Chromosome::zeros(16);
    chromosome.set_fitness(1.0);
    assert!(!BitFlipMutation::new(0.0).mutate(&mut chromosome, &mut rng));
    assert_eq!(chromosome.fitness(), Some(1.0));

    assert!(BitFlipMutation::new(1.0).mutate(&mut chromosome, &mut rng));
    assert_eq!(chromosome.count_ones(), 16);
    assert!(!chromosome.is_evaluated());
}

#[test]
fn test_continuators() {
    let population = create_population();

    let mut generations = GenerationContinuator::new(2);
    assert!(generations.should_continue(0, &population));
    assert!(generations.should_continue(1, &population));
    assert!(!generations.should_continue(2, &population));

    let mut any = AnyContinuator::new()
        .with(Box::new(GenerationContinuator::new(10)))
        .with(Box::new(GenerationContinuator::new(3)));
    assert!(any.should_continue(2, &population));
    assert!(!any.should_continue(3, &population));
}

#[test]
fn test_observers_do_not_panic_on_any_population() {
    let population = create_population();
    LogObserver::new(Direction::Maximize).on_generation(1, &population);
    LogObserver::inverse_cost(Direction::Maximize).on_generation(2, &population);
    LogObserver::new(Direction::Maximize).on_generation(3, &Population::default());
    NoopObserver.on_generation(4, &population);
}
