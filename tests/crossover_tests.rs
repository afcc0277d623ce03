//! Unit tests for the crossover operators and the crossover fabric.

use crossover_ga::chromosome::Chromosome;
use crossover_ga::crossover::{CrossoverFabric, CrossoverOperator};
use crossover_ga::error::Error;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn create_parents(len: usize) -> (Chromosome, Chromosome) {
    (Chromosome::zeros(len), Chromosome::new(vec![true; len]))
}

/// Number of positions where consecutive genes differ.
fn transitions(chromosome: &Chromosome) -> usize {
    chromosome
        .genes()
        .windows(2)
        .filter(|pair| pair[0] != pair[1])
        .count()
}

#[test]
fn test_fabric_names() {
    let fabric = CrossoverFabric::new();

    assert_eq!(fabric.create(0).unwrap(), CrossoverOperator::Uniform);
    assert_eq!(fabric.name(0).unwrap(), "Uniforme");

    assert_eq!(fabric.create(3).unwrap(), CrossoverOperator::KPoint(3));
    assert_eq!(fabric.name(3).unwrap(), "3-Pontos");
}

#[test]
fn test_fabric_builds_k_point_for_any_positive_id() {
    let fabric = CrossoverFabric::new();

    assert_eq!(fabric.create(33).unwrap(), CrossoverOperator::KPoint(33));
    assert_eq!(fabric.create(40).unwrap(), CrossoverOperator::KPoint(40));
    assert_eq!(fabric.name(40).unwrap(), "40-Pontos");
    // Only the uniform operator is registered explicitly
    assert_eq!(fabric.ids().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn test_fabric_rejects_unknown_ids() {
    let fabric = CrossoverFabric::empty();

    match fabric.create(3) {
        Err(Error::UnknownOperator(id)) => assert_eq!(id, 3),
        other => panic!("expected unknown operator, got {:?}", other),
    }
    assert!(fabric.create(0).is_err());
    assert!(fabric.name(7).is_err());
}

#[test]
fn test_fabric_explicit_registration() {
    let mut fabric = CrossoverFabric::empty();
    assert_eq!(fabric.register(100, CrossoverOperator::KPoint(50)), None);

    assert_eq!(fabric.name(100).unwrap(), "50-Pontos");
    assert_eq!(fabric.ids().collect::<Vec<_>>(), vec![100]);

    // Registrations take precedence over the k-point rule
    let mut fabric = CrossoverFabric::default();
    fabric.register(5, CrossoverOperator::Uniform);
    assert_eq!(fabric.create(5).unwrap(), CrossoverOperator::Uniform);
    assert_eq!(fabric.create(6).unwrap(), CrossoverOperator::KPoint(6));
}

#[test]
fn test_failed_gate_returns_parents_unchanged() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let (mut parent1, parent2) = create_parents(10);
    parent1.set_fitness(0.5);

    for operator in [CrossoverOperator::Uniform, CrossoverOperator::KPoint(2)] {
        let (child1, child2) = operator.apply(&parent1, &parent2, 0.0, &mut rng).unwrap();
        assert_eq!(child1, parent1);
        assert_eq!(child2, parent2);
        assert_eq!(child1.fitness(), Some(0.5));
    }
}

#[test]
fn test_uniform_crossover_exchanges_genes() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let (parent1, parent2) = create_parents(64);

    let (child1, child2) = CrossoverOperator::Uniform
        .apply(&parent1, &parent2, 1.0, &mut rng)
        .unwrap();

    assert_eq!(child1.len(), 64);
    assert_eq!(child2.len(), 64);
    // Every position keeps one gene from each parent
    for i in 0..64 {
        assert_ne!(child1.get(i).unwrap(), child2.get(i).unwrap());
    }
    // With 64 fair coin flips both children are mixed
    assert!(child1.count_ones() > 0 && child1.count_ones() < 64);
    assert!(!child1.is_evaluated());
}

#[test]
fn test_one_point_crossover_swaps_a_tail() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let (parent1, parent2) = create_parents(20);

    for _ in 0..20 {
        let (child1, child2) = CrossoverOperator::KPoint(1)
            .apply(&parent1, &parent2, 1.0, &mut rng)
            .unwrap();

        assert_eq!(transitions(&child1), 1);
        assert_eq!(transitions(&child2), 1);
        // Head comes from the parent itself
        assert!(!child1.get(0).unwrap());
        assert!(child2.get(0).unwrap());
        assert!(child1.get(19).unwrap());
    }
}

#[test]
fn test_k_point_crossover_has_k_cuts() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let (parent1, parent2) = create_parents(30);

    for k in 1..=5 {
        let (child1, child2) = CrossoverOperator::KPoint(k)
            .apply(&parent1, &parent2, 1.0, &mut rng)
            .unwrap();
        assert_eq!(transitions(&child1), k);
        for i in 0..30 {
            assert_ne!(child1.get(i).unwrap(), child2.get(i).unwrap());
        }
    }
}

#[test]
fn test_k_point_crossover_clamps_cut_points() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let (parent1, parent2) = create_parents(4);

    let (child1, _) = CrossoverOperator::KPoint(10)
        .apply(&parent1, &parent2, 1.0, &mut rng)
        .unwrap();
    assert_eq!(child1, Chromosome::from_bits(&[0, 1, 0, 1]));
}

#[test]
fn test_crossover_rejects_different_lengths() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let result = CrossoverOperator::Uniform.apply(
        &Chromosome::zeros(3),
        &Chromosome::zeros(4),
        1.0,
        &mut rng,
    );
    assert!(matches!(result, Err(Error::Configuration(_))));
}
