use proptest::prelude::*;
use rand::{ rngs::StdRng, SeedableRng };
use tableau_sim::{
    gate::Gate,
    storage::{ Dense, Packed },
    tableau::Tableau,
};

const MAX_QUBITS: usize = 40;

fn make_gate(n: usize, kind: u8, a: usize, b: usize) -> Gate {
    let a = a % n;
    let b = if n > 1 && b % n == a { (a + 1) % n } else { b % n };
    match kind % 9 {
        0 => Gate::H(a),
        1 => Gate::S(a),
        2 => Gate::SInv(a),
        3 => Gate::X(a),
        4 => Gate::Y(a),
        5 => Gate::Z(a),
        _ if n < 2 => Gate::H(a),
        6 => Gate::CX(a, b),
        7 => Gate::CZ(a, b),
        _ => Gate::Swap(a, b),
    }
}

fn circuit() -> impl Strategy<Value = (usize, Vec<Gate>)> {
    (1..=MAX_QUBITS).prop_flat_map(|n| {
        let gate = (any::<u8>(), any::<usize>(), any::<usize>())
            .prop_map(move |(kind, a, b)| make_gate(n, kind, a, b));
        (Just(n), prop::collection::vec(gate, 0..120))
    })
}

proptest! {
    #[test]
    fn double_hadamard_is_identity((n, gates) in circuit(), k in any::<usize>()) {
        let k = k % n;
        let mut tab: Tableau = Tableau::new(n);
        tab.apply_circuit(&gates).unwrap();
        let before = tab.clone();
        tab.apply_h(k).unwrap().apply_h(k).unwrap();
        prop_assert_eq!(tab, before);
    }

    #[test]
    fn gates_preserve_commutation((n, gates) in circuit()) {
        let mut tab: Tableau<Dense> = Tableau::new(n);
        tab.apply_circuit(&gates).unwrap();
        prop_assert!(tab.is_symplectic());
    }

    #[test]
    fn measurements_preserve_commutation(
        (n, gates) in circuit(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tab: Tableau = Tableau::new(n);
        tab.apply_circuit(&gates).unwrap();
        for k in 0..n {
            tab.measure(k, &mut rng).unwrap();
            prop_assert!(tab.is_symplectic());
        }
    }

    #[test]
    fn second_measurement_is_determined(
        (n, gates) in circuit(),
        k in any::<usize>(),
        seed in any::<u64>(),
    ) {
        let k = k % n;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tab: Tableau = Tableau::new(n);
        tab.apply_circuit(&gates).unwrap();
        let first = tab.measure(k, &mut rng).unwrap();
        let after_first = tab.clone();
        let second = tab.measure(k, &mut rng).unwrap();
        prop_assert!(second.determined);
        prop_assert_eq!(first.value, second.value);
        prop_assert_eq!(tab, after_first);
    }

    #[test]
    fn backends_agree((n, gates) in circuit(), seed in any::<u64>()) {
        let mut rng_d = StdRng::seed_from_u64(seed);
        let mut rng_p = StdRng::seed_from_u64(seed);
        let mut dense: Tableau<Dense> = Tableau::new(n);
        let mut packed: Tableau<Packed> = Tableau::new(n);
        dense.apply_circuit(&gates).unwrap();
        packed.apply_circuit(&gates).unwrap();
        prop_assert_eq!(packed.convert::<Dense>(), dense.clone());
        for k in (0..n).rev() {
            let md = dense.measure(k, &mut rng_d).unwrap();
            let mp = packed.measure(k, &mut rng_p).unwrap();
            prop_assert_eq!(md, mp);
        }
        prop_assert_eq!(dense.to_string(), packed.to_string());
    }
}
