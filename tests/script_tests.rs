// tests/script_tests.rs
//
// Integration tests for the chain script language: compiling scripts, and
// printing found chains back as scripts.

use addchain::algorithms::{ensemble, find_best};
use addchain::config::EnsembleConfig;
use addchain::ir::evaluate;
use addchain::script::{compile, decompile};
use addchain::{Chain, ChainError};
use num::{BigUint, One};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[cfg(test)]
mod script_tests {
    use super::*;

    const P25519_INVERSE: &str = "\
# Inversion in GF(2^255 - 19): raise to p - 2 = 2^255 - 21.
_10 = dbl 1
_11 = 1 add _10
_1111 = _11 shl 2 add _11
_11111111 = _1111 shl 4 add _1111
x10 = _11111111 shl 2 add _11
x20 = x10 shl 10 add x10
x30 = x20 shl 10 add x10
x60 = x30 shl 30 add x30
x120 = x60 shl 60 add x60
x240 = x120 shl 120 add x120
x250 = x240 shl 10 add x10
t = x250 shl 2 add 1
return t shl 3 add _11
";

    fn value(text: &str) -> BigUint {
        evaluate(&compile(text).unwrap()).end().unwrap().clone()
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(value("1 add 1\n"), BigUint::from(2u32));
        assert_eq!(value("dbl 1\n"), BigUint::from(2u32));
        assert_eq!(value("1 shl 3\n"), BigUint::from(8u32));
        assert_eq!(
            value(P25519_INVERSE),
            (BigUint::one() << 255u32) - BigUint::from(21u32)
        );
    }

    #[test]
    fn test_ensemble_is_close_to_hand_written_script() {
        let n = value(P25519_INVERSE);
        let best = find_best(&n, &ensemble(&EnsembleConfig::default()), None).unwrap();
        assert_eq!(compile(P25519_INVERSE).unwrap().op_counts().total(), 266);
        // Each step at most doubles, so 255 bits need at least 254 steps.
        let found = best.chain.program().unwrap().op_counts().total();
        assert!((254..300).contains(&found), "{} steps from {}", found, best.algorithm);
    }

    #[test]
    fn test_round_trip_found_chains() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xadd);
        let config = EnsembleConfig {
            min_window: 4,
            max_window: 8,
            max_run_length: 16,
            max_hybrid_window: 3,
            max_hybrid_run_length: 16,
        };
        let algorithms = ensemble(&config);
        for bits in [5u32, 33, 90, 256] {
            let mut n = BigUint::one();
            for _ in 1..bits {
                n = (n << 1u32) + BigUint::from(rng.random_range(0..2u32));
            }
            let best = find_best(&n, &algorithms, Some(2)).unwrap();
            let text = decompile(&best.chain.program().unwrap());
            let recompiled = compile(&text).unwrap();
            assert_eq!(evaluate(&recompiled), best.chain, "script:\n{}", text);
        }
    }

    #[test]
    fn test_round_trip_shifts() {
        let program = compile(P25519_INVERSE).unwrap();
        let text = decompile(&program);
        let recompiled = compile(&text).unwrap();
        assert_eq!(evaluate(&recompiled), evaluate(&program));
        assert_eq!(recompiled.op_counts(), program.op_counts());
        assert!(text.lines().last().unwrap().starts_with("return "));
    }

    #[test]
    fn test_trivial_chain() {
        let text = decompile(&Chain::new().program().unwrap());
        assert_eq!(evaluate(&compile(&text).unwrap()), Chain::new());
    }

    #[test]
    fn test_parse_errors_report_lines() {
        let broken = P25519_INVERSE.replace("x60 = x30 shl 30 add x30", "x60 = x31 shl 30 add x30");
        match compile(&broken) {
            Err(ChainError::Parse { line, .. }) => assert_eq!(line, 9),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
